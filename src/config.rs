//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración por argumentos CLI y variables de entorno.
//! Los valores por defecto reproducen el comportamiento clásico: puerto 8082,
//! páginas en el directorio actual, sin timeouts y sin límite de conexiones.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./page_server --port 8082 \
//!   --root ./www \
//!   --read-timeout-ms 5000 \
//!   --max-connections 256
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=9000 DOCUMENT_ROOT=./www ./page_server
//! ```

use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuración del servidor
#[derive(Debug, Clone, Parser)]
#[command(name = "page_server")]
#[command(about = "Servidor HTTP/1.1 concurrente de páginas HTML estáticas")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8082", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio donde están las páginas HTML
    #[arg(long, default_value = ".", env = "DOCUMENT_ROOT")]
    pub root: PathBuf,

    /// Página enviada con el 404 (relativa a --root)
    #[arg(long = "not-found-page", default_value = "404.html", env = "NOT_FOUND_PAGE")]
    pub not_found_page: String,

    /// Archivo JSON con la tabla de rutas (si no, se usan las rutas por defecto)
    #[arg(long = "routes", env = "ROUTES_FILE")]
    pub routes_file: Option<PathBuf>,

    // === Conexiones ===

    /// Conexiones pendientes en la cola del socket de escucha
    #[arg(long, default_value = "1", env = "LISTEN_BACKLOG")]
    pub backlog: i32,

    /// Bytes máximos leídos del request (un solo read)
    #[arg(long = "buffer-size", default_value = "2048", env = "RECV_BUFFER_SIZE")]
    pub buffer_size: usize,

    /// Timeout de lectura en milisegundos (0 = sin timeout)
    #[arg(long = "read-timeout-ms", default_value = "0", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    /// Timeout de escritura en milisegundos (0 = sin timeout)
    #[arg(long = "write-timeout-ms", default_value = "0", env = "WRITE_TIMEOUT_MS")]
    pub write_timeout_ms: u64,

    /// Conexiones atendidas a la vez (0 = sin límite)
    #[arg(long = "max-connections", default_value = "0", env = "MAX_CONNECTIONS")]
    pub max_connections: usize,

    // === Logging ===

    /// Nivel de log (error, warn, info, debug, trace). RUST_LOG tiene prioridad.
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,
}

/// Tamaño mínimo razonable para leer un request line
const MIN_BUFFER_SIZE: usize = 64;

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use page_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:8082");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Timeout de lectura, `None` si está deshabilitado
    pub fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    /// Timeout de escritura, `None` si está deshabilitado
    pub fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }

    /// Límite de conexiones concurrentes, `None` si no hay límite
    pub fn connection_limit(&self) -> Option<usize> {
        (self.max_connections > 0).then_some(self.max_connections)
    }

    /// Ruta completa de la página 404
    pub fn not_found_path(&self) -> PathBuf {
        self.root.join(&self.not_found_page)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Port must be > 0".to_string());
        }

        if self.backlog < 1 {
            return Err("Backlog must be >= 1".to_string());
        }

        if self.buffer_size < MIN_BUFFER_SIZE {
            return Err(format!("Buffer size must be >= {}", MIN_BUFFER_SIZE));
        }

        if self.not_found_page.trim().is_empty() {
            return Err("Not-found page must not be empty".to_string());
        }

        if !Path::new(&self.root).is_dir() {
            return Err(format!("Document root is not a directory: {}", self.root.display()));
        }

        Ok(())
    }

    /// Imprime un resumen de la configuración
    pub fn print_summary(&self) {
        let or_off = |value: u64| {
            if value == 0 {
                "disabled".to_string()
            } else {
                format!("{} ms", value)
            }
        };

        println!("╔══════════════════════════════════════════════════════════════╗");
        println!("║                Page Server Configuration                    ║");
        println!("╚══════════════════════════════════════════════════════════════╝");
        println!();
        println!("🌐 Network:");
        println!("   Address:      {}", self.address());
        println!("   Backlog:      {}", self.backlog);
        println!("   Buffer:       {} bytes", self.buffer_size);
        println!();
        println!("📄 Pages:");
        println!("   Root:         {}", self.root.display());
        println!("   404 page:     {}", self.not_found_page);
        match &self.routes_file {
            Some(path) => println!("   Routes:       {}", path.display()),
            None => println!("   Routes:       built-in"),
        }
        println!();
        println!("🚦 Connections:");
        println!("   Read timeout:  {}", or_off(self.read_timeout_ms));
        println!("   Write timeout: {}", or_off(self.write_timeout_ms));
        match self.connection_limit() {
            Some(limit) => println!("   Max conns:     {}", limit),
            None => println!("   Max conns:     unbounded"),
        }
        println!();
        println!("═══════════════════════════════════════════════════════════════");
        println!();
    }
}

fn millis(value: u64) -> Option<Duration> {
    (value > 0).then(|| Duration::from_millis(value))
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8082,
            host: "0.0.0.0".to_string(),
            root: PathBuf::from("."),
            not_found_page: "404.html".to_string(),
            routes_file: None,
            backlog: 1,
            buffer_size: 2048,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
            max_connections: 0,
            log_level: "info".to_string(),
        }
    }
}
