//! # Manejo de una Conexión
//! src/server/connection.rs
//!
//! Pipeline de un request, de principio a fin:
//!
//! ```text
//! read → parse → decode → route → build → write → close
//! ```
//!
//! Salidas tempranas:
//! - 0 bytes leídos: se cierra sin responder
//! - no es un `GET <path> HTTP/1.1`: se cierra sin responder (a propósito,
//!   no se envía 400/405)
//! - path con escape inválido: 400 y se cierra
//! - página configurada o 404.html faltante: error, se cierra sin responder
//!
//! El stream es del handler desde el accept hasta el cierre; al salir de
//! `serve` (por cualquier camino, incluido un panic) se libera el socket.

use crate::config::Config;
use crate::error::{Result, ServerError};
use crate::http::{build_response, Request, Response, StatusCode};
use crate::router::RouteTable;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Estado de solo lectura compartido por todos los handlers
#[derive(Debug, Clone)]
pub struct ConnectionContext {
    /// Tabla de rutas
    pub routes: RouteTable,

    /// Directorio base de las páginas
    pub root: PathBuf,

    /// Ruta completa de la página 404
    pub not_found_page: PathBuf,

    /// Bytes máximos del read inicial
    pub buffer_size: usize,

    /// Timeout de lectura del socket (None = sin timeout)
    pub read_timeout: Option<Duration>,

    /// Timeout de escritura del socket (None = sin timeout)
    pub write_timeout: Option<Duration>,
}

impl ConnectionContext {
    pub fn new(config: &Config, routes: RouteTable) -> Self {
        Self {
            routes,
            root: config.root.clone(),
            not_found_page: config.not_found_path(),
            buffer_size: config.buffer_size,
            read_timeout: config.read_timeout(),
            write_timeout: config.write_timeout(),
        }
    }

    /// Resuelve un path decodificado a la página en disco
    ///
    /// Un path que no es UTF-8 válido no puede coincidir con ninguna ruta.
    pub fn page_for(&self, decoded_path: &[u8]) -> Option<PathBuf> {
        let path = std::str::from_utf8(decoded_path).ok()?;
        self.routes.resolve(path).map(|file| self.root.join(file))
    }
}

/// Cómo terminó una conexión
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// El peer cerró sin enviar nada
    NoData,

    /// Los bytes no forman un request GET; no se respondió
    Ignored,

    /// Se escribió una respuesta con este status
    Responded(StatusCode),
}

/// Procesa un request completo sobre un stream
///
/// No cierra el stream: eso lo hace quien lo posee al soltarlo.
pub fn handle_connection<S: Read + Write>(
    mut stream: S,
    context: &ConnectionContext,
) -> Result<Outcome> {
    let mut buffer = vec![0u8; context.buffer_size];
    let bytes_read = stream.read(&mut buffer)?;

    if bytes_read == 0 {
        debug!("no data received");
        return Ok(Outcome::NoData);
    }

    let received = &buffer[..bytes_read];
    let Some(request) = Request::parse(received) else {
        debug!(bytes = bytes_read, "not a GET request, closing without response");
        return Ok(Outcome::Ignored);
    };

    let response = match request.decoded_path() {
        Ok(path) => {
            let page = context.page_for(&path);
            build_response(page.as_deref(), &context.not_found_page)?
        }
        Err(e) => {
            warn!(
                path = %String::from_utf8_lossy(request.raw_path()),
                error = %e,
                "malformed path"
            );
            Response::bad_request()
        }
    };

    stream.write_all(&response.to_bytes())?;
    stream.flush()?;

    info!(
        path = %String::from_utf8_lossy(request.raw_path()),
        status = response.status().as_u16(),
        bytes = response.body().len(),
        "GET"
    );

    Ok(Outcome::Responded(response.status()))
}

/// Atiende una conexión aceptada dentro de su propio thread
///
/// Es la frontera de fallas por conexión: errores y panics se registran
/// aquí y nunca llegan al loop de accept.
pub fn serve(mut stream: TcpStream, peer: SocketAddr, context: &ConnectionContext) {
    let start = Instant::now();

    if let Err(e) = apply_timeouts(&stream, context) {
        warn!(%peer, error = %e, "could not set socket timeouts");
        return;
    }

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        handle_connection(&mut stream, context)
    }));

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    match result {
        Ok(Ok(outcome)) => {
            debug!(%peer, ?outcome, elapsed_ms, "connection closed");
        }
        Ok(Err(e @ ServerError::Asset { .. })) => {
            error!(%peer, error = %e, "missing page, closing without response");
        }
        Ok(Err(e)) => {
            warn!(%peer, error = %e, "connection failed");
        }
        Err(_) => {
            error!(%peer, "connection handler panicked");
        }
    }
}

fn apply_timeouts(stream: &TcpStream, context: &ConnectionContext) -> std::io::Result<()> {
    stream.set_read_timeout(context.read_timeout)?;
    stream.set_write_timeout(context.write_timeout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::{self, Cursor};
    use tempfile::TempDir;

    /// Stream en memoria: lee de `input`, escribe en `output`
    struct MockStream {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
    }

    impl MockStream {
        fn new(input: &[u8]) -> Self {
            Self {
                input: Cursor::new(input.to_vec()),
                output: Vec::new(),
            }
        }
    }

    impl Read for MockStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for MockStream {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.output.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn site() -> (TempDir, ConnectionContext) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "<h1>index</h1>").unwrap();
        fs::write(dir.path().join("path1.html"), "<h1>path1</h1>").unwrap();
        fs::write(dir.path().join("path2.html"), "<h1>path2</h1>").unwrap();
        fs::write(dir.path().join("404.html"), "<h1>404</h1>").unwrap();

        let mut config = Config::default();
        config.root = dir.path().to_path_buf();
        let context = ConnectionContext::new(&config, RouteTable::default());
        (dir, context)
    }

    fn run(context: &ConnectionContext, input: &[u8]) -> (Result<Outcome>, Vec<u8>) {
        let mut stream = MockStream::new(input);
        let result = handle_connection(&mut stream, context);
        (result, stream.output)
    }

    #[test]
    fn test_serves_route() {
        let (_dir, context) = site();
        let (result, output) = run(&context, b"GET /index HTTP/1.1\r\n\r\n");

        assert_eq!(result.unwrap(), Outcome::Responded(StatusCode::Ok));
        assert_eq!(
            output,
            b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n<h1>index</h1>".to_vec()
        );
    }

    #[test]
    fn test_unknown_route_gets_404_page() {
        let (_dir, context) = site();
        let (result, output) = run(&context, b"GET /nope HTTP/1.1\r\n\r\n");

        assert_eq!(result.unwrap(), Outcome::Responded(StatusCode::NotFound));
        assert_eq!(
            output,
            b"HTTP/1.1 404 Not Found\r\nContent-Type: text/html\r\n\r\n<h1>404</h1>".to_vec()
        );
    }

    #[test]
    fn test_encoded_path_matches_decoded() {
        let (_dir, context) = site();
        let (_, encoded) = run(&context, b"GET /path%31 HTTP/1.1\r\n\r\n");
        let (_, plain) = run(&context, b"GET /path1 HTTP/1.1\r\n\r\n");
        assert_eq!(encoded, plain);
    }

    #[test]
    fn test_no_data() {
        let (_dir, context) = site();
        let (result, output) = run(&context, b"");
        assert_eq!(result.unwrap(), Outcome::NoData);
        assert!(output.is_empty());
    }

    #[test]
    fn test_non_get_is_silent() {
        let (_dir, context) = site();
        for raw in [
            &b"POST /index HTTP/1.1\r\n\r\n"[..],
            b"GET /index HTTP/1.0\r\n\r\n",
            b"hello",
        ] {
            let (result, output) = run(&context, raw);
            assert_eq!(result.unwrap(), Outcome::Ignored);
            assert!(output.is_empty());
        }
    }

    #[test]
    fn test_bad_escape_gets_400() {
        let (_dir, context) = site();
        let (result, output) = run(&context, b"GET /bad%G0 HTTP/1.1\r\n\r\n");

        assert_eq!(result.unwrap(), Outcome::Responded(StatusCode::BadRequest));
        assert!(output.starts_with(b"HTTP/1.1 400 Bad Request\r\nContent-Type: text/html\r\n\r\n"));
    }

    #[test]
    fn test_non_utf8_path_is_404() {
        let (_dir, context) = site();
        let (result, _) = run(&context, b"GET /%FF HTTP/1.1\r\n\r\n");
        assert_eq!(result.unwrap(), Outcome::Responded(StatusCode::NotFound));
    }

    #[test]
    fn test_missing_page_writes_nothing() {
        let (dir, context) = site();
        fs::remove_file(dir.path().join("path2.html")).unwrap();

        let (result, output) = run(&context, b"GET /path2 HTTP/1.1\r\n\r\n");
        assert!(matches!(result, Err(ServerError::Asset { .. })));
        assert!(output.is_empty());
    }

    #[test]
    fn test_missing_404_page_writes_nothing() {
        let (dir, context) = site();
        fs::remove_file(dir.path().join("404.html")).unwrap();

        let (result, output) = run(&context, b"GET /nope HTTP/1.1\r\n\r\n");
        assert!(matches!(result, Err(ServerError::Asset { .. })));
        assert!(output.is_empty());
    }

    #[test]
    fn test_request_line_beyond_buffer_is_ignored() {
        let (_dir, mut context) = site();
        context.buffer_size = 64;

        let long_path = format!("/{}", "a".repeat(200));
        let raw = format!("GET {} HTTP/1.1\r\n\r\n", long_path);
        let (result, output) = run(&context, raw.as_bytes());

        assert_eq!(result.unwrap(), Outcome::Ignored);
        assert!(output.is_empty());
    }

    #[test]
    fn test_timeouts_applied_to_socket() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.root = dir.path().to_path_buf();
        config.read_timeout_ms = 150;
        config.write_timeout_ms = 200;
        let context = ConnectionContext::new(&config, RouteTable::default());
        assert_eq!(context.write_timeout, Some(Duration::from_millis(200)));

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let _client = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
        let (stream, _) = listener.accept().unwrap();

        apply_timeouts(&stream, &context).unwrap();
        assert_eq!(stream.read_timeout().unwrap(), Some(Duration::from_millis(150)));
        assert_eq!(stream.write_timeout().unwrap(), Some(Duration::from_millis(200)));
    }
}
