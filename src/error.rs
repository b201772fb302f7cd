//! # Errores del Servidor
//! src/error.rs
//!
//! Tipos de error compartidos por todo el crate.
//!
//! Hay dos familias:
//! - **Fatales**: bind, archivo de rutas, configuración. Suben hasta `main`.
//! - **Por conexión**: I/O del socket o assets faltantes. Los registra el
//!   thread de la conexión y nunca llegan al loop de accept.

use std::path::PathBuf;
use thiserror::Error;

/// Error general del servidor
#[derive(Debug, Error)]
pub enum ServerError {
    /// No se pudo abrir el socket de escucha
    #[error("bind failed on {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Error transitorio al aceptar una conexión
    #[error("accept failed: {0}")]
    Accept(#[source] std::io::Error),

    /// Error de lectura/escritura en una conexión
    #[error("connection I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Página configurada que no existe o no se puede leer
    #[error("asset {path} unavailable: {source}")]
    Asset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Archivo de rutas inválido o ilegible
    #[error("routes file {path}: {reason}")]
    Routes { path: PathBuf, reason: String },

    /// Configuración inválida
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ServerError>;
