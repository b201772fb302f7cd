//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones entrantes, una por thread
//! 3. Lee el request line y lo enruta a una página
//! 4. Envía la respuesta y cierra la conexión

pub mod connection;
pub mod limit;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use connection::{handle_connection, ConnectionContext, Outcome};
pub use limit::{ConnectionLimiter, ConnectionPermit};
pub use tcp::Server;
