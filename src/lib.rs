//! # Page Server
//! src/lib.rs
//!
//! Servidor HTTP/1.1 concurrente mínimo: atiende `GET` sobre un conjunto
//! fijo de rutas y responde con páginas HTML del disco, o con la página 404.
//!
//! ## Arquitectura
//!
//! - `http`: request line, percent-decoding y construcción de respuestas
//! - `router`: tabla de rutas path → archivo
//! - `server`: socket de escucha, un thread por conexión
//! - `config`: argumentos CLI y variables de entorno
//! - `logging`: inicialización de `tracing`
//! - `error`: tipos de error del crate
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use page_server::config::Config;
//! use page_server::router::RouteTable;
//! use page_server::server::Server;
//!
//! let config = Config::default();
//! let server = Server::bind(&config, RouteTable::default()).expect("Error al iniciar servidor");
//! server.run();
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod router;
pub mod server;

pub use error::{Result, ServerError};
