//! # Módulo HTTP
//!
//! Subconjunto mínimo de HTTP/1.1 que necesita el servidor:
//!
//! - Reconocer el request line `GET <path> HTTP/1.1`
//! - Decodificar el path (percent-encoding)
//! - Construir la respuesta con un solo header
//!
//! No hay headers de request, ni body, ni keep-alive: cada conexión
//! atiende exactamente un request y se cierra.
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path HTTP/1.1\r\n
//! (el resto se ignora)
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/html\r\n
//! \r\n
//! <html>...
//! ```

pub mod decode;    // Percent-decoding del path
pub mod request;   // Parsing del request line
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use decode::{percent_decode, DecodeError};
pub use request::Request;
pub use response::{build_response, Response};
pub use status::StatusCode;
