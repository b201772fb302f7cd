//! # Construcción de Respuestas HTTP
//!
//! Este módulo arma la respuesta completa que se escribe en el socket.
//!
//! ## Formato en el cable
//!
//! El layout es un contrato, byte por byte:
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/html\r\n
//! \r\n
//! <bytes del archivo, sin terminador extra>
//! ```
//!
//! No se agrega `Content-Length`: la conexión se cierra después de escribir,
//! y ese cierre marca el final del body.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use page_server::http::{Response, StatusCode};
//!
//! let response = Response::html(StatusCode::Ok).with_body_bytes(b"<h1>hi</h1>".to_vec());
//! assert_eq!(
//!     response.to_bytes(),
//!     b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n<h1>hi</h1>".to_vec()
//! );
//! ```

use super::StatusCode;
use crate::error::{Result, ServerError};
use std::fs::File;
use std::io;
use std::path::Path;

/// Body fijo para paths con escapes inválidos
const BAD_REQUEST_BODY: &str = "<html><body><h1>400 Bad Request</h1></body></html>";

/// Representa una respuesta HTTP/1.1 completa
#[derive(Debug, Clone)]
pub struct Response {
    /// Código de estado HTTP (200, 404, etc.)
    status: StatusCode,

    /// Headers en el orden en que se escriben
    headers: Vec<(String, String)>,

    /// Cuerpo de la respuesta (puede ser vacío)
    body: Vec<u8>,
}

impl Response {
    /// Crea una respuesta sin headers ni body
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Respuesta con `Content-Type: text/html`, el único header que enviamos
    pub fn html(status: StatusCode) -> Self {
        Self::new(status).with_header("Content-Type", "text/html")
    }

    /// Agrega un header a la respuesta
    ///
    /// Si el header ya existe, se sobrescribe en su posición original.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        match self.headers.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
        self
    }

    /// Establece el cuerpo de la respuesta desde bytes
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Respuesta HTML cuyo body es el contenido completo de un archivo
    ///
    /// El archivo se copia por chunks hasta EOF, sin límite de tamaño.
    /// Si no se puede abrir o leer, retorna `ServerError::Asset`.
    pub fn from_page(status: StatusCode, page: &Path) -> Result<Self> {
        let asset_error = |source: io::Error| ServerError::Asset {
            path: page.to_path_buf(),
            source,
        };

        let mut file = File::open(page).map_err(asset_error)?;
        let mut body = Vec::new();
        io::copy(&mut file, &mut body).map_err(asset_error)?;

        Ok(Self::html(status).with_body_bytes(body))
    }

    /// 400 para un path que no se pudo decodificar
    pub fn bad_request() -> Self {
        Self::html(StatusCode::BadRequest).with_body_bytes(BAD_REQUEST_BODY.as_bytes().to_vec())
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// - Status line: `HTTP/1.1 200 OK\r\n`
    /// - Headers: `Header-Name: Value\r\n`
    /// - Línea vacía: `\r\n`
    /// - Body: tal cual
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(64 + self.body.len());

        result.extend_from_slice(format!("HTTP/1.1 {}\r\n", self.status).as_bytes());

        for (name, value) in &self.headers {
            result.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }

        result.extend_from_slice(b"\r\n");
        result.extend_from_slice(&self.body);

        result
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene una referencia a los headers
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Arma la respuesta para el resultado del routing
///
/// - `Some(page)`: 200 con el contenido de la página
/// - `None`: 404 con el contenido de `not_found_page`
///
/// En ambos casos un archivo faltante es una falla del lado del servidor.
pub fn build_response(page: Option<&Path>, not_found_page: &Path) -> Result<Response> {
    match page {
        Some(page) => Response::from_page(StatusCode::Ok, page),
        None => Response::from_page(StatusCode::NotFound, not_found_page),
    }
}
