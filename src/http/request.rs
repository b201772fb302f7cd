//! # Parsing del Request Line
//! src/http/request.rs
//!
//! Solo nos interesa la primera línea del request:
//!
//! ```text
//! GET /path HTTP/1.1\r\n
//! Host: localhost:8082\r\n      <- ignorado
//! \r\n
//! ```
//!
//! Cualquier otra cosa (otro método, HTTP/1.0, línea malformada) no es un
//! error: es un request que el servidor ignora y cierra sin responder.

use super::decode::{percent_decode, DecodeError};
use regex::bytes::Regex;
use std::sync::OnceLock;

/// Gramática del request line. Trabaja sobre bytes crudos (`(?-u)`) para que
/// un path con bytes no UTF-8 no rompa el match.
const GET_REQUEST_LINE: &str = r"(?-u)^GET ([^ \r\n]+) HTTP/1\.1(?:\r?\n|$)";

fn get_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        // El patrón es una constante: si no compila es un bug del programa
        Regex::new(GET_REQUEST_LINE).expect("GET request line regex is valid")
    })
}

/// Request GET reconocido
///
/// Toma prestado el buffer recibido en la conexión; vive lo mismo que él.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    /// Path tal como llegó (todavía percent-encoded)
    path: &'a [u8],
}

impl<'a> Request<'a> {
    /// Intenta reconocer un `GET <path> HTTP/1.1` al inicio del buffer
    ///
    /// Retorna `None` si los bytes no forman ese request line.
    ///
    /// # Ejemplo
    /// ```
    /// use page_server::http::Request;
    ///
    /// let request = Request::parse(b"GET /index HTTP/1.1\r\n\r\n").unwrap();
    /// assert_eq!(request.raw_path(), b"/index");
    ///
    /// assert!(Request::parse(b"POST /index HTTP/1.1\r\n\r\n").is_none());
    /// ```
    pub fn parse(buffer: &'a [u8]) -> Option<Self> {
        let captures = get_regex().captures(buffer)?;
        let path = captures.get(1)?.as_bytes();
        Some(Self { path })
    }

    /// Path sin decodificar
    pub fn raw_path(&self) -> &'a [u8] {
        self.path
    }

    /// Path decodificado a bytes literales
    pub fn decoded_path(&self) -> Result<Vec<u8>, DecodeError> {
        percent_decode(self.path)
    }
}
