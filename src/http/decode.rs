//! # Percent-Decoding de Paths
//! src/http/decode.rs
//!
//! Decodifica el path de un request line a bytes literales.
//!
//! ## Reglas
//!
//! - `+` se convierte en un espacio
//! - `%XY` (dos dígitos hex, mayúsculas o minúsculas) se convierte en el byte `0xXY`
//! - Cualquier otro byte pasa sin cambios
//!
//! Un `%` que no va seguido de exactamente dos dígitos hex es un error:
//! nunca se descarta ni se trunca el escape.

use thiserror::Error;

/// Errores de decodificación
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// El input termina en medio de un escape (`%` o `%4`)
    #[error("truncated percent escape at offset {offset}")]
    Truncated { offset: usize },

    /// Alguno de los dos caracteres después de `%` no es hex
    #[error("invalid percent escape at offset {offset}")]
    InvalidHex { offset: usize },
}

/// Decodifica un path percent-encoded
///
/// El resultado nunca es más largo que el input, así que el buffer de salida
/// se reserva con `input.len()` desde el principio.
///
/// # Ejemplo
/// ```
/// use page_server::http::decode::percent_decode;
///
/// assert_eq!(percent_decode(b"/path%31").unwrap(), b"/path1");
/// assert_eq!(percent_decode(b"/a+b").unwrap(), b"/a b");
/// assert!(percent_decode(b"/bad%G0").is_err());
/// ```
pub fn percent_decode(input: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut output = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        match input[i] {
            b'+' => {
                output.push(b' ');
                i += 1;
            }
            b'%' => {
                // Solo miramos los dos bytes del escape, nunca más allá del final
                let escape = input
                    .get(i + 1..i + 3)
                    .ok_or(DecodeError::Truncated { offset: i })?;
                let hi = hex_value(escape[0]).ok_or(DecodeError::InvalidHex { offset: i })?;
                let lo = hex_value(escape[1]).ok_or(DecodeError::InvalidHex { offset: i })?;
                output.push((hi << 4) | lo);
                i += 3;
            }
            byte => {
                output.push(byte);
                i += 1;
            }
        }
    }

    Ok(output)
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
