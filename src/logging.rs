//! # Logging
//! src/logging.rs
//!
//! Inicializa `tracing` con salida legible por consola.
//! `RUST_LOG` tiene prioridad sobre el nivel configurado con `--log-level`.

use tracing_subscriber::EnvFilter;

/// Instala el subscriber global
///
/// Se puede llamar más de una vez (por ejemplo desde varios tests): las
/// llamadas siguientes no hacen nada.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .with_target(false)
        .try_init();
}
