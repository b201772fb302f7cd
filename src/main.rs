//! # Page Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada: lee la configuración, carga la tabla de rutas, abre el
//! socket y entra al loop de accept. Cualquier error antes del loop es fatal.

use page_server::config::Config;
use page_server::logging;
use page_server::router::RouteTable;
use page_server::server::Server;
use page_server::{Result, ServerError};
use tracing::{error, warn};

fn main() {
    let config = Config::new();
    logging::init(&config.log_level);

    if let Err(e) = start(&config) {
        error!(error = %e, "fatal error");
        std::process::exit(1);
    }
}

fn start(config: &Config) -> Result<()> {
    config.validate().map_err(ServerError::Config)?;
    config.print_summary();

    let routes = match &config.routes_file {
        Some(path) => RouteTable::from_json_file(path)?,
        None => RouteTable::default(),
    };

    for page in routes.missing_pages(&config.root) {
        warn!(page = %page.display(), "configured page does not exist");
    }
    if !config.not_found_path().is_file() {
        warn!(page = %config.not_found_path().display(), "404 page does not exist");
    }

    // Esto bloquea el thread principal para siempre
    Server::bind(config, routes)?.run();
    Ok(())
}
