//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Implementacion del servidor TCP que maneja multiples conexiones simultaneas
//! usando threads. Cada conexión se procesa en su propio thread, sin que el
//! loop de accept espere a que termine.

use super::connection::{self, ConnectionContext};
use super::limit::{ConnectionLimiter, ConnectionPermit};
use crate::config::Config;
use crate::error::{Result, ServerError};
use crate::router::RouteTable;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info, warn};

/// Servidor HTTP/1.1 de páginas estáticas
pub struct Server {
    listener: TcpListener,
    context: Arc<ConnectionContext>,
    limiter: Option<ConnectionLimiter>,
}

impl Server {
    /// Abre el socket de escucha
    ///
    /// Un fallo aquí es fatal: sin socket no hay servidor.
    pub fn bind(config: &Config, routes: RouteTable) -> Result<Self> {
        let address = config.address();
        let listener =
            listen_socket(&address, config.backlog).map_err(|source| ServerError::Bind {
                address: address.clone(),
                source,
            })?;

        info!(
            address = %address,
            backlog = config.backlog,
            routes = routes.routes().len(),
            max_connections = ?config.connection_limit(),
            "listening"
        );

        Ok(Self {
            listener,
            context: Arc::new(ConnectionContext::new(config, routes)),
            limiter: config.connection_limit().map(ConnectionLimiter::new),
        })
    }

    /// Dirección real del socket (útil cuando se hace bind al puerto 0)
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Loop de accept; no retorna
    ///
    /// Los errores de accept se registran y el loop sigue.
    pub fn run(&self) {
        loop {
            // Con límite configurado, no se acepta hasta tener lugar
            let permit = self.limiter.as_ref().map(ConnectionLimiter::acquire);

            match self.listener.accept() {
                Ok((stream, peer)) => {
                    debug!(%peer, "accepted connection");
                    self.dispatch(stream, peer, permit);
                }
                Err(e) => {
                    let e = ServerError::Accept(e);
                    warn!(error = %e, "accept failed, continuing");
                }
            }
        }
    }

    /// Lanza un thread desacoplado para la conexión
    fn dispatch(&self, stream: TcpStream, peer: SocketAddr, permit: Option<ConnectionPermit>) {
        let context = Arc::clone(&self.context);

        let spawned = thread::Builder::new()
            .name(format!("conn-{}", peer))
            .spawn(move || {
                // El permiso se libera cuando termina el thread, pase lo que pase
                let _permit = permit;
                connection::serve(stream, peer, &context);
            });

        if let Err(e) = spawned {
            error!(%peer, error = %e, "could not spawn connection thread");
        }
    }
}

/// Crea el socket de escucha con un backlog explícito
///
/// `TcpListener::bind` siempre usa el backlog por defecto del sistema (128),
/// por eso el socket se arma con socket2 y después se convierte.
fn listen_socket(address: &str, backlog: i32) -> io::Result<TcpListener> {
    let addr = address.to_socket_addrs()?.next().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "address resolved to nothing")
    })?;

    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    // Igual que std: permite reusar el puerto mientras hay sockets en TIME_WAIT
    #[cfg(unix)]
    socket.set_reuse_address(true)?;

    socket.bind(&addr.into())?;
    socket.listen(backlog)?;

    Ok(socket.into())
}
