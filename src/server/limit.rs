//! # Límite de Conexiones Concurrentes
//! src/server/limit.rs
//!
//! Semáforo contador con `Mutex` + `Condvar`. El loop de accept pide un
//! permiso antes de aceptar; si se llegó al máximo, espera a que alguna
//! conexión termine. Mientras tanto las conexiones nuevas se quedan en el
//! backlog del kernel.

use std::sync::{Arc, Condvar, Mutex, PoisonError};

/// Estado compartido: conexiones activas + condvar para despertar al accept
struct LimiterState {
    active: Mutex<usize>,
    released: Condvar,
}

/// Limitador de conexiones activas
#[derive(Clone)]
pub struct ConnectionLimiter {
    state: Arc<LimiterState>,
    max: usize,
}

/// Permiso de una conexión; se libera al soltarlo
pub struct ConnectionPermit {
    state: Arc<LimiterState>,
}

impl ConnectionLimiter {
    /// Crea un limitador con `max` conexiones simultáneas
    ///
    /// # Panics
    ///
    /// Si `max` es cero (nunca se podría aceptar nada).
    pub fn new(max: usize) -> Self {
        assert!(max > 0, "connection limit must be >= 1");

        Self {
            state: Arc::new(LimiterState {
                active: Mutex::new(0),
                released: Condvar::new(),
            }),
            max,
        }
    }

    /// Obtiene un permiso, bloqueando hasta que haya lugar
    pub fn acquire(&self) -> ConnectionPermit {
        let mut active = self
            .state
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        while *active >= self.max {
            active = self
                .state
                .released
                .wait(active)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *active += 1;

        ConnectionPermit {
            state: Arc::clone(&self.state),
        }
    }

    /// Conexiones activas en este momento
    pub fn active(&self) -> usize {
        *self
            .state
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for ConnectionPermit {
    fn drop(&mut self) {
        let mut active = self
            .state
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *active = active.saturating_sub(1);
        self.state.released.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_permits_are_counted() {
        let limiter = ConnectionLimiter::new(2);
        let a = limiter.acquire();
        let b = limiter.acquire();
        assert_eq!(limiter.active(), 2);

        drop(a);
        assert_eq!(limiter.active(), 1);
        drop(b);
        assert_eq!(limiter.active(), 0);
    }

    #[test]
    fn test_acquire_waits_for_release() {
        let limiter = ConnectionLimiter::new(1);
        let held = limiter.acquire();

        let waiter = {
            let limiter = limiter.clone();
            thread::spawn(move || {
                let _permit = limiter.acquire();
            })
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!waiter.is_finished());

        drop(held);
        waiter.join().unwrap();
        assert_eq!(limiter.active(), 0);
    }

    #[test]
    fn test_permit_released_on_panic() {
        let limiter = ConnectionLimiter::new(1);
        let permit = limiter.acquire();

        let result = thread::spawn(move || {
            let _permit = permit;
            panic!("handler blew up");
        })
        .join();

        assert!(result.is_err());
        assert_eq!(limiter.active(), 0);
    }

    #[test]
    #[should_panic]
    fn test_zero_limit_panics() {
        ConnectionLimiter::new(0);
    }
}
