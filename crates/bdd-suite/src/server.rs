//! Live server lifecycle seam.
//!
//! Server-dependent cases run against a background HTTP server exposing the
//! application under test. The lifecycle is owned by the case: started before
//! the engine runs, stopped afterwards; steps only ever read the resulting
//! URL. [`LoopbackServer`] is a minimal lifecycle for tests and the CLI: it
//! binds an ephemeral loopback port and answers every request with `200 OK`.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use thiserror::Error;

/// Errors raised while starting a live server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not be bound or inspected.
    #[error("failed to start live server: {0}")]
    Bind(#[from] std::io::Error),
}

/// Starts and stops the server backing one case run.
pub trait ServerLifecycle {
    /// Start the server and return its base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the server cannot be started.
    fn start(&mut self) -> Result<String, ServerError>;

    /// Stop the server and release its resources. Must be safe to call even
    /// when `start` was never called or failed.
    fn stop(&mut self);
}

struct Running {
    addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Loopback HTTP server on an ephemeral port.
///
/// The accept loop runs on a background thread owned by this value and is
/// joined on [`stop`](ServerLifecycle::stop).
#[derive(Default)]
pub struct LoopbackServer {
    running: Option<Running>,
}

impl LoopbackServer {
    /// Create a stopped server.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn answer(stream: &mut TcpStream) {
    let mut buf = [0_u8; 1024];
    let _ = stream.read(&mut buf);
    let _ = stream.write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok");
}

impl ServerLifecycle for LoopbackServer {
    fn start(&mut self) -> Result<String, ServerError> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);
        let handle = std::thread::spawn(move || {
            for stream in listener.incoming() {
                if flag.load(Ordering::SeqCst) {
                    break;
                }
                match stream {
                    Ok(mut stream) => answer(&mut stream),
                    Err(_) => break,
                }
            }
        });
        self.running = Some(Running {
            addr,
            shutdown,
            handle,
        });
        Ok(format!("http://{addr}"))
    }

    fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };
        running.shutdown.store(true, Ordering::SeqCst);
        // Wake the accept loop so it observes the flag.
        let _ = TcpStream::connect(running.addr);
        let _ = running.handle.join();
    }
}

impl Drop for LoopbackServer {
    fn drop(&mut self) {
        self.stop();
    }
}
