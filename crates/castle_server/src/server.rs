//! TCP transport.
//!
//! Each connection gets its own task that reads request lines, solves on
//! the blocking pool and writes one response line per request. A line that
//! does not parse is answered with an `error` response; the connection
//! stays open.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::protocol::{Request, Response};
use crate::service::SolverService;

/// Errors that can occur when starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// An I/O failure on the listener or a connection.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bind a listener on `host:port`.
pub async fn bind(host: &str, port: u16) -> Result<TcpListener, ServerError> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| ServerError::Bind(format!("invalid address: {e}")))?;
    TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))
}

/// Accept connections forever.
pub async fn serve(listener: TcpListener, service: Arc<SolverService>) -> Result<(), ServerError> {
    info!("Planning service listening on {}", listener.local_addr()?);
    loop {
        let (stream, peer) = listener.accept().await?;
        debug!("Connection from {}", peer);
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, service).await {
                warn!("Connection {} closed with error: {}", peer, e);
            }
        });
    }
}

/// Serve one connection until the client hangs up.
pub async fn handle_connection(
    stream: TcpStream,
    service: Arc<SolverService>,
) -> Result<(), ServerError> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = match Request::from_json(line) {
            Ok(request) => respond(&service, request).await,
            Err(e) => Response::error(format!("invalid request: {e}")),
        };
        writer.write_all(response.to_json_line().as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}

async fn respond(service: &Arc<SolverService>, request: Request) -> Response {
    if request == Request::Ping {
        return Response::pong();
    }
    let service = Arc::clone(service);
    tokio::task::spawn_blocking(move || service.handle(&request))
        .await
        .unwrap_or_else(|e| Response::error(format!("solver task failed: {e}")))
}
