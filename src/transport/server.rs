use crate::error::DispatchError;
use crate::messages::{CommandRequest, CommandResponse};
use crate::motor::Dispatcher;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};

use super::http::{self, Request};

/// Drop connections that take longer than this to deliver a request
const REQUEST_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Accepts command requests and hands them to the dispatcher
///
/// Each connection gets its own task, so parsing and validation run
/// concurrently. Actuation is still serialized inside [`Dispatcher`].
pub struct CommandServer {
    listener: TcpListener,
    dispatcher: Arc<Dispatcher>,
    command_path: Arc<str>,
}

impl CommandServer {
    pub async fn bind(addr: &str, command_path: &str, dispatcher: Arc<Dispatcher>) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        Ok(Self {
            listener,
            dispatcher,
            command_path: Arc::from(command_path),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("Failed to read listener address")
    }

    /// Serve until the task is dropped. A bad connection never ends the loop.
    pub async fn run(self) -> Result<()> {
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::warn!("Failed to accept connection: {}", e);
                    continue;
                }
            };

            let dispatcher = self.dispatcher.clone();
            let command_path = self.command_path.clone();
            tokio::spawn(async move {
                handle_connection(stream, peer, &dispatcher, &command_path).await;
            });
        }
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    dispatcher: &Dispatcher,
    command_path: &str,
) {
    let request = match tokio::time::timeout(REQUEST_READ_TIMEOUT, http::read_request(&mut stream)).await {
        Ok(Ok(request)) => request,
        Ok(Err(e)) => {
            tracing::warn!("[{}] Bad request: {}", peer, e);
            if let Some(status) = e.status_code() {
                respond(&mut stream, peer, status, &error_body("Solicitud inválida")).await;
            }
            return;
        }
        Err(_) => {
            tracing::warn!("[{}] Timed out waiting for request", peer);
            return;
        }
    };

    let (status, response) = route(&request, dispatcher, command_path).await;
    respond(&mut stream, peer, status, &response).await;
}

async fn respond(stream: &mut TcpStream, peer: SocketAddr, status: u16, response: &CommandResponse) {
    let body = match serde_json::to_vec(response) {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("[{}] Failed to encode response: {}", peer, e);
            return;
        }
    };

    if let Err(e) = http::write_response(stream, status, &body).await {
        tracing::warn!("[{}] Failed to write response: {}", peer, e);
        return;
    }
    let _ = stream.shutdown().await;
}

/// Pick the handler for a parsed request
pub async fn route(
    request: &Request,
    dispatcher: &Dispatcher,
    command_path: &str,
) -> (u16, CommandResponse) {
    if request.path != command_path {
        return (404, error_body("Ruta no encontrada"));
    }

    if request.method != "POST" {
        return (405, error_body("Método no permitido"));
    }

    handle_command(&request.body, dispatcher).await
}

/// Validate a JSON command body and run it.
///
/// Returns the status code and response body; every call yields exactly one.
pub async fn handle_command(body: &[u8], dispatcher: &Dispatcher) -> (u16, CommandResponse) {
    let request: CommandRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(e) => {
            let err = DispatchError::Validation(e.to_string());
            tracing::warn!("Rejected command body: {}", e);
            return (err.status_code(), error_body(&err.to_string()));
        }
    };

    tracing::info!(
        "Received command: {} @ {:?}",
        request.accion.as_deref().unwrap_or("<none>"),
        request.velocidad
    );

    match dispatcher.handle(&request).await {
        Ok(command) => (
            200,
            CommandResponse::Ok {
                accion_ejecutada: command.name().to_string(),
            },
        ),
        Err(e) => {
            match &e {
                DispatchError::Validation(reason) => tracing::warn!("Rejected command: {}", reason),
                DispatchError::Actuation(cause) => tracing::error!("Error running motors: {}", cause),
            }
            (e.status_code(), error_body(&e.to_string()))
        }
    }
}

fn error_body(message: &str) -> CommandResponse {
    CommandResponse::Error {
        mensaje: message.to_string(),
    }
}
