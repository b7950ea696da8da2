use crate::auth::controller::AuthController;
use crate::auth::sheet::Sheet;
use crate::constants::{BAD_REQUEST, NO_CONTENT, NOT_FOUND};
use crate::req::Method::{GET, OPTIONS, POST};
use crate::req::Request;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot::Receiver;
use tracing::{error, info};

pub struct Server<S: Sheet + 'static> {
    listener: TcpListener,
    endpoint_path: Arc<str>,
    controller: Arc<AuthController<S>>,
}

impl<S: Sheet + 'static> Server<S> {
    pub async fn bind(
        addr: SocketAddr,
        endpoint_path: &str,
        controller: Arc<AuthController<S>>,
    ) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        Ok(Self {
            listener,
            endpoint_path: Arc::from(endpoint_path),
            controller,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr().context("no local address")
    }

    pub async fn start(self, mut shutdown_rx: Receiver<()>) -> Result<()> {
        info!(
            "Server running on http://{}{}",
            self.local_addr()?,
            self.endpoint_path
        );

        loop {
            tokio::select! {
                conn = self.listener.accept() => {
                    let (mut stream, peer) = conn?;

                    let controller = Arc::clone(&self.controller);
                    let endpoint_path = Arc::clone(&self.endpoint_path);

                    tokio::spawn(async move {
                        let (reader, writer) = stream.split();
                        if let Err(e) =
                            Self::handle_client(reader, writer, &controller, &endpoint_path).await
                        {
                            error!(%peer, "Connection error: {:#}", e);
                        }
                    });
                }
                // Shutdown signal check
                _ = &mut shutdown_rx => {
                    info!("Shutting down server...");
                    break;
                }
            }
        }
        Ok(())
    }

    pub async fn handle_client<Reader, Writer>(
        reader: Reader,
        mut writer: Writer,
        controller: &AuthController<S>,
        endpoint_path: &str,
    ) -> Result<()>
    where
        Reader: AsyncRead + Unpin,
        Writer: AsyncWrite + Unpin,
    {
        let request = match Request::new(reader).await {
            Ok(request) => request,
            Err(e) => {
                write_response(&mut writer, BAD_REQUEST, "400 Bad Request").await?;
                return Err(e.context("Failed to read request"));
            }
        };

        // Route
        let (status_line, content) = if request.path == endpoint_path {
            match request.method {
                POST => match &request.body {
                    Ok(body) => controller.dispatch(body).await,
                    Err(e) => controller.reject_body(e),
                },
                GET => controller.liveness(),
                OPTIONS => (NO_CONTENT.to_string(), String::new()),
            }
        } else {
            (NOT_FOUND.to_string(), "404 Not Found".to_string())
        };

        write_response(&mut writer, &status_line, &content).await
    }
}

async fn write_response<Writer>(
    writer: &mut Writer,
    status_line: &str,
    content: &str,
) -> Result<()>
where
    Writer: AsyncWrite + Unpin,
{
    let response = format!(
        "{}Content-Length: {}\r\nAccess-Control-Allow-Origin: *\r\nConnection: close\r\n\r\n{}",
        status_line,
        content.len(),
        content
    );
    writer
        .write_all(response.as_bytes())
        .await
        .context("Failed to write")?;
    writer.flush().await.context("Failed to flush")
}
