use std::net::SocketAddr;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};

use crate::control::{ControlSurface, parse_command};
use crate::kernel::error::{Error, Result};
use crate::shell::{ShellCommand, ShellHandle};

const SURFACE_NAME: &str = "tcp";

/// Line protocol on a TCP port. One reply line per command: `ok` or
/// `error: <reason>`. Shutting the shell down is not allowed remotely.
#[derive(Debug)]
pub struct TcpControl {
    listener: TcpListener,
}

impl TcpControl {
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| Error::control(SURFACE_NAME, e))?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|e| Error::control(SURFACE_NAME, e))
    }
}

#[async_trait]
impl ControlSurface for TcpControl {
    fn name(&self) -> &str {
        SURFACE_NAME
    }

    async fn serve(self: Box<Self>, handle: ShellHandle) -> Result<()> {
        if let Ok(addr) = self.listener.local_addr() {
            info!("Control surface listening on {}", addr);
        }
        loop {
            if handle.is_closed() {
                return Ok(());
            }
            let (stream, peer) = self
                .listener
                .accept()
                .await
                .map_err(|e| Error::control(SURFACE_NAME, e))?;
            debug!("Control connection from {}", peer);
            let handle = handle.clone();
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, handle).await {
                    warn!("Control connection from {} failed: {}", peer, e);
                }
            });
        }
    }
}

async fn handle_connection(stream: TcpStream, handle: ShellHandle) -> std::io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let reply = match parse_command(&line) {
            Ok(ShellCommand::Shutdown) => "error: shutdown is not available remotely".to_string(),
            Ok(command) => match handle.send(command) {
                Ok(()) => "ok".to_string(),
                Err(e) => format!("error: {}", e),
            },
            Err(e) => format!("error: {}", e),
        };
        writer.write_all(reply.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        if handle.is_closed() {
            break;
        }
    }
    Ok(())
}
