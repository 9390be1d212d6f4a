use async_trait::async_trait;
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use infoscreen_core::control::{ControlSurface, parse_command};
use infoscreen_core::kernel::error::{Error, Result};
use infoscreen_core::{ShellCommand, ShellHandle};

/// Reads control commands from stdin, one per line.
///
/// `quit` or the end of input shuts the shell down.
#[derive(Debug)]
pub struct StdinControl;

#[async_trait]
impl ControlSurface for StdinControl {
    fn name(&self) -> &str {
        "stdin"
    }

    async fn serve(self: Box<Self>, handle: ShellHandle) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| Error::control("stdin", e))?
        {
            if line.trim().is_empty() {
                continue;
            }
            match parse_command(&line) {
                Ok(ShellCommand::Shutdown) => return handle.shutdown(),
                Ok(command) => handle.send(command)?,
                Err(e) => warn!("Ignoring stdin command '{}': {}", line.trim(), e),
            }
        }

        info!("stdin closed, shutting down");
        handle.shutdown()
    }
}
