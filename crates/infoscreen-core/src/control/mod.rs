//! # InfoScreen Control Surfaces
//!
//! External inputs that drive a running shell: remote line protocols,
//! the terminal, timers. A [`ControlSurface`] only ever talks to the shell
//! through a [`ShellHandle`], so it can reach the incremental API
//! (navigation, lock, add/remove/reload) and nothing else.
//!
//! Every surface understands the same text commands, parsed by
//! [`parse_command`]:
//!
//! ```text
//! next | prev | lock [on|off] | switch NAME | add NAME | remove NAME | reload NAME | quit
//! ```
pub mod tcp;

pub use tcp::TcpControl;

use async_trait::async_trait;
use thiserror::Error;

use crate::kernel::error::Result;
use crate::shell::{ShellCommand, ShellHandle};

/// A long-running input that forwards commands to the shell
#[async_trait]
pub trait ControlSurface: Send {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// Serve until the input is exhausted or the shell closes
    async fn serve(self: Box<Self>, handle: ShellHandle) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("command '{0}' needs a screen name")]
    MissingArgument(String),
    #[error("invalid lock state '{0}', expected 'on' or 'off'")]
    InvalidLockState(String),
}

/// Parse one line of the control protocol
pub fn parse_command(line: &str) -> std::result::Result<ShellCommand, CommandParseError> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    if verb.is_empty() {
        return Err(CommandParseError::Empty);
    }

    let verb = verb.to_lowercase();
    let name = |verb: &str| {
        if rest.is_empty() {
            Err(CommandParseError::MissingArgument(verb.to_string()))
        } else {
            Ok(rest.to_string())
        }
    };

    match verb.as_str() {
        "next" => Ok(ShellCommand::Next { reverse: false }),
        "prev" | "previous" => Ok(ShellCommand::Next { reverse: true }),
        "lock" => match rest.to_lowercase().as_str() {
            "" => Ok(ShellCommand::ToggleLock(None)),
            "on" | "true" => Ok(ShellCommand::ToggleLock(Some(true))),
            "off" | "false" => Ok(ShellCommand::ToggleLock(Some(false))),
            _ => Err(CommandParseError::InvalidLockState(rest.to_string())),
        },
        "switch" => name("switch").map(ShellCommand::SwitchTo),
        "add" => name("add").map(ShellCommand::AddScreen),
        "remove" => name("remove").map(ShellCommand::RemoveScreen),
        "reload" => name("reload").map(ShellCommand::ReloadScreen),
        "quit" | "exit" | "shutdown" => Ok(ShellCommand::Shutdown),
        _ => Err(CommandParseError::Unknown(verb.clone())),
    }
}
