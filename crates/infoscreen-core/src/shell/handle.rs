use tokio::sync::mpsc;

use crate::kernel::error::{Error, Result};

/// Requests plugins and control surfaces can make of the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Next { reverse: bool },
    SwitchTo(String),
    ToggleLock(Option<bool>),
    AddScreen(String),
    RemoveScreen(String),
    ReloadScreen(String),
    Shutdown,
}

/// Cloneable back-reference to the shell.
///
/// Commands are queued and applied by the shell between UI events, so a
/// screen may call back into the shell from its constructor or its
/// `unload` hook without re-entering it.
#[derive(Debug, Clone)]
pub struct ShellHandle {
    sender: mpsc::UnboundedSender<ShellCommand>,
}

impl ShellHandle {
    /// Create a handle together with the receiving end of its queue
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ShellCommand>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn send(&self, command: ShellCommand) -> Result<()> {
        self.sender.send(command).map_err(|_| Error::ShellClosed)
    }

    pub fn next(&self) -> Result<()> {
        self.send(ShellCommand::Next { reverse: false })
    }

    pub fn previous(&self) -> Result<()> {
        self.send(ShellCommand::Next { reverse: true })
    }

    pub fn switch_to(&self, name: &str) -> Result<()> {
        self.send(ShellCommand::SwitchTo(name.to_string()))
    }

    pub fn toggle_lock(&self, explicit: Option<bool>) -> Result<()> {
        self.send(ShellCommand::ToggleLock(explicit))
    }

    pub fn add_screen(&self, name: &str) -> Result<()> {
        self.send(ShellCommand::AddScreen(name.to_string()))
    }

    pub fn remove_screen(&self, name: &str) -> Result<()> {
        self.send(ShellCommand::RemoveScreen(name.to_string()))
    }

    pub fn reload_screen(&self, name: &str) -> Result<()> {
        self.send(ShellCommand::ReloadScreen(name.to_string()))
    }

    pub fn shutdown(&self) -> Result<()> {
        self.send(ShellCommand::Shutdown)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
