//! Text screens for the InfoScreen shell.
//!
//! - `MessageScreen` shows a fixed message. Param `text` (required) is a
//!   string or a list of lines, `title` is optional.
//! - `TickerScreen` shows one item of `items` per render, cycling through
//!   them. With `hold_lock: true` it locks navigation while it is active.
use std::cell::Cell;

use infoscreen_core::plugin_system::{ModuleRegistry, Screen, ScreenContext};
use infoscreen_core::shell::ShellHandle;
use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;

pub const MODULE_NAME: &str = "message";
pub const MESSAGE_ENTRY_POINT: &str = "MessageScreen";
pub const TICKER_ENTRY_POINT: &str = "TickerScreen";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessageError {
    #[error("screen '{0}' needs a 'text' param")]
    MissingText(String),
    #[error("screen '{0}' needs a non-empty 'items' param")]
    MissingItems(String),
}

/// A single line or several
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Text {
    Line(String),
    Lines(Vec<String>),
}

impl Text {
    fn into_lines(self) -> Vec<String> {
        match self {
            Text::Line(line) => vec![line],
            Text::Lines(lines) => lines,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MessageScreen {
    name: String,
    title: Option<String>,
    lines: Vec<String>,
}

impl MessageScreen {
    pub fn from_context(ctx: &ScreenContext) -> Result<Self, MessageError> {
        let lines = ctx
            .param::<Text>("text")
            .map(Text::into_lines)
            .ok_or_else(|| MessageError::MissingText(ctx.name.clone()))?;
        Ok(Self {
            name: ctx.name.clone(),
            title: ctx.param("title"),
            lines,
        })
    }
}

impl Screen for MessageScreen {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self) -> String {
        let mut out = Vec::with_capacity(self.lines.len() + 2);
        if let Some(title) = &self.title {
            out.push(title.clone());
            out.push("=".repeat(title.chars().count()));
        }
        out.extend(self.lines.iter().cloned());
        out.join("\n")
    }
}

pub struct TickerScreen {
    name: String,
    items: Vec<String>,
    position: Cell<usize>,
    master: ShellHandle,
    holds_lock: bool,
}

impl TickerScreen {
    pub fn from_context(ctx: &ScreenContext) -> Result<Self, MessageError> {
        let items: Vec<String> = ctx.param("items").unwrap_or_default();
        if items.is_empty() {
            return Err(MessageError::MissingItems(ctx.name.clone()));
        }

        let holds_lock = ctx.param_or("hold_lock", false);
        if holds_lock {
            if let Err(e) = ctx.master.toggle_lock(Some(true)) {
                warn!("Ticker '{}' could not lock navigation: {}", ctx.name, e);
            }
        }

        Ok(Self {
            name: ctx.name.clone(),
            items,
            position: Cell::new(0),
            master: ctx.master.clone(),
            holds_lock,
        })
    }
}

impl Screen for TickerScreen {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self) -> String {
        let position = self.position.get();
        self.position.set((position + 1) % self.items.len());
        format!("[{}/{}] {}", position + 1, self.items.len(), self.items[position])
    }

    fn unload(&mut self) {
        if self.holds_lock {
            debug!("Ticker '{}' releasing navigation lock", self.name);
            // The shell may already be gone during shutdown
            let _ = self.master.toggle_lock(Some(false));
        }
    }
}

/// Register the message module with the host's module registry
pub fn register(modules: &mut ModuleRegistry) {
    modules.register(MODULE_NAME, MESSAGE_ENTRY_POINT, |ctx: ScreenContext| {
        Ok(Box::new(MessageScreen::from_context(&ctx)?) as Box<dyn Screen>)
    });
    modules.register(MODULE_NAME, TICKER_ENTRY_POINT, |ctx: ScreenContext| {
        Ok(Box::new(TickerScreen::from_context(&ctx)?) as Box<dyn Screen>)
    });
}
