//! Clock screen for the InfoScreen shell.
//!
//! Params (all optional):
//! - `label`: line shown above the time
//! - `show_seconds`: render `HH:MM:SS` instead of `HH:MM` (default `true`)
//! - `utc_offset_minutes`: offset applied to UTC (default `0`)
use std::time::{SystemTime, UNIX_EPOCH};

use infoscreen_core::plugin_system::{ModuleRegistry, Screen, ScreenContext};
use log::debug;

/// Module locator the plugin registers under
pub const MODULE_NAME: &str = "clock";
pub const ENTRY_POINT: &str = "ClockScreen";

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone)]
pub struct ClockScreen {
    name: String,
    label: Option<String>,
    show_seconds: bool,
    utc_offset_minutes: i64,
}

impl ClockScreen {
    pub fn from_context(ctx: &ScreenContext) -> Self {
        let screen = Self {
            name: ctx.name.clone(),
            label: ctx.param("label"),
            show_seconds: ctx.param_or("show_seconds", true),
            utc_offset_minutes: ctx.param_or("utc_offset_minutes", 0),
        };
        debug!("Clock screen '{}' created ({:?})", screen.name, screen.label);
        screen
    }

    /// Time of day for `epoch_secs` seconds since the Unix epoch
    pub fn format_time(&self, epoch_secs: u64) -> String {
        let local = epoch_secs as i64 + self.utc_offset_minutes * 60;
        let of_day = local.rem_euclid(SECONDS_PER_DAY);
        let (hours, minutes, seconds) = (of_day / 3600, of_day % 3600 / 60, of_day % 60);
        if self.show_seconds {
            format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
        } else {
            format!("{:02}:{:02}", hours, minutes)
        }
    }

    fn render_at(&self, epoch_secs: u64) -> String {
        let time = self.format_time(epoch_secs);
        match &self.label {
            Some(label) => format!("{}\n{}", label, time),
            None => time,
        }
    }
}

impl Screen for ClockScreen {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0);
        self.render_at(now)
    }
}

/// Register the clock module with the host's module registry
pub fn register(modules: &mut ModuleRegistry) {
    modules.register(MODULE_NAME, ENTRY_POINT, |ctx: ScreenContext| {
        Ok(Box::new(ClockScreen::from_context(&ctx)) as Box<dyn Screen>)
    });
}
