/// Application name
pub const APP_NAME: &str = "InfoScreen";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the synthetic screen listing activation failures
pub const FAILED_SCREEN_NAME: &str = "FAILEDSCREENS";

/// Manifest file expected in every plugin directory
pub const MANIFEST_FILE_NAME: &str = "screen.json";

/// Default configuration file
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Default plugins directory
pub const DEFAULT_PLUGINS_DIR: &str = "screens";

/// Window size of the official Raspberry Pi display
pub const DEFAULT_WINDOW_WIDTH: u32 = 800;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 480;

/// Default address the control API listens on
pub const DEFAULT_API_BIND: &str = "127.0.0.1";

/// Default port for the control API
pub const DEFAULT_API_PORT: u16 = 8089;
