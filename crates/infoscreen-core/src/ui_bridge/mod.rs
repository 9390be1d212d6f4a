pub mod error;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info};

use crate::navigation::Transition;
use crate::ui_bridge::error::UiBridgeError;

/// The UI root holding one widget per active screen
pub trait ScreenContainer: Send {
    /// Get the name of this container
    fn name(&self) -> &'static str;

    /// Add the widget of a newly registered screen
    fn add_widget(&mut self, name: &str);

    /// Remove the widget of an unregistered screen
    fn remove_widget(&mut self, name: &str);

    /// Show `name`, animating in `transition` direction
    fn set_current(&mut self, name: &str, transition: Transition);

    /// Clear the current pointer once no screen is left
    fn clear_current(&mut self);

    /// Display rendered content of the current screen
    fn present(&mut self, _name: &str, _content: &str) {}
}

/// Loads and unloads each plugin's visual-description resource
pub trait ResourceLoader: Send {
    fn load(&mut self, path: &Path) -> Result<(), UiBridgeError>;

    /// Fails with [`UiBridgeError::ResourceNotFound`] when `path` is not loaded
    fn unload(&mut self, path: &Path) -> Result<(), UiBridgeError>;
}

/// Observable state of a [`HeadlessContainer`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlessState {
    /// Display size in pixels, `None` when not configured
    pub size: Option<(u32, u32)>,
    pub widgets: Vec<String>,
    pub current: Option<String>,
    pub transition: Transition,
    pub last_frame: Option<String>,
}

/// Container without a display: keeps its state and logs every change.
/// Clones share state, so a clone kept aside can observe a boxed one.
#[derive(Debug, Clone, Default)]
pub struct HeadlessContainer {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Container standing in for a `width` x `height` window
    pub fn with_size(width: u32, height: u32) -> Self {
        info!("[headless] {}x{} display", width, height);
        let state = HeadlessState {
            size: Some((width, height)),
            ..HeadlessState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Snapshot of the current state
    pub fn snapshot(&self) -> HeadlessState {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, HeadlessState> {
        // A poisoned lock only means a logging call panicked; the state is still usable
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ScreenContainer for HeadlessContainer {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn add_widget(&mut self, name: &str) {
        self.lock().widgets.push(name.to_string());
        debug!("[headless] widget added: {}", name);
    }

    fn remove_widget(&mut self, name: &str) {
        self.lock().widgets.retain(|w| w != name);
        debug!("[headless] widget removed: {}", name);
    }

    fn set_current(&mut self, name: &str, transition: Transition) {
        let mut state = self.lock();
        state.current = Some(name.to_string());
        state.transition = transition;
        info!("[headless] showing {} ({:?})", name, transition);
    }

    fn clear_current(&mut self) {
        let mut state = self.lock();
        state.current = None;
        state.last_frame = None;
        info!("[headless] no screens left to show");
    }

    fn present(&mut self, name: &str, content: &str) {
        self.lock().last_frame = Some(content.to_string());
        info!("[headless] {}:\n{}", name, content);
    }
}

/// Reference-counted set of loaded resources.
///
/// `new()` reads each resource from disk on load, `in_memory()` only
/// tracks the paths.
#[derive(Debug, Clone, Default)]
pub struct TrackingResourceLoader {
    loaded: Arc<Mutex<HashMap<PathBuf, usize>>>,
    read_files: bool,
}

impl TrackingResourceLoader {
    pub fn new() -> Self {
        Self {
            loaded: Arc::default(),
            read_files: true,
        }
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load count of `path`, zero when not loaded
    pub fn load_count(&self, path: &Path) -> usize {
        self.loaded
            .lock()
            .map(|loaded| loaded.get(path).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    fn lock(&self, operation: &str) -> Result<MutexGuard<'_, HashMap<PathBuf, usize>>, UiBridgeError> {
        self.loaded.lock().map_err(|_| UiBridgeError::LockError {
            entity: "TrackingResourceLoader".to_string(),
            operation: operation.to_string(),
        })
    }
}

impl ResourceLoader for TrackingResourceLoader {
    fn load(&mut self, path: &Path) -> Result<(), UiBridgeError> {
        if self.read_files {
            fs::read_to_string(path).map_err(|source| UiBridgeError::ResourceLoadFailed {
                path: path.to_path_buf(),
                source,
            })?;
        }
        *self.lock("load")?.entry(path.to_path_buf()).or_insert(0) += 1;
        debug!("Resource loaded: {}", path.display());
        Ok(())
    }

    fn unload(&mut self, path: &Path) -> Result<(), UiBridgeError> {
        let mut loaded = self.lock("unload")?;
        match loaded.get_mut(path) {
            Some(count) if *count > 1 => *count -= 1,
            Some(_) => {
                loaded.remove(path);
            }
            None => return Err(UiBridgeError::ResourceNotFound(path.to_path_buf())),
        }
        debug!("Resource unloaded: {}", path.display());
        Ok(())
    }
}
