//! # InfoScreen Navigation
//!
//! Circular navigation over the active screens. [`NavigationController`]
//! owns the single [`NavigationState`] of a shell: the ordered screen
//! names, the current index, the lock flag and the transition hint handed
//! to the UI root.
//!
//! How `next(reverse = true)` moves is decided by a [`StepPolicy`]:
//! [`StepPolicy::Legacy`] steps backwards in both directions and only flips
//! the transition hint, [`StepPolicy::Mirrored`] steps forwards when
//! reversed.
use log::debug;
use serde::{Deserialize, Serialize};

/// Direction the UI root should animate in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transition {
    #[default]
    Left,
    Right,
}

/// Index arithmetic of `next(reverse)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepPolicy {
    /// Both directions step to the previous screen, only the hint differs
    Legacy,
    /// Forward steps to the previous screen, reverse to the next one
    #[default]
    Mirrored,
}

impl StepPolicy {
    fn step(self, reverse: bool) -> (isize, Transition) {
        match (self, reverse) {
            (_, false) => (-1, Transition::Left),
            (StepPolicy::Legacy, true) => (-1, Transition::Right),
            (StepPolicy::Mirrored, true) => (1, Transition::Right),
        }
    }
}

/// Process-wide navigation state, owned by one controller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    available: Vec<String>,
    /// `Some` and in range whenever `available` is non-empty
    index: Option<usize>,
    locked: bool,
    current: Option<String>,
    transition: Transition,
}

impl NavigationState {
    pub fn available(&self) -> &[String] {
        &self.available
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn transition(&self) -> Transition {
        self.transition
    }
}

#[derive(Debug, Clone, Default)]
pub struct NavigationController {
    state: NavigationState,
    policy: StepPolicy,
}

impl NavigationController {
    pub fn new(policy: StepPolicy) -> Self {
        Self {
            state: NavigationState::default(),
            policy,
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn policy(&self) -> StepPolicy {
        self.policy
    }

    pub fn available(&self) -> &[String] {
        &self.state.available
    }

    pub fn index(&self) -> Option<usize> {
        self.state.index
    }

    pub fn current(&self) -> Option<&str> {
        self.state.current()
    }

    pub fn is_locked(&self) -> bool {
        self.state.locked
    }

    pub fn transition(&self) -> Transition {
        self.state.transition
    }

    /// Replace the ordering, e.g. after a bulk activation pass.
    /// The first screen becomes current. The lock flag is kept.
    pub fn reset<I>(&mut self, names: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.state.available = names.into_iter().collect();
        if self.state.available.is_empty() {
            self.state.index = None;
            self.state.current = None;
        } else {
            self.state.index = Some(0);
            self.state.current = Some(self.state.available[0].clone());
        }
    }

    /// Advance one step. Returns `false` when locked or empty.
    pub fn next(&mut self, reverse: bool) -> bool {
        if self.state.locked {
            debug!("Navigation locked, ignoring next (reverse: {})", reverse);
            return false;
        }
        let len = self.state.available.len();
        if len == 0 {
            return false;
        }

        let (step, transition) = self.policy.step(reverse);
        let index = self.state.index.unwrap_or(0) as isize;
        let next = (index + step).rem_euclid(len as isize) as usize;

        self.state.index = Some(next);
        self.state.transition = transition;
        self.state.current = Some(self.state.available[next].clone());
        debug!("Navigated to '{}' (index {})", self.state.available[next], next);
        true
    }

    /// Make `name` current. Unknown names are ignored and return `false`.
    pub fn switch_to(&mut self, name: &str) -> bool {
        match self.state.available.iter().position(|n| n == name) {
            Some(position) => {
                self.state.index = Some(position);
                self.state.current = Some(name.to_string());
                true
            }
            None => {
                debug!("Screen '{}' is not active, ignoring switch", name);
                false
            }
        }
    }

    /// Flip the lock, or set it when `explicit` is given. Returns the new value.
    pub fn toggle_lock(&mut self, explicit: Option<bool>) -> bool {
        self.state.locked = explicit.unwrap_or(!self.state.locked);
        debug!("Navigation lock is now {}", self.state.locked);
        self.state.locked
    }

    /// Append a newly registered screen and make it current
    pub fn on_screen_added(&mut self, name: &str) {
        self.state.available.push(name.to_string());
        self.switch_to(name);
    }

    /// Advance once per occurrence of `name`, then drop every occurrence
    /// and rebase the index. Returns the number of occurrences removed.
    pub fn on_screen_removed(&mut self, name: &str) -> usize {
        let occurrences = self.state.available.iter().filter(|n| *n == name).count();
        if occurrences == 0 {
            return 0;
        }
        for _ in 0..occurrences {
            self.next(false);
        }
        self.state.available.retain(|n| n != name);
        self.rebase();
        occurrences
    }

    fn rebase(&mut self) {
        let len = self.state.available.len();
        if len == 0 {
            self.state.index = None;
            self.state.current = None;
            return;
        }

        let still_present = self
            .state
            .current
            .as_ref()
            .and_then(|current| self.state.available.iter().position(|n| n == current));

        match still_present {
            Some(position) => self.state.index = Some(position),
            None => {
                // The removed screen was current (e.g. while locked)
                let index = self.state.index.unwrap_or(0).min(len - 1);
                self.state.index = Some(index);
                self.state.current = Some(self.state.available[index].clone());
            }
        }
    }
}
