//! Runtime configuration.
//!
//! Configuration is built once and handed to [`crate::engine::ViewTree::new`];
//! nothing reads ambient global switches.

use std::env;

/// Environment variable toggling precondition checks (`on` / `off`).
pub const CHECKS_ENV: &str = "SPARK_VIEW_CHECKS";

/// Environment variable selecting the scheduler (`immediate` / `frame`).
pub const SCHEDULER_ENV: &str = "SPARK_VIEW_SCHEDULER";

/// Whether walks run the extra consistency checks.
///
/// With checks enabled, walks carry a hop budget (so a corrupted parent
/// chain reports [`crate::NavError::Cycle`] instead of spinning) and
/// descriptors are verified against the view's template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckMode {
    Enabled,
    Disabled,
}

impl CheckMode {
    #[inline]
    pub const fn enabled(self) -> bool {
        matches!(self, CheckMode::Enabled)
    }
}

impl Default for CheckMode {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            CheckMode::Enabled
        } else {
            CheckMode::Disabled
        }
    }
}

/// Which [`crate::engine::Scheduler`] root contexts are built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerKind {
    /// Run scheduled work inline.
    Immediate,
    /// Queue work until the host flushes a frame.
    #[default]
    Frame,
}

/// Configuration threaded through tree construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavConfig {
    pub checks: CheckMode,
    pub scheduler: SchedulerKind,
}

impl NavConfig {
    /// Checks on, frame scheduler.
    pub const fn checked() -> Self {
        Self {
            checks: CheckMode::Enabled,
            scheduler: SchedulerKind::Frame,
        }
    }

    /// Defaults overridden by [`CHECKS_ENV`] and [`SCHEDULER_ENV`].
    ///
    /// Unrecognized values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = env::var(CHECKS_ENV) {
            match parse_checks(&value) {
                Some(checks) => config.checks = checks,
                None => tracing::warn!("ignoring {}={:?}", CHECKS_ENV, value),
            }
        }
        if let Ok(value) = env::var(SCHEDULER_ENV) {
            match parse_scheduler(&value) {
                Some(kind) => config.scheduler = kind,
                None => tracing::warn!("ignoring {}={:?}", SCHEDULER_ENV, value),
            }
        }
        config
    }

    pub const fn with_checks(mut self, checks: CheckMode) -> Self {
        self.checks = checks;
        self
    }

    pub const fn with_scheduler(mut self, scheduler: SchedulerKind) -> Self {
        self.scheduler = scheduler;
        self
    }
}

fn parse_checks(value: &str) -> Option<CheckMode> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "1" | "true" => Some(CheckMode::Enabled),
        "off" | "0" | "false" => Some(CheckMode::Disabled),
        _ => None,
    }
}

fn parse_scheduler(value: &str) -> Option<SchedulerKind> {
    match value.trim().to_ascii_lowercase().as_str() {
        "immediate" => Some(SchedulerKind::Immediate),
        "frame" => Some(SchedulerKind::Frame),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_checks() {
        assert_eq!(parse_checks("on"), Some(CheckMode::Enabled));
        assert_eq!(parse_checks(" OFF "), Some(CheckMode::Disabled));
        assert_eq!(parse_checks("maybe"), None);
    }

    #[test]
    fn test_parse_scheduler() {
        assert_eq!(parse_scheduler("immediate"), Some(SchedulerKind::Immediate));
        assert_eq!(parse_scheduler("Frame"), Some(SchedulerKind::Frame));
        assert_eq!(parse_scheduler("raf"), None);
    }

    #[test]
    fn test_builders() {
        let config = NavConfig::checked().with_scheduler(SchedulerKind::Immediate);
        assert!(config.checks.enabled());
        assert_eq!(config.scheduler, SchedulerKind::Immediate);
        assert!(!config.with_checks(CheckMode::Disabled).checks.enabled());
    }
}
