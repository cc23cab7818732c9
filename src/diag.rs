//! # Diagnostics sink
//!
//! The client never configures logging on its own. It is handed a
//! [`Diagnostics`] value that decides which records are emitted and under which
//! log target; the records themselves go through the `log` facade, so the
//! binary (or a test harness) chooses the backend.

use std::fmt;

use log::{Level, LevelFilter};

/// Default log target for records emitted by the storage client.
pub const DEFAULT_TARGET: &str = "gcs_helper";

#[derive(Debug, Clone)]
pub struct Diagnostics {
    level: LevelFilter,
    target: &'static str,
}

impl Diagnostics {
    pub fn new(level: LevelFilter) -> Self {
        Diagnostics {
            level,
            target: DEFAULT_TARGET,
        }
    }

    /// A sink that drops every record.
    pub fn silent() -> Self {
        Self::new(LevelFilter::Off)
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn enabled(&self, level: Level) -> bool {
        level <= self.level
    }

    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        if self.enabled(level) {
            log::log!(target: self.target, level, "{}", args);
        }
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args);
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_filter_gates_records() {
        let diag = Diagnostics::new(LevelFilter::Warn);
        assert!(diag.enabled(Level::Error));
        assert!(diag.enabled(Level::Warn));
        assert!(!diag.enabled(Level::Info));

        let silent = Diagnostics::silent();
        assert!(!silent.enabled(Level::Error));
    }

    #[test]
    fn default_is_info() {
        assert_eq!(Diagnostics::default().level(), LevelFilter::Info);
    }
}
