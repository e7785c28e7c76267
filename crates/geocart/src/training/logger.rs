//! Verbosity-gated logging for tree induction.
//!
//! Messages go through the `log` facade; the caller's logger decides where
//! they end up. [`Verbosity`] only controls which messages are emitted.

use std::fmt;

/// How much the builder reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Nothing.
    #[default]
    Silent,
    /// Degenerate inputs (e.g. an empty dataset).
    Warning,
    /// One summary per build.
    Info,
    /// One line per node decision.
    Debug,
}

/// Logger handed to the tree builder.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrainingLogger {
    verbosity: Verbosity,
}

impl TrainingLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    #[inline]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    #[inline]
    pub fn enabled(&self, level: Verbosity) -> bool {
        level != Verbosity::Silent && self.verbosity >= level
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        if self.enabled(Verbosity::Warning) {
            log::warn!("{args}");
        }
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        if self.enabled(Verbosity::Info) {
            log::info!("{args}");
        }
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        if self.enabled(Verbosity::Debug) {
            log::debug!("{args}");
        }
    }
}
