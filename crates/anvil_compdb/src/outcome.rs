//! Best-effort operation results.

use crate::error::DatabaseWarning;

/// The result of a best-effort database operation.
///
/// Recording and saving never fail a build. Instead they return an `Outcome`
/// that may carry a [`DatabaseWarning`]; the caller chooses whether to log it,
/// forward it, or drop it.
#[must_use = "an Outcome may carry a warning that should be logged or inspected"]
#[derive(Debug, Default)]
pub struct Outcome {
    warning: Option<DatabaseWarning>,
}

impl Outcome {
    /// An outcome with nothing to report.
    pub fn clean() -> Self {
        Self { warning: None }
    }

    /// An outcome that completed in degraded form.
    pub fn warned(warning: DatabaseWarning) -> Self {
        Self {
            warning: Some(warning),
        }
    }

    /// Returns `true` if the operation completed without any warning.
    pub fn is_clean(&self) -> bool {
        self.warning.is_none()
    }

    /// Returns the warning, if any.
    pub fn warning(&self) -> Option<&DatabaseWarning> {
        self.warning.as_ref()
    }

    /// Consumes the outcome, returning the warning, if any.
    pub fn into_warning(self) -> Option<DatabaseWarning> {
        self.warning
    }

    /// Emits the warning, if any, on the `log` channel.
    pub fn log(self) {
        if let Some(warning) = self.warning {
            log::warn!("{warning}");
        }
    }
}

impl From<DatabaseWarning> for Outcome {
    fn from(warning: DatabaseWarning) -> Self {
        Self::warned(warning)
    }
}
