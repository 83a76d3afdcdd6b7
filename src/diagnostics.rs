//! Diagnostic sink used by the tag resolver
//!
//! Resolution reports repository-level problems through this trait instead of
//! a process-wide logger, so callers decide where warnings end up.

/// Receiver of repository-level diagnostics
pub trait DiagnosticSink: Send + Sync {
    /// A repository was skipped but resolution continues
    fn warn(&self, repository: &str, message: &str);

    /// A repository failed and resolution is about to abort
    fn severe(&self, repository: &str, message: &str);
}

/// Sink that forwards diagnostics to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn warn(&self, repository: &str, message: &str) {
        tracing::warn!(repository = %repository, "{}", message);
    }

    fn severe(&self, repository: &str, message: &str) {
        tracing::error!(repository = %repository, "{}", message);
    }
}

#[cfg(test)]
pub(crate) use recording::{RecordingSink, Severity};

/// In-memory sink for asserting on diagnostics in tests
#[cfg(test)]
mod recording {
    use std::sync::Mutex;

    use super::DiagnosticSink;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) enum Severity {
        Warning,
        Severe,
    }

    /// A diagnostic captured by [`RecordingSink`]
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) struct Diagnostic {
        pub severity: Severity,
        pub repository: String,
        pub message: String,
    }

    /// Sink that keeps every diagnostic in memory
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSink {
        diagnostics: Mutex<Vec<Diagnostic>>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn diagnostics(&self) -> Vec<Diagnostic> {
            self.diagnostics
                .lock()
                .map(|d| d.clone())
                .unwrap_or_default()
        }

        fn push(&self, severity: Severity, repository: &str, message: &str) {
            if let Ok(mut diagnostics) = self.diagnostics.lock() {
                diagnostics.push(Diagnostic {
                    severity,
                    repository: repository.to_string(),
                    message: message.to_string(),
                });
            }
        }
    }

    impl DiagnosticSink for RecordingSink {
        fn warn(&self, repository: &str, message: &str) {
            self.push(Severity::Warning, repository, message);
        }

        fn severe(&self, repository: &str, message: &str) {
            self.push(Severity::Severe, repository, message);
        }
    }
}
