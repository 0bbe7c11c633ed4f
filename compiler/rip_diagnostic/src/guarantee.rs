//! Type-level proof that an error was reported.

use thiserror::Error;

/// Zero-sized token obtainable only by recording an error in a
/// [`DiagnosticQueue`](crate::DiagnosticQueue).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
#[error("error already reported")]
pub struct ErrorGuaranteed(());

impl ErrorGuaranteed {
    pub(crate) const fn new() -> Self {
        ErrorGuaranteed(())
    }
}
