//! Parse configuration and result.

use rip_diagnostic::Diagnostic;
use rip_ir::NodeHandle;
use rip_lexer::{Lexer, LexerOptions, MagicSettings};
use rip_lexer_core::{SourceEncoding, SourceReader};

/// Options for one parse.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub lexer: LexerOptions,
}

impl ParseOptions {
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.lexer = self.lexer.with_filename(filename);
        self
    }

    #[must_use]
    pub fn with_verbose_warnings(mut self, verbose: bool) -> Self {
        self.lexer.verbose_warnings = verbose;
        self
    }
}

/// What a parse produced.
///
/// `root` is the handle the sink returned for the `program` event, or
/// `None` when a syntax error stopped the parse. Lexical errors do not stop
/// the parse, so a tree can exist while `errored` is set; anything built
/// after the first error is best-effort.
#[derive(Clone, Debug)]
pub struct ParseOutcome {
    pub root: Option<NodeHandle>,
    /// Sticky: true once any error diagnostic was reported.
    pub errored: bool,
    pub diagnostics: Vec<Diagnostic>,
    pub encoding: SourceEncoding,
    pub magic: MagicSettings,
}

impl ParseOutcome {
    pub(crate) fn from_lexer<R: SourceReader>(
        root: Option<NodeHandle>,
        lexer: &mut Lexer<'_, R>,
    ) -> Self {
        ParseOutcome {
            root,
            errored: lexer.errored(),
            encoding: lexer.encoding(),
            magic: lexer.magic().clone(),
            diagnostics: lexer.diagnostics_mut().flush(),
        }
    }

    /// Parsed to the end without any error.
    pub fn is_clean(&self) -> bool {
        self.root.is_some() && !self.errored
    }

    /// Messages of every diagnostic, in report order.
    pub fn messages(&self) -> Vec<&str> {
        self.diagnostics.iter().map(|d| d.message.as_str()).collect()
    }
}
