//! Lexer configuration.

/// In-memory options for one lexer run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexerOptions {
    /// Name reported by `__FILE__` and attached to diagnostics.
    pub filename: String,
    /// Line number of the first source line.
    pub first_line: u32,
    /// Emit `warning`-level diagnostics (verbose mode). `warn`-level ones
    /// are always emitted.
    pub verbose_warnings: bool,
    /// Whether the first token sits at command-start position.
    pub command_start: bool,
}

impl Default for LexerOptions {
    fn default() -> Self {
        LexerOptions {
            filename: String::from("(ripper)"),
            first_line: 1,
            verbose_warnings: true,
            command_start: true,
        }
    }
}

impl LexerOptions {
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    #[must_use]
    pub fn with_first_line(mut self, line: u32) -> Self {
        self.first_line = line;
        self
    }

    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.verbose_warnings = false;
        self
    }
}
