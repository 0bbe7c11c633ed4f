//! Syntax errors and grammar-level diagnostics.
//!
//! A syntax error is reported once, as a `parse_error` diagnostic, and the
//! [`ErrorGuaranteed`] it returns unwinds the whole parse. The softer errors
//! (bad assignment target, duplicated parameter, bad class name) also
//! dispatch their parser event and let the parse continue.

#[cfg(test)]
mod tests;

use rip_diagnostic::{Diagnostic, ErrorGuaranteed};
use rip_ir::{Arg, DiagnosticEvent, NodeHandle, ParserEvent, Token, TokenKind};
use rip_lexer_core::SourceReader;
use tracing::debug;

use crate::Parser;

/// How the lookahead reads in "unexpected X".
fn found(token: &Token) -> String {
    match token.kind {
        TokenKind::EndOfInput => "end-of-input".to_owned(),
        TokenKind::Newline => "'\\n'".to_owned(),
        kind if kind.is_keyword() => format!("`{}'", token.text),
        kind if kind.describe() == "operator" => format!("'{}'", token.text),
        kind => format!("{} `{}'", kind.describe(), token.text),
    }
}

impl<R: SourceReader> Parser<'_, R> {
    /// Report the lookahead as unexpected.
    pub(crate) fn unexpected(&mut self, expecting: Option<&str>) -> ErrorGuaranteed {
        let mut message = format!("syntax error, unexpected {}", found(&self.current));
        if let Some(expecting) = expecting {
            message.push_str(", expecting ");
            message.push_str(expecting);
        }
        debug!(%message, kind = ?self.current.kind, "syntax error");
        let diag = Diagnostic::error(DiagnosticEvent::ParseError)
            .with_message(message)
            .at(self.current.span, self.current.pos);
        self.lexer.emit_error(diag)
    }

    /// Report a recoverable grammar error at `token` and dispatch its event
    /// wrapping `node`.
    pub(crate) fn soft_error(
        &mut self,
        event: ParserEvent,
        kind: DiagnosticEvent,
        message: String,
        token: &Token,
        node: NodeHandle,
    ) -> NodeHandle {
        let diag = Diagnostic::error(kind)
            .with_message(message.clone())
            .at(token.span, token.pos);
        self.lexer.report(diag);
        self.dispatch(event, &[Arg::Text(message), node.into()])
    }

    /// Warning shown only in verbose mode.
    pub(crate) fn verbose_warning(&mut self, message: String, token: &Token) {
        if !self.lexer.options().verbose_warnings {
            return;
        }
        let diag = Diagnostic::warning(DiagnosticEvent::Warning)
            .with_message(message)
            .at(token.span, token.pos);
        self.lexer.report(diag);
    }
}
