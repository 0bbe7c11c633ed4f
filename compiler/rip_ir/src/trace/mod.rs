//! Reference sinks.
//!
//! - [`TraceBuilder`] keeps every event as a node and renders the result as
//!   an s-expression, one node per dispatched event.
//! - [`TokenRecorder`] keeps only scanner events, in source order; its
//!   concatenated texts reproduce the input byte-for-byte.

#[cfg(test)]
mod tests;

use std::fmt::Write as _;

use crate::{Arg, DiagnosticEvent, Dispatch, Event, EventPos, NodeHandle, ScannerEvent};

/// A recorded diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordedDiagnostic {
    pub event: DiagnosticEvent,
    pub message: String,
    pub at: EventPos,
}

/// One dispatched event.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceNode {
    pub event: Event,
    pub args: Vec<Arg>,
    pub at: EventPos,
}

/// Sink that keeps every event, indexed by the handle it returned.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceBuilder {
    nodes: Vec<TraceNode>,
    diagnostics: Vec<RecordedDiagnostic>,
}

impl TraceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, handle: NodeHandle) -> Option<&TraceNode> {
        if handle.is_none() {
            return None;
        }
        self.nodes.get(handle.raw() as usize)
    }

    /// All events in dispatch order.
    pub fn nodes(&self) -> &[TraceNode] {
        &self.nodes
    }

    pub fn diagnostics(&self) -> &[RecordedDiagnostic] {
        &self.diagnostics
    }

    /// Names of every parser event, in dispatch order.
    pub fn parser_event_names(&self) -> Vec<&'static str> {
        self.nodes
            .iter()
            .filter(|n| !n.event.is_scanner())
            .map(|n| n.event.name())
            .collect()
    }

    /// Concatenated scanner-event text in source order.
    pub fn scanned_text(&self) -> String {
        let mut scanned: Vec<&TraceNode> =
            self.nodes.iter().filter(|n| n.event.is_scanner()).collect();
        scanned.sort_by_key(|n| n.at.offset);
        let mut out = String::new();
        for node in scanned {
            if let Some(Arg::Text(text)) = node.args.first() {
                out.push_str(text);
            }
        }
        out
    }

    /// Render the subtree rooted at `root`.
    ///
    /// Scanner events render as `[:@name, "text", [line, col]]`, parser
    /// events as `[:name, args...]`.
    pub fn sexp(&self, root: NodeHandle) -> String {
        let mut out = String::new();
        self.write_handle(&mut out, root);
        out
    }

    fn write_handle(&self, out: &mut String, handle: NodeHandle) {
        let Some(node) = self.node(handle) else {
            out.push_str("nil");
            return;
        };
        match node.event {
            Event::Scanner(ev) => {
                let text = match node.args.first() {
                    Some(Arg::Text(text)) => text.as_str(),
                    _ => "",
                };
                let _ = write!(
                    out,
                    "[:@{}, {:?}, [{}, {}]]",
                    ev.name(),
                    text,
                    node.at.line,
                    node.at.column
                );
            }
            Event::Parser(ev) => {
                out.push_str("[:");
                out.push_str(ev.name());
                for arg in &node.args {
                    out.push_str(", ");
                    self.write_arg(out, arg);
                }
                out.push(']');
            }
        }
    }

    fn write_arg(&self, out: &mut String, arg: &Arg) {
        match arg {
            Arg::Nil => out.push_str("nil"),
            Arg::Bool(b) => {
                let _ = write!(out, "{b}");
            }
            Arg::Int(n) => {
                let _ = write!(out, "{n}");
            }
            Arg::Sym(sym) => {
                out.push(':');
                out.push_str(sym);
            }
            Arg::Text(text) => {
                let _ = write!(out, "{text:?}");
            }
            Arg::Node(handle) => self.write_handle(out, *handle),
            Arg::List(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_arg(out, item);
                }
                out.push(']');
            }
        }
    }
}

impl Dispatch for TraceBuilder {
    fn dispatch(&mut self, event: Event, args: &[Arg], at: EventPos) -> NodeHandle {
        debug_assert_eq!(
            args.len(),
            event.arity(),
            "event `{}` dispatched with wrong arity",
            event.name()
        );
        let Ok(index) = u32::try_from(self.nodes.len()) else {
            return NodeHandle::NONE;
        };
        self.nodes.push(TraceNode {
            event,
            args: args.to_vec(),
            at,
        });
        NodeHandle::new(index)
    }

    fn diagnostic(&mut self, event: DiagnosticEvent, message: &str, at: EventPos) {
        self.diagnostics.push(RecordedDiagnostic {
            event,
            message: message.to_owned(),
            at,
        });
    }
}

/// One recorded scanner event.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LexEntry {
    pub at: EventPos,
    pub event: ScannerEvent,
    pub text: String,
}

/// Sink that records only scanner events.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenRecorder {
    entries: Vec<LexEntry>,
    diagnostics: Vec<RecordedDiagnostic>,
}

impl TokenRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries sorted by source offset.
    ///
    /// Heredoc bodies are scanned before the rest of their introducing line,
    /// so dispatch order and source order differ; the sort is stable so
    /// zero-width neighbours keep their dispatch order.
    pub fn entries(&self) -> Vec<&LexEntry> {
        let mut sorted: Vec<&LexEntry> = self.entries.iter().collect();
        sorted.sort_by_key(|e| e.at.offset);
        sorted
    }

    /// Entries in dispatch order.
    pub fn dispatched(&self) -> &[LexEntry] {
        &self.entries
    }

    pub fn diagnostics(&self) -> &[RecordedDiagnostic] {
        &self.diagnostics
    }

    /// `(event name, text)` pairs in source order.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        self.entries()
            .into_iter()
            .map(|e| (e.event.name(), e.text.as_str()))
            .collect()
    }

    /// Concatenated text of every entry, in source order.
    pub fn source_text(&self) -> String {
        self.entries().into_iter().map(|e| e.text.as_str()).collect()
    }
}

impl Dispatch for TokenRecorder {
    fn dispatch(&mut self, event: Event, args: &[Arg], at: EventPos) -> NodeHandle {
        let Event::Scanner(event) = event else {
            return NodeHandle::NONE;
        };
        let text = match args.first() {
            Some(Arg::Text(text)) => text.clone(),
            _ => String::new(),
        };
        self.entries.push(LexEntry { at, event, text });
        NodeHandle::NONE
    }

    fn diagnostic(&mut self, event: DiagnosticEvent, message: &str, at: EventPos) {
        self.diagnostics.push(RecordedDiagnostic {
            event,
            message: message.to_owned(),
            at,
        });
    }
}
