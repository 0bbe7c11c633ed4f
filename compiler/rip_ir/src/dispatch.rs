//! The dispatch contract between the front end and its consumer.
//!
//! The lexer and grammar driver never build a tree themselves. Every token
//! and every reduction is announced to a [`Dispatch`] sink, which returns an
//! opaque [`NodeHandle`]; handles flow back in as arguments of later events.

use crate::{DiagnosticEvent, Event, LexState, LineCol};

/// Opaque value returned by a sink.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeHandle(u32);

impl NodeHandle {
    /// "No node": the sink declined to produce one, or no event fired.
    pub const NONE: NodeHandle = NodeHandle(u32::MAX);

    #[inline]
    pub const fn new(raw: u32) -> Self {
        NodeHandle(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }
}

impl Default for NodeHandle {
    fn default() -> Self {
        NodeHandle::NONE
    }
}

/// One event argument.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Arg {
    Nil,
    Bool(bool),
    Int(i64),
    /// Operator or punctuation symbol, e.g. `+` in `binary`.
    Sym(String),
    /// Raw text: the scanner-event payload, or a magic-comment key/value.
    Text(String),
    Node(NodeHandle),
    List(Vec<Arg>),
}

impl Arg {
    /// `Node(handle)`, or `Nil` when the handle is [`NodeHandle::NONE`].
    #[inline]
    pub fn node(handle: NodeHandle) -> Arg {
        if handle.is_none() {
            Arg::Nil
        } else {
            Arg::Node(handle)
        }
    }

    #[inline]
    pub fn sym(sym: impl Into<String>) -> Arg {
        Arg::Sym(sym.into())
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Arg::Nil)
    }
}

impl From<NodeHandle> for Arg {
    fn from(handle: NodeHandle) -> Self {
        Arg::node(handle)
    }
}

impl From<Option<NodeHandle>> for Arg {
    fn from(handle: Option<NodeHandle>) -> Self {
        handle.map_or(Arg::Nil, Arg::node)
    }
}

/// Where an event happened, and the lexer state at that moment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventPos {
    pub line: u32,
    pub column: u32,
    /// Absolute byte offset of the anchor.
    pub offset: u32,
    pub state: LexState,
}

impl EventPos {
    #[inline]
    pub const fn line_col(&self) -> LineCol {
        LineCol::new(self.line, self.column)
    }
}

/// Event consumer.
///
/// `dispatch` receives exactly [`Event::arity`] arguments. Sinks are free to
/// return [`NodeHandle::NONE`] for events they do not care about.
pub trait Dispatch {
    fn dispatch(&mut self, event: Event, args: &[Arg], at: EventPos) -> NodeHandle;

    /// Warning/error side channel. Defaults to ignoring everything.
    fn diagnostic(&mut self, event: DiagnosticEvent, message: &str, at: EventPos) {
        let _ = (event, message, at);
    }
}

impl<D: Dispatch + ?Sized> Dispatch for &mut D {
    #[inline]
    fn dispatch(&mut self, event: Event, args: &[Arg], at: EventPos) -> NodeHandle {
        (**self).dispatch(event, args, at)
    }

    #[inline]
    fn diagnostic(&mut self, event: DiagnosticEvent, message: &str, at: EventPos) {
        (**self).diagnostic(event, message, at);
    }
}

/// Sink that discards everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopSink;

impl Dispatch for NoopSink {
    #[inline]
    fn dispatch(&mut self, _event: Event, _args: &[Arg], _at: EventPos) -> NodeHandle {
        NodeHandle::NONE
    }
}
