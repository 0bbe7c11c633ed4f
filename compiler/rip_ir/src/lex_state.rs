//! The lexer's "what may follow" bitmask.
//!
//! Every scanning decision that depends on context (is `/` a regexp or a
//! division? is `{` a hash or a block? is `foo:` a label?) reads this value,
//! and every token that is produced rewrites it. Tokens carry the state they
//! left behind so consumers can replay decisions.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Lexer state after the most recent token.
    ///
    /// Several states may be set at once (`END | LABEL` after a local
    /// variable, `ARG | LABELED` after a label argument).
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct LexState: u16 {
        /// Expression start: a value may begin here.
        const BEG = 1 << 0;
        /// A complete operand just ended.
        const END = 1 << 1;
        /// Closing `)` of a parenthesized command argument.
        const ENDARG = 1 << 2;
        /// End of a method name or lambda arrow.
        const ENDFN = 1 << 3;
        /// After a method name that may take arguments.
        const ARG = 1 << 4;
        /// After a method name in command position.
        const CMDARG = 1 << 5;
        /// After `return`, `break`, `next`, `rescue`.
        const MID = 1 << 6;
        /// After `def`, `alias`, `undef`, `:`: a method name follows.
        const FNAME = 1 << 7;
        /// After `.`, `&.`, `::`.
        const DOT = 1 << 8;
        /// After `class`.
        const CLASS = 1 << 9;
        /// A `name:` label is permitted.
        const LABEL = 1 << 10;
        /// A label was just scanned.
        const LABELED = 1 << 11;
        /// Inside `alias`/`undef`: a symbol item follows.
        const FITEM = 1 << 12;
    }
}

impl LexState {
    /// Alias of `BEG` used by keywords that begin a value.
    pub const VALUE: LexState = LexState::BEG;
    pub const BEG_ANY: LexState = LexState::BEG.union(LexState::MID).union(LexState::CLASS);
    pub const ARG_ANY: LexState = LexState::ARG.union(LexState::CMDARG);
    pub const END_ANY: LexState = LexState::END
        .union(LexState::ENDARG)
        .union(LexState::ENDFN);

    /// True if any bit of `mask` is set.
    #[inline]
    pub const fn is(self, mask: LexState) -> bool {
        self.intersects(mask)
    }

    /// True if every bit of `mask` is set.
    #[inline]
    pub const fn has_all(self, mask: LexState) -> bool {
        self.contains(mask)
    }
}

impl fmt::Display for LexState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }
        let mut first = true;
        for (name, _) in self.iter_names() {
            if !first {
                f.write_str("|")?;
            }
            f.write_str(name)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_masks() {
        assert!(LexState::MID.is(LexState::BEG_ANY));
        assert!(LexState::CMDARG.is(LexState::ARG_ANY));
        assert!(LexState::ENDFN.is(LexState::END_ANY));
        assert!(!LexState::DOT.is(LexState::END_ANY));
        assert_eq!(LexState::VALUE, LexState::BEG);
    }

    #[test]
    fn has_all_requires_every_bit() {
        let state = LexState::ARG | LexState::LABELED;
        assert!(state.has_all(LexState::ARG | LexState::LABELED));
        assert!(!LexState::ARG.has_all(LexState::ARG | LexState::LABELED));
    }

    #[test]
    fn display_lists_primary_names() {
        assert_eq!((LexState::END | LexState::LABEL).to_string(), "END|LABEL");
        assert_eq!(LexState::empty().to_string(), "NONE");
    }
}
