use pretty_assertions::assert_eq;
use rip_ir::LexState;

use super::*;

#[test]
fn bit_stack_push_pop() {
    let mut stack = BitStack::new();
    assert!(!stack.top());
    stack.push(true);
    stack.push(false);
    assert!(!stack.top());
    stack.pop();
    assert!(stack.top());
    stack.pop();
    assert_eq!(stack.bits(), 0);
}

#[test]
fn beginning_positions() {
    let mut st = LexerState::new(true);
    assert!(st.is_beg());
    st.set(LexState::ARG | LexState::LABELED);
    assert!(st.is_beg());
    st.set(LexState::ARG);
    assert!(!st.is_beg());
    assert!(st.is_arg());
    st.set(LexState::END);
    assert!(st.is_end());
}

#[test]
fn spcarg_requires_space_before_and_not_after() {
    let mut st = LexerState::new(true);
    st.set(LexState::CMDARG);
    assert!(st.is_spcarg(true, Some(b'1')));
    assert!(!st.is_spcarg(true, Some(b' ')));
    assert!(!st.is_spcarg(false, Some(b'1')));
    assert!(st.is_spcarg(true, None));
}

#[test]
fn nesting_pushes_both_stacks() {
    let mut st = LexerState::new(true);
    st.cond.push(true);
    st.open_nest();
    assert_eq!(st.paren_nest, 1);
    assert!(!st.cond_p());
    st.close_nest();
    assert!(st.cond_p());
    assert_eq!(st.paren_nest, 0);
}

#[test]
fn label_possible() {
    let mut st = LexerState::new(true);
    st.set(LexState::BEG | LexState::LABEL);
    assert!(st.is_label_possible(false));
    assert!(!st.is_label_possible(true));
    st.set(LexState::ARG);
    assert!(st.is_label_possible(true));
}
