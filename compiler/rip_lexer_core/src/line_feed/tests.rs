use pretty_assertions::assert_eq;

use super::*;
use crate::StrSource;

#[test]
fn numbers_and_offsets() {
    let mut feed = LineFeed::new(StrSource::new("a\nbb\nc"), 1);
    let first = feed.pull().unwrap().unwrap();
    let second = feed.pull().unwrap().unwrap();
    let third = feed.pull().unwrap().unwrap();
    assert_eq!((first.line(), first.offset()), (1, 0));
    assert_eq!((second.line(), second.offset()), (2, 2));
    assert_eq!((third.line(), third.offset()), (3, 5));
    assert!(feed.pull().unwrap().is_none());
}

#[test]
fn peek_does_not_consume() {
    let mut feed = LineFeed::new(StrSource::new("x\ny\n"), 10);
    assert_eq!(feed.peek(1).unwrap().map(LineBuffer::line), Some(11));
    assert_eq!(feed.peek(0).unwrap().map(LineBuffer::line), Some(10));
    assert!(feed.peek(2).unwrap().is_none());
    assert_eq!(feed.pull().unwrap().unwrap().bytes(), b"x\n");
    assert_eq!(feed.pull().unwrap().unwrap().bytes(), b"y\n");
}

#[test]
fn unpull_restores_order() {
    let mut feed = LineFeed::new(StrSource::new("one\ntwo\n"), 1);
    let one = feed.pull().unwrap().unwrap();
    feed.unpull(one);
    assert_eq!(feed.pull().unwrap().unwrap().bytes(), b"one\n");
}

#[test]
fn drain_rest_concatenates() {
    let mut feed = LineFeed::new(StrSource::new("a\nb\nc\n"), 1);
    feed.pull().unwrap();
    assert_eq!(feed.drain_rest().unwrap(), b"b\nc\n");
    assert_eq!(feed.next_offset(), 6);
}
