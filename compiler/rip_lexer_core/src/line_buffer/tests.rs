use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

fn buf(text: &str) -> LineBuffer {
    LineBuffer::new(text.as_bytes().to_vec(), 3, 100)
}

#[test]
fn bump_and_back() {
    let mut line = buf("ab\n");
    assert_eq!(line.bump(), Some(b'a'));
    assert!(line.was_bol());
    assert_eq!(line.prev(), Some(b'a'));
    line.back();
    assert_eq!(line.pos(), 0);
    line.back();
    assert_eq!(line.pos(), 0);
}

#[test]
fn end_of_line() {
    let mut line = buf("x\n");
    line.goto_eol();
    assert!(line.at_eol());
    assert_eq!(line.bump(), None);
    assert_eq!(line.peek(), None);
}

#[test]
fn content_end_strips_line_terminators() {
    assert_eq!(buf("abc\n").content_end(), 3);
    assert_eq!(buf("abc\r\n").content_end(), 3);
    assert_eq!(buf("abc").content_end(), 3);
    assert_eq!(buf("\n").content_end(), 0);
}

#[test]
fn absolute_positions() {
    let line = buf("hello\n");
    assert_eq!(line.abs(2), 102);
    assert_eq!(line.column(2), 2);
    assert_eq!(line.line(), 3);
}

#[test]
fn bom_moves_line_start() {
    let mut line = LineBuffer::new(b"\xEF\xBB\xBFp 1\n".to_vec(), 1, 0);
    assert!(line.skip_bom());
    assert_eq!(line.line_start(), 3);
    assert_eq!(line.pos(), 3);
    assert_eq!(line.bump(), Some(b'p'));
    assert!(line.was_bol());
    assert!(!line.skip_bom());
}

#[test]
fn find_and_match() {
    let mut line = buf("a = <<EOS\n");
    assert_eq!(line.find(b'<'), Some(4));
    assert!(line.matches_at(4, b"<<EOS"));
    assert!(!line.matches_at(8, b"SS"));
    line.set_pos(5);
    assert_eq!(line.find(b'a'), None);
}

#[test]
fn skip_blank_stops_at_content() {
    let line = buf(" \t .foo\n");
    assert_eq!(line.skip_blank(0), 3);
    assert_eq!(buf("   ").skip_blank(0), 3);
}

proptest! {
    #[test]
    fn cursor_stays_in_bounds(text in "[a-z \\n]{0,40}", moves in proptest::collection::vec(0u8..4, 0..60)) {
        let mut line = LineBuffer::new(text.into_bytes(), 1, 0);
        for m in moves {
            match m {
                0 => { line.bump(); }
                1 => line.back(),
                2 => line.advance(3),
                _ => line.set_pos(usize::MAX),
            }
            prop_assert!(line.line_start() <= line.pos());
            prop_assert!(line.pos() <= line.line_end());
        }
    }

    #[test]
    fn rest_is_suffix(text in "[ -~]{0,40}", at in 0usize..50) {
        let mut line = LineBuffer::new(text.clone().into_bytes(), 1, 0);
        line.set_pos(at);
        let rest = line.rest().to_vec();
        prop_assert!(text.as_bytes().ends_with(&rest));
    }
}
