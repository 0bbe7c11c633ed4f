use super::*;

#[test]
fn every_table_entry_is_reachable() {
    for keyword in &KEYWORDS {
        assert_eq!(
            lookup(keyword.name.as_bytes()).map(|k| k.name),
            Some(keyword.name),
            "{} not found by length bucket",
            keyword.name
        );
    }
}

#[test]
fn modifier_forms() {
    let with_mod: Vec<&str> = KEYWORDS
        .iter()
        .filter(|k| k.has_modifier_form())
        .map(|k| k.name)
        .collect();
    assert_eq!(with_mod, vec!["if", "rescue", "unless", "until", "while"]);
}

#[test]
fn states() {
    assert_eq!(lookup(b"def").map(|k| k.state), Some(LexState::FNAME));
    assert_eq!(
        lookup(b"alias").map(|k| k.state),
        Some(LexState::FNAME | LexState::FITEM)
    );
    assert_eq!(lookup(b"class").map(|k| k.state), Some(LexState::CLASS));
    assert_eq!(lookup(b"return").map(|k| k.state), Some(LexState::MID));
}

#[test]
fn non_keywords() {
    assert!(lookup(b"foo").is_none());
    assert!(lookup(b"End").is_none());
    assert!(lookup(b"defined").is_none());
    assert!(lookup(b"x").is_none());
    assert!(lookup(b"__END__").is_none());
}
