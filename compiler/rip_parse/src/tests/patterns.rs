//! `case`/`in` pattern tests.

use pretty_assertions::assert_eq;

use super::{sexp, trace};

/// The `in` clause of a one-clause `case` over `subject`.
fn in_clause(subject: &str, pattern: &str) -> String {
    sexp(&format!("case {subject}\nin {pattern}\nend"))
}

#[test]
fn array_pattern_with_rest() {
    let out = sexp("case [1, 2]\nin [a, *rest] then a\nend");
    assert!(
        out.contains(r#"[:aryptn, nil, [[:var_field, [:@ident, "a", [2, 4]]]], [:var_field, [:@ident, "rest", [2, 8]]], nil]"#),
        "{out}"
    );
    assert!(out.contains(r#"[:var_ref, [:@ident, "a", [2, 19]]]"#), "{out}");
}

#[test]
fn find_pattern() {
    let out = in_clause("x", "[*, 1, *post]");
    assert!(
        out.contains(r#"[:fndptn, nil, [:var_field, nil], [[:@int, "1", [2, 7]]], [:var_field, [:@ident, "post", [2, 11]]]]"#),
        "{out}"
    );
}

#[test]
fn hash_pattern_with_binding_and_rest() {
    let out = in_clause("h", "{name: String => n, **rest}");
    assert!(
        out.contains(concat!(
            r#"[:hshptn, nil, [[[:@label, "name:", [2, 4]], "#,
            r#"[:binary, [:var_ref, [:@const, "String", [2, 10]]], :=>, [:var_field, [:@ident, "n", [2, 20]]]]]], "#,
            r#"[:var_field, [:@ident, "rest", [2, 25]]]]"#
        )),
        "{out}"
    );
}

#[test]
fn bare_hash_pattern_binds_label() {
    let traced = trace("case h\nin name:\n  name\nend");
    assert!(traced.outcome.is_clean(), "{:?}", traced.messages());
    let out = traced.sexp();
    assert!(out.contains(r#"[:hshptn, nil, [[[:@label, "name:", [2, 3]], nil]], nil]"#), "{out}");
    assert!(out.contains(r#"[:var_ref, [:@ident, "name", [3, 2]]]"#), "{out}");
}

#[test]
fn top_level_list_is_array_pattern() {
    let out = in_clause("x", "a, b");
    assert!(out.contains("[:aryptn, nil, [[:var_field"), "{out}");
}

#[test]
fn alternatives() {
    let out = in_clause("x", "1 | 2");
    assert!(
        out.contains(r#"[:binary, [:@int, "1", [2, 3]], :|, [:@int, "2", [2, 7]]]"#),
        "{out}"
    );
}

#[test]
fn constant_with_array_pattern() {
    let out = in_clause("x", "Point(x, y)");
    assert!(out.contains(r#"[:aryptn, [:var_ref, [:@const, "Point", [2, 3]]], [[:var_field"#), "{out}");
}

#[test]
fn constant_with_hash_pattern() {
    let out = in_clause("x", "Point(x:, y:)");
    assert!(out.contains(r#"[:hshptn, [:var_ref, [:@const, "Point", [2, 3]]], [["#), "{out}");
}

#[test]
fn guard_clause() {
    let traced = trace("case 1\nin Integer if true then 1\nend");
    assert!(traced.outcome.is_clean());
    assert!(traced.sexp().contains(r#"[:if_mod, [:var_ref, [:@kw, "true", [2, 14]]], [:var_ref, [:@const, "Integer", [2, 3]]]]"#));
}

#[test]
fn pinned_local() {
    let out = sexp("x = 1\ncase y\nin ^x then 1\nend");
    assert!(out.contains(r#"[:var_ref, [:@ident, "x", [3, 4]]]"#), "{out}");
}

#[test]
fn value_ranges() {
    let out = in_clause("x", "1..5");
    assert!(out.contains(r#"[:dot2, [:@int, "1", [2, 3]], [:@int, "5", [2, 6]]]"#), "{out}");
    let endless = sexp("case x\nin 1.. then nil\nend");
    assert!(endless.contains(r#"[:dot2, [:@int, "1", [2, 3]], nil]"#), "{endless}");
}

#[test]
fn several_in_clauses() {
    let traced = trace("case x\nin 1 then :a\nin 2 then :b\nelse :c\nend");
    assert!(traced.outcome.is_clean());
    let clauses = traced.events().iter().filter(|e| **e == "in").count();
    assert_eq!(clauses, 2);
    assert!(traced.has_event("else"));
}
