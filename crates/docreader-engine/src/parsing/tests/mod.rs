//! Whole-document parsing tests.
//!
//! Block sequences are compared as compact descriptions (see `normalize`)
//! with inline snapshots.


use insta::assert_debug_snapshot;
use pretty_assertions::assert_eq;

use crate::{
    document::Document,
    parsing::{
        blocks::BlockKind,
        inline::{Run, RunStyle},
        parse_document,
    },
};
use normalize::describe;

const MIXED: &[&str] = &[
    "# Guide",
    "Intro line one",
    "intro line two  ",
    "after break",
    "",
    "## Setup",
    "- install",
    "  with cargo",
    "- [x] configured",
    "1. first",
    "",
    "| Key | Value |",
    "|-----|:-----:|",
    "| a | `1` |",
    "| b |",
    "",
    "```toml",
    "[render]",
    "lines_per_tick = 100",
    "```",
    "> note: see [setup](#setup)",
    "***",
    "![Walkthrough video](media/walkthrough)",
    "~~old~~ and **new**",
];

fn mixed() -> String {
    MIXED.join("\n")
}

fn parse(text: &str) -> Vec<String> {
    let doc = parse_document(text, None);
    invariants::check(Document::new(text).len(), &doc.blocks);
    describe(&doc.blocks)
}

#[test]
fn mixed_document() {
    assert_debug_snapshot!(parse(&mixed()), @r#"
    [
        "0: Header(1) Guide",
        "1-3: Paragraph [plain:Intro line one intro line two⏎after break]",
        "4: Spacer",
        "5: Header(2) Setup",
        "6: ListItem(-) [plain:install]",
        "7: Paragraph(cont) [plain:with cargo]",
        "8: Task(x) [plain:configured]",
        "9: ListItem(1.) [plain:first]",
        "10: Spacer",
        "11-14: Table[Left,Center] Key|Value ; a|code:1 ; b|",
        "15: Spacer",
        "16-19: Code(toml) [render]⏎lines_per_tick = 100",
        "20: Quote(1) [plain:note: see , link(#setup):setup]",
        "21: Separator",
        "22: Video media/walkthrough (Walkthrough video)",
        "23: Paragraph [strike:old, plain: and , bold:new]",
    ]
    "#);
}

#[test]
fn parse_is_idempotent() {
    let first = parse_document(&mixed(), Some("line")).blocks;
    let second = parse_document(&mixed(), Some("line")).blocks;
    assert_eq!(first, second);
}

#[test]
fn table_round_trip_shape() {
    let md = "| a | b | c |\n|---|---|---|\n| 1 | 2 | 3 |\n| 4 | 5 | 6 |\n| 7 | 8 | 9 |";
    let doc = parse_document(md, None);
    assert_eq!(doc.blocks.len(), 1);
    let BlockKind::Table { rows, .. } = &doc.blocks[0].kind else {
        panic!("expected table, got {:?}", doc.blocks[0].kind);
    };
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|r| r.len() == 3));
}

#[test]
fn two_column_table_example() {
    let doc = parse_document("| A | B |\n|---|---|\n| 1 | 2 |", None);
    assert_debug_snapshot!(describe(&doc.blocks), @r#"
    [
        "0-2: Table[Left,Left] A|B ; 1|2",
    ]
    "#);
}

#[test]
fn code_block_example() {
    let doc = parse_document("```js\nlet x=1;\n```", None);
    assert_eq!(
        doc.blocks[0].kind,
        BlockKind::CodeBlock {
            language: "js".into(),
            content: "let x=1;".into(),
        }
    );
}

#[test]
fn crlf_input_parses_like_lf() {
    let lf = parse_document("# T\n\ntext\nmore", None).blocks;
    let crlf = parse_document("# T\r\n\r\ntext\r\nmore", None).blocks;
    assert_eq!(lf, crlf);
}

#[test]
fn highlight_count_excludes_typed_runs() {
    let md = "Foo here\n\n- a foo item with `foo` code\n\n| foo | [foo](x.md) |\n|---|---|";
    let doc = parse_document(md, Some("foo"));
    let highlighted: Vec<&Run> = doc
        .blocks
        .iter()
        .flat_map(|b| b.runs())
        .filter(|r| r.style == RunStyle::Highlight)
        .collect();
    assert_eq!(highlighted.len(), 3);
}

#[test]
fn empty_document_is_a_single_spacer() {
    assert_eq!(parse(""), vec!["0: Spacer".to_string()]);
}

#[test]
fn unmatched_markup_stays_literal() {
    assert_eq!(
        parse("**open `tick [link"),
        vec!["0: Paragraph [plain:**open `tick [link]".to_string()]
    );
}
