//! emitter module tests
//!
//! Block Tracker と Line Driver を transpile 経由で確認する。

use super::*;
use crate::diagnostics::{UNMATCHED_LINE, UNSUPPORTED_FEATURE};

fn run(source: &str, language: SourceLanguage, dialect: Dialect) -> Conversion {
    transpile(source, language, dialect, &Options::default(), None)
}

fn py_ib(source: &str) -> String {
    run(source, SourceLanguage::Python, Dialect::Ib).text
}

#[test]
fn test_empty_input() {
    let conv = run("", SourceLanguage::Python, Dialect::Igcse);
    assert_eq!(conv.text, "");
    assert!(conv.diagnostics.is_empty());
    assert_eq!(run("  \n\n", SourceLanguage::Java, Dialect::Ib).text, "");
}

#[test]
fn test_dedent_closes_nested_blocks_innermost_first() {
    let src = "for i in range(3):\n    if i > 1:\n        print(i)\nprint(\"done\")";
    assert_eq!(
        py_ib(src),
        "loop i from 0 to 2\n    IF i > 1 THEN\n        OUTPUT i\n    END IF\nend loop\nOUTPUT \"done\""
    );
}

#[test]
fn test_if_chain_closes_once() {
    let src = "if x > 0:\n    print(\"pos\")\nelif x < 0:\n    print(\"neg\")\nelse:\n    print(\"zero\")";
    let conv = run(src, SourceLanguage::Python, Dialect::Ib);
    assert_eq!(
        conv.text,
        "IF x > 0 THEN\n    OUTPUT \"pos\"\nELSE IF x < 0 THEN\n    OUTPUT \"neg\"\nELSE\n    OUTPUT \"zero\"\nEND IF"
    );
    assert_eq!(conv.opened, 3);
    assert_eq!(conv.continued, 2);
    assert_eq!(conv.closed, 1);
}

#[test]
fn test_opened_equals_continued_plus_closed() {
    let src = "def f(n):\n    try:\n        return n\n    except ValueError:\n        return 0\n\nwhile True:\n    break";
    let conv = run(src, SourceLanguage::Python, Dialect::Igcse);
    assert_eq!(conv.opened, conv.continued + conv.closed);
}

#[test]
fn test_blank_and_comment_lines() {
    let src = "# greet\nx = 5  # Another comment\n\nprint(x)";
    assert_eq!(py_ib(src), "// greet\nx ← 5 // Another comment\n\nOUTPUT x");
}

#[test]
fn test_blank_line_follows_block_closer() {
    let src = "while x:\n    x = 0\n\ny = 1";
    assert_eq!(py_ib(src), "WHILE x DO\n    x ← 0\nEND WHILE\n\ny ← 1");
}

#[test]
fn test_comment_after_block_closes_it_first() {
    let src = "if a:\n    x = 1\n# after\ny = 2";
    assert_eq!(py_ib(src), "IF a THEN\n    x ← 1\nEND IF\n// after\ny ← 2");
}

#[test]
fn test_comment_before_continuation_keeps_chain_open() {
    let src = "if a:\n    x = 1\n# otherwise\nelse:\n    x = 2";
    let conv = run(src, SourceLanguage::Python, Dialect::Ib);
    assert_eq!(conv.text, "IF a THEN\n    x ← 1\n// otherwise\nELSE\n    x ← 2\nEND IF");
    assert_eq!(conv.closed, 1);
}

#[test]
fn test_igcse_width_normalizes_two_space_source() {
    let src = "count = 0\nwhile count < 3:\n  count += 1";
    let conv = run(src, SourceLanguage::Python, Dialect::Igcse);
    assert_eq!(
        conv.text,
        "DECLARE count : INTEGER\n\ncount ← 0\nWHILE count < 3 DO\n   count ← count + 1\nENDWHILE"
    );
}

#[test]
fn test_declaration_header_can_be_disabled() {
    let options = Options {
        declarations: false,
        ..Options::default()
    };
    let conv = transpile("x = 1", SourceLanguage::Python, Dialect::Igcse, &options, None);
    assert_eq!(conv.text, "x ← 1");
}

#[test]
fn test_unmatched_python_line_policies() {
    let ib = run("items.sort()\nx = 1", SourceLanguage::Python, Dialect::Ib);
    assert_eq!(ib.text, "items.sort()\nx ← 1");
    assert_eq!(ib.diagnostics.len(), 1);
    assert_eq!(ib.diagnostics.diagnostics[0].code, UNMATCHED_LINE);
    assert_eq!(ib.diagnostics.diagnostics[0].span.line, 1);

    let igcse = run("items.sort()", SourceLanguage::Python, Dialect::Igcse);
    assert_eq!(igcse.text, "// TODO: items.sort()");
}

#[test]
fn test_unsupported_feature_is_never_half_converted() {
    let conv = run("square = lambda v: v * v", SourceLanguage::Python, Dialect::Ib);
    assert_eq!(conv.text, "square = lambda v: v * v");
    assert_eq!(conv.diagnostics.diagnostics[0].code, UNSUPPORTED_FEATURE);

    let mut options = Options::default();
    options.features.disable(UnsupportedFeature::Lambda);
    let allowed = transpile("square = lambda v: v * v", SourceLanguage::Python, Dialect::Ib, &options, None);
    assert_eq!(allowed.diagnostics.len(), 0);
}

#[test]
fn test_java_braces_and_preserved_indent() {
    let src = r#"public class Main {
    public static void main(String[] args) {
        int total = 0;
        for (int i = 0; i < 5; i++) {
            total += i;
        }
        System.out.println(total);
    }
}"#;
    let expected = "CLASS Main
    PROCEDURE main(args)
        total ← 0
        loop i from 0 to 4
            total ← total + i
        end loop
        OUTPUT total
    END PROCEDURE
END CLASS";
    assert_eq!(run(src, SourceLanguage::Java, Dialect::Ib).text, expected);
}

#[test]
fn test_java_else_on_its_own_line() {
    let src = "if (a) {\n    x = 1;\n}\nelse {\n    x = 2;\n}";
    assert_eq!(
        run(src, SourceLanguage::Java, Dialect::Ib).text,
        "IF a THEN\n    x ← 1\nELSE\n    x ← 2\nEND IF"
    );
}

#[test]
fn test_java_do_while_closes_repeat() {
    let src = "int i = 0;\ndo {\n    i++;\n} while (i < 3);";
    assert_eq!(
        run(src, SourceLanguage::Java, Dialect::Igcse).text,
        "DECLARE i : INTEGER\n\ni ← 0\nREPEAT\n   i ← i + 1\nUNTIL NOT (i < 3)"
    );
}

#[test]
fn test_java_case_bodies_indent_past_labels() {
    let src = r#"switch (day) {
    case 1:
        System.out.println("Mon");
        break;
    default:
        System.out.println("Other");
}"#;
    let options = Options {
        indent: Some(IndentStyle::Width(2)),
        ..Options::default()
    };
    let conv = transpile(src, SourceLanguage::Java, Dialect::Ib, &options, None);
    assert_eq!(
        conv.text,
        "CASE OF day\n  1 :\n    OUTPUT \"Mon\"\n  OTHERWISE\n    OUTPUT \"Other\"\nEND CASE"
    );
}

#[test]
fn test_java_unmatched_line_is_flagged() {
    let conv = run("list.sort(null);", SourceLanguage::Java, Dialect::Ib);
    assert_eq!(conv.text, "// Unsupported: list.sort(null);");
    assert_eq!(conv.diagnostics.len(), 1);
}

#[test]
fn test_end_of_input_flushes_frames() {
    let conv = run("while x:\n    if y:\n        x = 0", SourceLanguage::Python, Dialect::Ib);
    assert!(conv.text.ends_with("        x ← 0\n    END IF\nEND WHILE"));
    assert_eq!(conv.closed, 2);
}

#[test]
fn test_detect_unit() {
    let lines = split_logical_lines("if a:\n  b = 1", SourceLanguage::Python);
    assert_eq!(detect_unit(&lines), "  ");
    let flat = split_logical_lines("a = 1", SourceLanguage::Python);
    assert_eq!(detect_unit(&flat), "    ");
}
