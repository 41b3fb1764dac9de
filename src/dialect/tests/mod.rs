//! dialect module tests

use super::*;
use crate::ir::{AugAssignOp, Frame};
use crate::semantic::{range_bounds, PseudoType};

fn frame(kind: BlockKind, ident: Option<&str>) -> Frame {
    Frame {
        kind,
        ident: ident.map(str::to_string),
        header_depth: 0,
        indent: String::new(),
        settled: true,
    }
}

fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// --- closers ---
#[test]
fn test_ib_closers() {
    assert_eq!(IB.closer(&frame(BlockKind::If, None)), "END IF");
    assert_eq!(IB.closer(&frame(BlockKind::Else, None)), "END IF");
    assert_eq!(IB.closer(&frame(BlockKind::For, Some("i"))), "end loop");
    assert_eq!(IB.closer(&frame(BlockKind::While, None)), "END WHILE");
    assert_eq!(IB.closer(&frame(BlockKind::Function, None)), "END FUNCTION");
    assert_eq!(IB.closer(&frame(BlockKind::Catch, None)), "END TRY");
}

#[test]
fn test_igcse_closers() {
    assert_eq!(IGCSE.closer(&frame(BlockKind::If, None)), "ENDIF");
    assert_eq!(IGCSE.closer(&frame(BlockKind::For, Some("i"))), "NEXT i");
    assert_eq!(IGCSE.closer(&frame(BlockKind::While, None)), "ENDWHILE");
    assert_eq!(IGCSE.closer(&frame(BlockKind::Procedure, None)), "ENDPROCEDURE");
    assert_eq!(IGCSE.closer(&frame(BlockKind::Case, None)), "ENDCASE");
}

#[test]
fn test_repeat_closer_uses_condition() {
    assert_eq!(
        IGCSE.closer(&frame(BlockKind::Repeat, Some("NOT (i < 3)"))),
        "UNTIL NOT (i < 3)"
    );
    assert_eq!(IB.closer(&frame(BlockKind::Repeat, None)), "UNTIL FALSE");
}

#[test]
fn test_missing_closer_falls_back_to_end() {
    let bare = KeywordTable {
        closers: &[],
        ..IB.clone()
    };
    for kind in [BlockKind::If, BlockKind::For, BlockKind::Class, BlockKind::Case] {
        assert_eq!(bare.closer(&frame(kind, Some("x"))), "END");
    }
}

// --- operators ---
#[test]
fn test_op_spelling() {
    assert_eq!(IB.op(PseudoOp::NotEq), "≠");
    assert_eq!(IGCSE.op(PseudoOp::NotEq), "<>");
    assert_eq!(IB.op(PseudoOp::Mod), "mod");
    assert_eq!(IGCSE.op(PseudoOp::FloorDiv), "DIV");

    let bare = KeywordTable { ops: &[], ..IB.clone() };
    assert_eq!(bare.op(PseudoOp::Assign), "=");
}

#[test]
fn test_compound_every_operator() {
    let cases = [
        (AugAssignOp::Add, "x ← x + y"),
        (AugAssignOp::Sub, "x ← x - y"),
        (AugAssignOp::Mul, "x ← x * y"),
        (AugAssignOp::Div, "x ← x / y"),
        (AugAssignOp::Mod, "x ← x mod y"),
        (AugAssignOp::FloorDiv, "x ← x div y"),
        (AugAssignOp::Pow, "x ← x ^ y"),
    ];
    for (op, expected) in cases {
        assert_eq!(IB.compound("x", op, "y", false), expected);
    }
    assert_eq!(IGCSE.compound("s", AugAssignOp::Add, "\"!\"", true), "s ← s & \"!\"");
}

// --- headers ---
#[test]
fn test_control_headers() {
    assert_eq!(IB.if_header("x > 5"), "IF x > 5 THEN");
    assert_eq!(IB.else_if_header("x = 1"), "ELSE IF x = 1 THEN");
    assert_eq!(IB.while_header("count < 5"), "WHILE count < 5 DO");
    assert_eq!(IGCSE.case_of("day"), "CASE OF day");
    assert_eq!(IGCSE.catch_line(Some("ValueError")), "CATCH ValueError");
    assert_eq!(IB.return_line(None), "RETURN");
}

#[test]
fn test_range_loops() {
    let bounds = range_bounds(&args(&["5"])).unwrap();
    assert_eq!(IB.range_loop("i", &bounds), "loop i from 0 to 4");
    assert_eq!(IGCSE.range_loop("i", &bounds), "FOR i ← 0 TO 4");

    let stepped = range_bounds(&args(&["10", "0", "-2"])).unwrap();
    assert_eq!(IGCSE.range_loop("i", &stepped), "FOR i ← 10 TO 1 STEP -2");
    assert_eq!(IB.range_loop("i", &stepped), "loop i from 10 to 1");
}

#[test]
fn test_collection_loops() {
    assert_eq!(
        IB.collection_loop("name", "names", "    "),
        vec![
            "names.resetNext()".to_string(),
            "loop while names.hasNext()".to_string(),
            "    name ← names.getNext()".to_string(),
        ]
    );
    assert_eq!(
        IB.collection_loop("c", "\"abc\"", "    "),
        vec![
            "\"abc\".resetNext()".to_string(),
            "loop while \"abc\".hasNext()".to_string(),
            "    c ← \"abc\".getNext()".to_string(),
        ]
    );
    assert_eq!(
        IGCSE.collection_loop("n", "[1, 2]", "   "),
        vec!["FOR EACH n IN [1, 2]".to_string()]
    );
}

#[test]
fn test_output_and_input() {
    assert_eq!(IB.output(&args(&["\"a\"", "b"])), "OUTPUT \"a\" + b");
    assert_eq!(IGCSE.output(&args(&["\"a\"", "b"])), "OUTPUT \"a\", b");
    assert_eq!(IB.output(&[]), "OUTPUT \"\"");

    assert_eq!(IB.input(Some("name"), Some("\"Name?\"")), vec!["INPUT name"]);
    assert_eq!(
        IGCSE.input(Some("name"), Some("\"Name?\"")),
        vec!["OUTPUT \"Name?\"", "INPUT name"]
    );
    assert_eq!(IB.input(None, None), vec!["INPUT"]);
}

#[test]
fn test_subroutine_headers() {
    let header = SubroutineHeader {
        kind: BlockKind::Function,
        name: "add".to_string(),
        params: vec![
            ("a".to_string(), Some(PseudoType::Integer)),
            ("b".to_string(), Some(PseudoType::Integer)),
        ],
        returns: Some(PseudoType::Integer),
        member: false,
        constructor: false,
    };
    assert_eq!(IB.subroutine_header(&header), "FUNCTION add(a, b)");
    assert_eq!(
        IGCSE.subroutine_header(&header),
        "FUNCTION Add(a : INTEGER, b : INTEGER) RETURNS INTEGER"
    );

    let ctor = SubroutineHeader {
        kind: BlockKind::Procedure,
        name: "__init__".to_string(),
        params: vec![("name".to_string(), Some(PseudoType::String))],
        returns: None,
        member: true,
        constructor: true,
    };
    assert_eq!(IGCSE.subroutine_header(&ctor), "PUBLIC PROCEDURE NEW(name : STRING)");
}

#[test]
fn test_class_constant_and_declare() {
    assert_eq!(IB.class_header("Dog", Some("Animal")), "CLASS Dog EXTENDS Animal");
    assert_eq!(IGCSE.class_header("Dog", Some("Animal")), "CLASS Dog INHERITS Animal");
    assert_eq!(IGCSE.constant_line("PI", "3.14"), Some("CONSTANT PI = 3.14".to_string()));
    assert_eq!(IB.constant_line("PI", "3.14"), None);
    assert_eq!(IGCSE.declare("count", &PseudoType::Integer), "DECLARE count : INTEGER");
    assert_eq!(IGCSE.call("Greet", "\"Ann\""), "CALL Greet(\"Ann\")");
    assert_eq!(IB.call("greet", ""), "greet()");
}

#[test]
fn test_exit_loop() {
    assert_eq!(IB.exit_loop(BlockKind::While), Some("EXIT LOOP"));
    assert_eq!(IGCSE.exit_loop(BlockKind::For), Some("EXIT FOR"));
    assert_eq!(IGCSE.exit_loop(BlockKind::If), None);
}

#[test]
fn test_dialect_from_str() {
    assert_eq!("ib".parse::<Dialect>().unwrap(), Dialect::Ib);
    assert_eq!("IGCSE".parse::<Dialect>().unwrap(), Dialect::Igcse);
    assert_eq!("cambridge".parse::<Dialect>().unwrap(), Dialect::Igcse);
    assert!("basic".parse::<Dialect>().is_err());
    assert_eq!(Dialect::Igcse.to_string(), "IGCSE");
}
