//! parser module tests
//!
//! 前の行は事前走査の材料として使い、最後のコード行をマッチャーに通す。

use super::*;
use crate::dialect::Dialect;

fn frame(kind: BlockKind, ident: Option<&str>) -> Frame {
    Frame {
        kind,
        ident: ident.map(str::to_string),
        header_depth: 0,
        indent: String::new(),
        settled: true,
    }
}

fn first_match(
    source: &str,
    language: SourceLanguage,
    dialect: Dialect,
    frames: &[Frame],
) -> Option<(&'static str, Converted)> {
    let lines = split_logical_lines(source, language);
    let scan = PreScan::run(&lines, language);
    let line = lines.iter().rev().find(|l| l.kind == LineKind::Code)?;
    let ctx = MatchContext {
        language,
        table: dialect.table(),
        scan: &scan,
        frames,
        indent: String::new(),
        unit: "    ".to_string(),
        inline_declarations: false,
    };
    language
        .matchers()
        .iter()
        .find_map(|m| (m.apply)(line, &ctx).map(|c| (m.construct, c)))
}

fn py(source: &str, dialect: Dialect) -> Vec<String> {
    first_match(source, SourceLanguage::Python, dialect, &[])
        .map(|(_, c)| c.lines)
        .unwrap_or_default()
}

fn java(source: &str, dialect: Dialect) -> Vec<String> {
    first_match(source, SourceLanguage::Java, dialect, &[])
        .map(|(_, c)| c.lines)
        .unwrap_or_default()
}

// --- 言語の判定 ---

#[test]
fn test_source_language_from_path_and_str() {
    assert_eq!(
        SourceLanguage::from_path(Path::new("src/Main.java")),
        Some(SourceLanguage::Java)
    );
    assert_eq!(SourceLanguage::from_path(Path::new("a.py")), Some(SourceLanguage::Python));
    assert_eq!(SourceLanguage::from_path(Path::new("notes.txt")), None);
    assert_eq!("PY".parse::<SourceLanguage>().unwrap(), SourceLanguage::Python);
    assert!("cobol".parse::<SourceLanguage>().is_err());
    assert_eq!(SourceLanguage::Java.to_string(), "java");
}

// --- ヘッダの解析 ---

#[test]
fn test_parse_python_def() {
    let def = python::parse_def("def add(a: int, b=2) -> int:").unwrap();
    assert_eq!(def.name, "add");
    assert_eq!(def.params[0].hint.as_deref(), Some("int"));
    assert_eq!(def.params[1].default.as_deref(), Some("2"));
    assert_eq!(def.returns.as_deref(), Some("int"));
    assert!(python::parse_def("define(x):").is_none());
}

#[test]
fn test_parse_java_method() {
    let m = java::parse_method("public static int add(int a, int b)").unwrap();
    assert_eq!(m.returns.as_deref(), Some("int"));
    assert_eq!(
        m.params,
        vec![("int".to_string(), "a".to_string()), ("int".to_string(), "b".to_string())]
    );
    assert!(m.modifiers.contains(&"static".to_string()));

    let ctor = java::parse_method("public Dog(String name)").unwrap();
    assert_eq!(ctor.returns, None);

    assert!(java::parse_method("foo(x)").is_none());
    assert!(java::parse_method("if (x > 1)").is_none());
}

#[test]
fn test_parse_java_declaration() {
    let decl = java::parse_declaration("final int MAX = 10").unwrap();
    assert!(decl.is_final);
    assert_eq!(decl.ty, "int");
    assert_eq!(decl.vars, vec![("MAX".to_string(), Some("10".to_string()))]);

    let multi = java::parse_declaration("int a = 1, b").unwrap();
    assert_eq!(multi.vars.len(), 2);
    assert_eq!(multi.vars[1], ("b".to_string(), None));

    let array = java::parse_declaration("int nums[] = new int[5]").unwrap();
    assert_eq!(array.ty, "int[]");

    assert!(java::parse_declaration("return x").is_none());
}

#[test]
fn test_java_for_header() {
    assert_eq!(
        java::for_header("for (int i = 0; i < n; i++)"),
        Some(java::ForHeader::Counted {
            init: "int i = 0".to_string(),
            cond: "i < n".to_string(),
            update: "i++".to_string(),
        })
    );
    match java::for_header("for (String s : names)") {
        Some(java::ForHeader::Each { var, collection, .. }) => {
            assert_eq!(var, "s");
            assert_eq!(collection, "names");
        }
        other => panic!("unexpected header: {other:?}"),
    }
}

// --- 連鎖 ---

#[test]
fn test_continuations() {
    let py_lines = split_logical_lines("elif x:\nelse:\nexcept E as e:\nx = 1", SourceLanguage::Python);
    let kinds: Vec<Option<Continuation>> = py_lines
        .iter()
        .map(|l| SourceLanguage::Python.continuation(l))
        .collect();
    assert_eq!(kinds[0], Some(Continuation::Chain(&[BlockKind::If, BlockKind::Elif])));
    assert_eq!(kinds[1], Some(Continuation::Chain(&[BlockKind::If, BlockKind::Elif])));
    assert_eq!(kinds[2], Some(Continuation::Chain(&[BlockKind::Try, BlockKind::Catch])));
    assert_eq!(kinds[3], None);

    let java_lines = split_logical_lines("} while (i < 3);\nwhile (i < 3) {\n} else if (a) {", SourceLanguage::Java);
    assert_eq!(
        SourceLanguage::Java.continuation(&java_lines[0]),
        Some(Continuation::Until("i < 3".to_string()))
    );
    assert_eq!(SourceLanguage::Java.continuation(&java_lines[1]), None);
    assert!(SourceLanguage::Java.continuation(&java_lines[2]).is_some());
}

// --- Python マッチャー ---

#[test]
fn test_first_matching_construct_wins() {
    let (construct, _) = first_match("print(x)", SourceLanguage::Python, Dialect::Ib, &[]).unwrap();
    assert_eq!(construct, "print");
    let (construct, _) = first_match("x = input()", SourceLanguage::Python, Dialect::Ib, &[]).unwrap();
    assert_eq!(construct, "input");
    let (construct, _) = first_match("MAX = 10", SourceLanguage::Python, Dialect::Igcse, &[]).unwrap();
    assert_eq!(construct, "constant");
    let (construct, _) = first_match("MAX = 10", SourceLanguage::Python, Dialect::Ib, &[]).unwrap();
    assert_eq!(construct, "assign");
}

#[test]
fn test_python_def_headers() {
    let src = "def add(a: int, b: int) -> int:\n    return a + b\n";
    let lines = split_logical_lines(src, SourceLanguage::Python);
    let scan = PreScan::run(&lines, SourceLanguage::Python);
    let ctx = MatchContext {
        language: SourceLanguage::Python,
        table: Dialect::Igcse.table(),
        scan: &scan,
        frames: &[],
        indent: String::new(),
        unit: "   ".to_string(),
        inline_declarations: false,
    };
    let converted = SourceLanguage::Python
        .matchers()
        .iter()
        .find_map(|m| (m.apply)(&lines[0], &ctx))
        .unwrap();
    assert_eq!(
        converted.lines,
        vec!["FUNCTION Add(a : INTEGER, b : INTEGER) RETURNS INTEGER"]
    );
    assert_eq!(converted.opens.map(|o| o.kind), Some(BlockKind::Function));

    assert_eq!(py("def greet(name):  # procedure", Dialect::Ib), vec!["PROCEDURE greet(name)"]);
    assert_eq!(py("def greet(name):", Dialect::Ib), vec!["FUNCTION greet(name)"]);
}

#[test]
fn test_python_class_header() {
    assert_eq!(py("class Dog(Animal):", Dialect::Ib), vec!["CLASS Dog EXTENDS Animal"]);
    assert_eq!(py("class Dog(Animal):", Dialect::Igcse), vec!["CLASS Dog INHERITS Animal"]);
    assert_eq!(py("class Point(object):", Dialect::Ib), vec!["CLASS Point"]);
}

#[test]
fn test_python_input_prompt() {
    assert_eq!(
        py("name = input(\"Name: \")", Dialect::Igcse),
        vec!["OUTPUT \"Name: \"", "INPUT name"]
    );
    assert_eq!(py("age = int(input(\"Age: \"))", Dialect::Ib), vec!["INPUT age"]);
}

#[test]
fn test_python_print_drops_keyword_args() {
    assert_eq!(py("print(a, b, sep=\"-\")", Dialect::Igcse), vec!["OUTPUT a, b"]);
    assert_eq!(py("print(a, b)", Dialect::Ib), vec!["OUTPUT a + b"]);
    assert_eq!(py("print()", Dialect::Ib), vec!["OUTPUT \"\""]);
}

#[test]
fn test_python_for_each_cursor_expansion() {
    let (_, converted) = first_match("for n in names:", SourceLanguage::Python, Dialect::Ib, &[]).unwrap();
    assert_eq!(
        converted.lines,
        vec!["names.resetNext()", "loop while names.hasNext()", "    n ← names.getNext()"]
    );
    assert_eq!(converted.opens.and_then(|o| o.ident).as_deref(), Some("n"));

    assert_eq!(py("for n in names:", Dialect::Igcse), vec!["FOR EACH n IN names"]);
    let (_, converted) = first_match("for n in get_names():", SourceLanguage::Python, Dialect::Ib, &[]).unwrap();
    assert_eq!(
        converted.lines,
        vec![
            "get_names().resetNext()",
            "loop while get_names().hasNext()",
            "    n ← get_names().getNext()"
        ]
    );
}

#[test]
fn test_python_repeat_hint() {
    let (_, converted) =
        first_match("while True:  # repeat", SourceLanguage::Python, Dialect::Ib, &[]).unwrap();
    assert_eq!(converted.lines, vec!["REPEAT"]);
    let opens = converted.opens.unwrap();
    assert_eq!(opens.kind, BlockKind::Repeat);
    assert_eq!(opens.ident, None);
}

#[test]
fn test_python_break_depends_on_enclosing_frame() {
    let case = [frame(BlockKind::Case, None)];
    let (_, dropped) = first_match("break", SourceLanguage::Python, Dialect::Ib, &case).unwrap();
    assert!(dropped.lines.is_empty());

    let loop_frames = [frame(BlockKind::Procedure, None), frame(BlockKind::For, Some("i"))];
    let (_, exit) = first_match("break", SourceLanguage::Python, Dialect::Igcse, &loop_frames).unwrap();
    assert_eq!(exit.lines, vec!["EXIT FOR"]);
}

#[test]
fn test_python_match_case() {
    assert_eq!(py("match day:", Dialect::Ib), vec!["CASE OF day"]);
    assert_eq!(py("case 1 | 2:", Dialect::Ib), vec!["1, 2 :"]);
    assert_eq!(py("case _:", Dialect::Igcse), vec!["OTHERWISE"]);
}

#[test]
fn test_python_silent_lines() {
    for code in ["pass", "import math", "from os import path"] {
        let (construct, converted) = first_match(code, SourceLanguage::Python, Dialect::Ib, &[]).unwrap();
        assert_eq!(construct, "pass");
        assert!(converted.lines.is_empty());
    }
}

#[test]
fn test_python_call_to_known_procedure() {
    let src = "def show(x):\n    print(x)\nshow(3)";
    assert_eq!(py(src, Dialect::Igcse), vec!["CALL Show(3)"]);
    assert_eq!(py(src, Dialect::Ib), vec!["show(3)"]);
}

// --- Java マッチャー ---

#[test]
fn test_java_counted_for_bounds() {
    assert_eq!(
        java("for (int i = 0; i < 5; i++)", Dialect::Ib),
        vec!["loop i from 0 to 4"]
    );
    assert_eq!(
        java("for (int i = 1; i <= n; i++)", Dialect::Igcse),
        vec!["FOR i ← 1 TO n"]
    );
    assert_eq!(
        java("for (int i = 10; i > 0; i -= 2)", Dialect::Igcse),
        vec!["FOR i ← 10 TO 1 STEP -2"]
    );
}

#[test]
fn test_java_output_and_input() {
    assert_eq!(
        java("System.out.println(\"Sum: \" + total);", Dialect::Igcse),
        vec!["OUTPUT \"Sum: \" & total"]
    );
    assert_eq!(java("int n = sc.nextInt();", Dialect::Ib), vec!["INPUT n"]);
    assert_eq!(
        java("age = Integer.parseInt(in.nextLine());", Dialect::Igcse),
        vec!["INPUT age"]
    );
}

#[test]
fn test_java_constants_and_arrays() {
    assert_eq!(java("static final int MAX = 10;", Dialect::Igcse), vec!["CONSTANT MAX = 10"]);
    assert_eq!(java("static final int MAX = 10;", Dialect::Ib), vec!["MAX ← 10"]);
    assert_eq!(java("int[] nums = {1, 2, 3};", Dialect::Ib), vec!["nums ← [1, 2, 3]"]);
    assert!(java("int[] nums = new int[5];", Dialect::Igcse).is_empty());
}

#[test]
fn test_java_increment_and_compound() {
    assert_eq!(java("count++;", Dialect::Ib), vec!["count ← count + 1"]);
    assert_eq!(java("--count;", Dialect::Ib), vec!["count ← count - 1"]);
    assert_eq!(java("total *= 2;", Dialect::Igcse), vec!["total ← total * 2"]);
}

#[test]
fn test_java_silent_lines() {
    for code in [
        "import java.util.Scanner;",
        "Scanner sc = new Scanner(System.in);",
        "sc.close();",
    ] {
        let (construct, converted) = first_match(code, SourceLanguage::Java, Dialect::Ib, &[]).unwrap();
        assert_eq!(construct, "silent");
        assert!(converted.lines.is_empty());
    }
}

#[test]
fn test_java_member_method_header() {
    let class = [frame(BlockKind::Class, None)];
    let (_, converted) = first_match(
        "public void setName(String name) {",
        SourceLanguage::Java,
        Dialect::Igcse,
        &class,
    )
    .unwrap();
    assert_eq!(converted.lines, vec!["PUBLIC PROCEDURE SetName(name : STRING)"]);
}
