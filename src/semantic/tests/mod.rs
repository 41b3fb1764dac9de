//! semantic module tests

use super::*;
use crate::parser::split_logical_lines;

fn scan_python(source: &str) -> PreScan {
    PreScan::run(&split_logical_lines(source, SourceLanguage::Python), SourceLanguage::Python)
}

fn scan_java(source: &str) -> PreScan {
    PreScan::run(&split_logical_lines(source, SourceLanguage::Java), SourceLanguage::Java)
}

fn names(scan: &PreScan) -> Vec<&str> {
    scan.declarations().iter().map(|d| d.name.as_str()).collect()
}

// --- Python ---
#[test]
fn test_python_literal_declarations() {
    let scan = scan_python("count = 0\nname = \"Ann\"\nprice = 2.5\ndone = False\n");
    assert_eq!(names(&scan), vec!["count", "name", "price", "done"]);
    assert_eq!(scan.variable_type("count"), Some(&PseudoType::Integer));
    assert_eq!(scan.variable_type("name"), Some(&PseudoType::String));
    assert_eq!(scan.variable_type("price"), Some(&PseudoType::Real));
    assert_eq!(scan.variable_type("done"), Some(&PseudoType::Boolean));
}

#[test]
fn test_python_first_assignment_wins() {
    let scan = scan_python("x = 1\nx = \"one\"\n");
    assert_eq!(scan.declarations().len(), 1);
    assert_eq!(scan.variable_type("x"), Some(&PseudoType::Integer));
}

#[test]
fn test_python_loop_counter_and_array() {
    let scan = scan_python("nums = [3, 4, 5]\nfor i in range(3):\n    print(i)\nfor n in nums:\n    print(n)\n");
    assert_eq!(
        scan.variable_type("nums"),
        Some(&PseudoType::array_of(PseudoType::Integer, Some("2".to_string())))
    );
    assert_eq!(scan.variable_type("i"), Some(&PseudoType::Integer));
    assert_eq!(scan.variable_type("n"), Some(&PseudoType::Integer));
}

#[test]
fn test_python_constants_are_not_declared() {
    let scan = scan_python("MAX = 10\nN = 5\nlimit = MAX + 1\n");
    assert_eq!(names(&scan), vec!["limit"]);
    // a computed all-caps name is an ordinary variable
    let computed = scan_python("TOTAL = len(xs)\n");
    assert_eq!(names(&computed), vec!["TOTAL"]);
}

#[test]
fn test_python_input_is_string() {
    let scan = scan_python("name = input(\"Name? \")\nage = int(input())\n");
    assert_eq!(scan.variable_type("name"), Some(&PseudoType::String));
    assert_eq!(scan.variable_type("age"), Some(&PseudoType::Integer));
}

#[test]
fn test_python_subroutines() {
    let src = "def add(a, b):\n    return a + b\n\ndef greet(name):\n    print(name)\n\ntotal = add(1, 2)\ngreet(\"Ann\")\n";
    let scan = scan_python(src);

    let add = scan.subroutine("add").unwrap();
    assert!(add.returns_value);
    assert_eq!(add.returns, Some(PseudoType::Integer));
    assert_eq!(add.params[0].ty, Some(PseudoType::Integer));

    let greet = scan.subroutine("greet").unwrap();
    assert!(!greet.returns_value);
    assert_eq!(greet.params[0].ty, Some(PseudoType::String));

    assert_eq!(scan.variable_type("total"), Some(&PseudoType::Integer));
    assert!(!scan.is_subroutine("print"));
}

#[test]
fn test_python_hints_and_defaults() {
    let src = "def area(w: float, h=2) -> float:\n    return w * h\n";
    let scan = scan_python(src);
    let area = scan.subroutine("area").unwrap();
    assert_eq!(area.params[0].ty, Some(PseudoType::Real));
    assert_eq!(area.params[1].ty, Some(PseudoType::Integer));
    assert_eq!(area.returns, Some(PseudoType::Real));
}

#[test]
fn test_python_params_and_self_are_skipped() {
    let src = "class Dog:\n    def __init__(self, name):\n        self.name = name\n        name = name.strip()\n";
    let scan = scan_python(src);
    assert!(scan.declarations().is_empty());
    let init = scan.subroutine("__init__").unwrap();
    assert_eq!(init.params.len(), 1);
    assert_eq!(init.params[0].name, "name");
}

// --- Java ---
#[test]
fn test_java_typed_declarations() {
    let src = "int count = 0;\nString name;\ndouble a = 1.5, b;\nfinal int MAX = 10;\n";
    let scan = scan_java(src);
    assert_eq!(names(&scan), vec!["count", "name", "a", "b"]);
    assert_eq!(scan.variable_type("name"), Some(&PseudoType::String));
    assert_eq!(scan.variable_type("b"), Some(&PseudoType::Real));
}

#[test]
fn test_java_arrays_and_loops() {
    let src = "int[] nums = {1, 2, 3};\nint[] more = new int[10];\nfor (int i = 0; i < 3; i++) {\n}\n";
    let scan = scan_java(src);
    assert_eq!(
        scan.variable_type("nums"),
        Some(&PseudoType::array_of(PseudoType::Integer, Some("2".to_string())))
    );
    assert_eq!(
        scan.variable_type("more"),
        Some(&PseudoType::array_of(PseudoType::Integer, Some("9".to_string())))
    );
    assert_eq!(scan.variable_type("i"), Some(&PseudoType::Integer));
}

#[test]
fn test_java_methods() {
    let src = "public class Main {\n    static int square(int n) {\n        return n * n;\n    }\n    static void show(String s) {\n    }\n}\n";
    let scan = scan_java(src);
    let square = scan.subroutine("square").unwrap();
    assert!(square.returns_value);
    assert_eq!(square.returns, Some(PseudoType::Integer));
    assert_eq!(square.params[0].ty, Some(PseudoType::Integer));
    assert!(!scan.subroutine("show").unwrap().returns_value);
    assert!(scan.declarations().is_empty());
}

#[test]
fn test_type_lookup_uses_function_returns() {
    let scan = scan_python("def half(x) -> float:\n    return x / 2\n");
    assert_eq!(scan.type_of("half"), Some(PseudoType::Real));
    assert_eq!(scan.type_of("missing"), None);
}
