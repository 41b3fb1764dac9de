//! 方言テーブルの宣言的定義

use super::{Closer, CollectionStyle, IndentStyle, KeywordTable, RangeStyle};
use crate::ir::{BlockKind, PseudoOp};

/// IB Computer Science pseudocode
pub static IB: KeywordTable = KeywordTable {
    name: "IB",
    comment: "//",
    ops: &[
        (PseudoOp::Assign, "←"),
        (PseudoOp::Eq, "="),
        (PseudoOp::NotEq, "≠"),
        (PseudoOp::LtEq, "≤"),
        (PseudoOp::GtEq, "≥"),
        (PseudoOp::And, "AND"),
        (PseudoOp::Or, "OR"),
        (PseudoOp::Not, "NOT"),
        (PseudoOp::FloorDiv, "div"),
        (PseudoOp::Mod, "mod"),
        (PseudoOp::Pow, "^"),
        (PseudoOp::True, "TRUE"),
        (PseudoOp::False, "FALSE"),
        (PseudoOp::Concat, "+"),
    ],
    closers: &[
        (BlockKind::Function, Closer::Keyword("END FUNCTION")),
        (BlockKind::Procedure, Closer::Keyword("END PROCEDURE")),
        (BlockKind::Class, Closer::Keyword("END CLASS")),
        (BlockKind::If, Closer::Keyword("END IF")),
        (BlockKind::Elif, Closer::Keyword("END IF")),
        (BlockKind::Else, Closer::Keyword("END IF")),
        (BlockKind::For, Closer::Keyword("end loop")),
        (BlockKind::While, Closer::Keyword("END WHILE")),
        (BlockKind::Repeat, Closer::Until("UNTIL")),
        (BlockKind::Case, Closer::Keyword("END CASE")),
        (BlockKind::Try, Closer::Keyword("END TRY")),
        (BlockKind::Catch, Closer::Keyword("END TRY")),
        (BlockKind::Finally, Closer::Keyword("END TRY")),
    ],
    default_indent: IndentStyle::Preserve,

    output: "OUTPUT",
    output_separator: " + ",
    input: "INPUT",
    prompt_before_input: false,

    if_kw: "IF",
    then_kw: "THEN",
    else_if_kw: "ELSE IF",
    else_kw: "ELSE",
    while_kw: "WHILE",
    do_kw: Some("DO"),
    repeat_kw: "REPEAT",
    range_style: RangeStyle::LoopFromTo,
    renders_step: false,
    collection_style: CollectionStyle::CursorExpansion,
    exits: &[
        (BlockKind::For, "EXIT LOOP"),
        (BlockKind::While, "EXIT LOOP"),
        (BlockKind::Repeat, "EXIT LOOP"),
    ],

    case_of: "CASE OF",
    otherwise: "OTHERWISE",
    try_kw: "TRY",
    catch_kw: "CATCH",
    finally_kw: "FINALLY",
    return_kw: "RETURN",

    function_kw: "FUNCTION",
    procedure_kw: "PROCEDURE",
    returns_kw: None,
    typed_signatures: false,
    capitalize_subroutines: false,
    class_kw: "CLASS",
    extends_kw: "EXTENDS",
    member_prefix: None,
    constructor_name: None,
    call_kw: None,
    constant: None,
    declare_kw: "DECLARE",
    declares_upfront: false,
    builtins: &[],
};

/// Cambridge IGCSE pseudocode
pub static IGCSE: KeywordTable = KeywordTable {
    name: "IGCSE",
    comment: "//",
    ops: &[
        (PseudoOp::Assign, "←"),
        (PseudoOp::Eq, "="),
        (PseudoOp::NotEq, "<>"),
        (PseudoOp::LtEq, "<="),
        (PseudoOp::GtEq, ">="),
        (PseudoOp::And, "AND"),
        (PseudoOp::Or, "OR"),
        (PseudoOp::Not, "NOT"),
        (PseudoOp::FloorDiv, "DIV"),
        (PseudoOp::Mod, "MOD"),
        (PseudoOp::Pow, "^"),
        (PseudoOp::True, "TRUE"),
        (PseudoOp::False, "FALSE"),
        (PseudoOp::Concat, "&"),
    ],
    closers: &[
        (BlockKind::Function, Closer::Keyword("ENDFUNCTION")),
        (BlockKind::Procedure, Closer::Keyword("ENDPROCEDURE")),
        (BlockKind::Class, Closer::Keyword("ENDCLASS")),
        (BlockKind::If, Closer::Keyword("ENDIF")),
        (BlockKind::Elif, Closer::Keyword("ENDIF")),
        (BlockKind::Else, Closer::Keyword("ENDIF")),
        (BlockKind::For, Closer::Next("NEXT")),
        (BlockKind::While, Closer::Keyword("ENDWHILE")),
        (BlockKind::Repeat, Closer::Until("UNTIL")),
        (BlockKind::Case, Closer::Keyword("ENDCASE")),
        (BlockKind::Try, Closer::Keyword("ENDTRY")),
        (BlockKind::Catch, Closer::Keyword("ENDTRY")),
        (BlockKind::Finally, Closer::Keyword("ENDTRY")),
    ],
    default_indent: IndentStyle::Width(3),

    output: "OUTPUT",
    output_separator: ", ",
    input: "INPUT",
    prompt_before_input: true,

    if_kw: "IF",
    then_kw: "THEN",
    else_if_kw: "ELSE IF",
    else_kw: "ELSE",
    while_kw: "WHILE",
    do_kw: Some("DO"),
    repeat_kw: "REPEAT",
    range_style: RangeStyle::ForTo,
    renders_step: true,
    collection_style: CollectionStyle::ForEach,
    exits: &[
        (BlockKind::For, "EXIT FOR"),
        (BlockKind::While, "EXIT WHILE"),
        (BlockKind::Repeat, "EXIT REPEAT"),
    ],

    case_of: "CASE OF",
    otherwise: "OTHERWISE",
    try_kw: "TRY",
    catch_kw: "CATCH",
    finally_kw: "FINALLY",
    return_kw: "RETURN",

    function_kw: "FUNCTION",
    procedure_kw: "PROCEDURE",
    returns_kw: Some("RETURNS"),
    typed_signatures: true,
    capitalize_subroutines: true,
    class_kw: "CLASS",
    extends_kw: "INHERITS",
    member_prefix: Some("PUBLIC"),
    constructor_name: Some("NEW"),
    call_kw: Some("CALL"),
    constant: Some(("CONSTANT", "=")),
    declare_kw: "DECLARE",
    declares_upfront: true,
    builtins: &[
        ("len", "LENGTH"),
        ("int", "INT"),
        ("round", "ROUND"),
        ("str", "NUM_TO_STR"),
        ("Math.round", "ROUND"),
        ("Math.floor", "INT"),
        ("Math.random", "RANDOM"),
        ("Math.sqrt", "SQRT"),
        ("Math.abs", "ABS"),
    ],
};
