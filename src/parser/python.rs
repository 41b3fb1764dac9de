//! Python construct matchers
//!
//! `MATCHERS` の順序が優先順位。最初に受理したマッチャーの結果が使われる。

use super::utils::{
    call_args, find_assignment_eq, find_char_balanced, find_keyword_balanced, find_matching_close,
    is_constant_name, is_identifier, is_string_literal, is_target, split_aug_assign, split_by_comma_balanced, split_call,
};
use super::{Continuation, Hint, LogicalLine, MatchContext, Matcher};
use crate::dialect::SubroutineHeader;
use crate::ir::{BlockKind, Converted, PseudoOp};
use crate::lexer::has_string_literal;
use crate::semantic::{range_bounds, PseudoType};

/// `def` の仮引数
#[derive(Debug, Clone, PartialEq)]
pub struct PyParam {
    pub name: String,
    pub hint: Option<String>,
    pub default: Option<String>,
}

/// `def name(params) -> returns:`
#[derive(Debug, Clone, PartialEq)]
pub struct PyDef {
    pub name: String,
    pub params: Vec<PyParam>,
    pub returns: Option<String>,
}

/// Parse a `def` header line (with its trailing `:`)
pub fn parse_def(code: &str) -> Option<PyDef> {
    let rest = code.strip_prefix("def ")?.trim().strip_suffix(':')?;
    let open = rest.find('(')?;
    let name = rest[..open].trim();
    if !is_identifier(name) {
        return None;
    }
    let close = find_matching_close(rest, open)?;
    let params = split_by_comma_balanced(&rest[open + 1..close])
        .iter()
        .filter_map(|p| parse_param(p))
        .collect();
    let returns = rest[close + 1..]
        .trim()
        .strip_prefix("->")
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());
    Some(PyDef {
        name: name.to_string(),
        params,
        returns,
    })
}

fn parse_param(text: &str) -> Option<PyParam> {
    let text = text.trim().trim_start_matches('*');
    let (head, default) = match find_assignment_eq(text) {
        Some(eq) => (&text[..eq], Some(text[eq + 1..].trim().to_string())),
        None => (text, None),
    };
    let (name, hint) = match find_char_balanced(head, ':') {
        Some(colon) => (head[..colon].trim(), Some(head[colon + 1..].trim().to_string())),
        None => (head.trim(), None),
    };
    // bare `*` and `/` separators carry no name
    if !is_identifier(name) {
        return None;
    }
    Some(PyParam {
        name: name.to_string(),
        hint,
        default,
    })
}

/// `keyword <rest>:` → `<rest>`
fn block_header<'a>(code: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = code.strip_prefix(keyword)?;
    if !rest.starts_with([' ', '(']) {
        return None;
    }
    Some(rest.strip_suffix(':')?.trim())
}

/// `elif` / `else` は if 連鎖を、`except` / `finally` は try 連鎖を続ける
pub fn continuation(line: &LogicalLine) -> Option<Continuation> {
    let code = line.code.as_str();
    if block_header(code, "elif").is_some() || code == "else:" {
        return Some(Continuation::Chain(&[BlockKind::If, BlockKind::Elif]));
    }
    if code == "except:" || block_header(code, "except").is_some() || code == "finally:" {
        return Some(Continuation::Chain(&[BlockKind::Try, BlockKind::Catch]));
    }
    None
}

pub static MATCHERS: &[Matcher] = &[
    Matcher { construct: "def", apply: match_def },
    Matcher { construct: "class", apply: match_class },
    Matcher { construct: "if", apply: match_if },
    Matcher { construct: "elif", apply: match_elif },
    Matcher { construct: "else", apply: match_else },
    Matcher { construct: "for-range", apply: match_for_range },
    Matcher { construct: "for-each", apply: match_for_each },
    Matcher { construct: "while", apply: match_while },
    Matcher { construct: "repeat", apply: match_repeat },
    Matcher { construct: "match", apply: match_match },
    Matcher { construct: "case", apply: match_case },
    Matcher { construct: "try", apply: match_try },
    Matcher { construct: "except", apply: match_except },
    Matcher { construct: "finally", apply: match_finally },
    Matcher { construct: "return", apply: match_return },
    Matcher { construct: "break", apply: match_break },
    Matcher { construct: "pass", apply: match_silent },
    Matcher { construct: "print", apply: match_print },
    Matcher { construct: "input", apply: match_input },
    Matcher { construct: "compound-assign", apply: match_compound },
    Matcher { construct: "constant", apply: match_constant },
    Matcher { construct: "assign", apply: match_assign },
    Matcher { construct: "call", apply: match_call },
];

fn match_def(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let def = parse_def(&line.code)?;
    let member = ctx.enclosing_class().is_some();
    let constructor = member && def.name == "__init__";
    let known = ctx.scan.subroutine(&def.name);

    // 戻り値の型を書く方言は事前走査で FUNCTION / PROCEDURE を決める
    let kind = if line.hint == Some(Hint::Procedure) || (constructor && ctx.table.constructor_name.is_some()) {
        BlockKind::Procedure
    } else if ctx.table.returns_kw.is_some() && !known.map_or(false, |s| s.returns_value) {
        BlockKind::Procedure
    } else {
        BlockKind::Function
    };

    let params = def
        .params
        .iter()
        .filter(|p| !(member && (p.name == "self" || p.name == "cls")))
        .map(|p| {
            let ty = known
                .and_then(|s| s.params.iter().find(|kp| kp.name == p.name))
                .and_then(|kp| kp.ty.clone())
                .or_else(|| p.hint.as_deref().and_then(PseudoType::from_python_hint));
            (p.name.clone(), ty)
        })
        .collect();

    let header = SubroutineHeader {
        kind,
        name: def.name.clone(),
        params,
        returns: known.and_then(|s| s.returns.clone()),
        member,
        constructor,
    };
    Some(Converted::line(ctx.emit(ctx.table.subroutine_header(&header))).opening(kind, None))
}

fn match_class(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let rest = line.code.strip_prefix("class ")?.strip_suffix(':')?.trim();
    let (name, parent) = match rest.find('(') {
        Some(open) => {
            let parent = call_args(rest, rest[..open].trim())?;
            let parent = split_by_comma_balanced(parent).into_iter().next();
            (rest[..open].trim(), parent.filter(|p| p != "object"))
        }
        None => (rest, None),
    };
    if !is_identifier(name) {
        return None;
    }
    let header = ctx.table.class_header(name, parent.as_deref());
    Some(Converted::line(ctx.emit(header)).opening(BlockKind::Class, None))
}

fn match_if(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let cond = block_header(&line.code, "if")?;
    let header = ctx.table.if_header(&ctx.expr(cond));
    Some(Converted::line(ctx.emit(header)).opening(BlockKind::If, None))
}

fn match_elif(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let cond = block_header(&line.code, "elif")?;
    let header = ctx.table.else_if_header(&ctx.expr(cond));
    Some(Converted::line(ctx.emit(header)).opening(BlockKind::Elif, None))
}

fn match_else(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    if line.code != "else:" {
        return None;
    }
    Some(Converted::line(ctx.emit(ctx.table.else_line())).opening(BlockKind::Else, None))
}

/// `for v in iterable:` → (v, iterable)
fn for_parts(code: &str) -> Option<(&str, &str)> {
    let header = block_header(code, "for")?;
    let pos = find_keyword_balanced(header, "in")?;
    let var = header[..pos].trim();
    let iterable = header[pos + 2..].trim();
    (is_identifier(var) && !iterable.is_empty()).then_some((var, iterable))
}

fn match_for_range(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let (var, iterable) = for_parts(&line.code)?;
    let args = call_args(iterable, "range")?;
    let args: Vec<String> = split_by_comma_balanced(args).iter().map(|a| ctx.expr(a)).collect();
    let bounds = range_bounds(&args)?;
    let header = ctx.table.range_loop(var, &bounds);
    Some(Converted::line(ctx.emit(header)).opening(BlockKind::For, Some(var.to_string())))
}

fn match_for_each(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let (var, iterable) = for_parts(&line.code)?;
    let lines = ctx.table.collection_loop(var, &ctx.expr(iterable), &ctx.unit);
    let lines = lines.into_iter().map(|l| ctx.emit(l)).collect();
    Some(Converted::lines(lines).opening(BlockKind::For, Some(var.to_string())))
}

fn match_while(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    if line.hint == Some(Hint::Repeat) {
        return None;
    }
    let cond = block_header(&line.code, "while")?;
    let header = ctx.table.while_header(&ctx.expr(cond));
    Some(Converted::line(ctx.emit(header)).opening(BlockKind::While, None))
}

/// `while True:  # repeat` → REPEAT ... UNTIL FALSE
fn match_repeat(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    if line.hint != Some(Hint::Repeat) {
        return None;
    }
    let cond = block_header(&line.code, "while")?;
    let until = match cond {
        "True" | "(True)" => None,
        cond => Some(format!("{} ({})", ctx.table.op(PseudoOp::Not), ctx.expr(cond))),
    };
    Some(Converted::line(ctx.emit(ctx.table.repeat_line())).opening(BlockKind::Repeat, until))
}

fn match_match(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let subject = block_header(&line.code, "match")?;
    let header = ctx.table.case_of(&ctx.expr(subject));
    Some(Converted::line(ctx.emit(header)).opening(BlockKind::Case, None))
}

fn match_case(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let pattern = block_header(&line.code, "case")?;
    if pattern == "_" {
        return Some(Converted::line(ctx.emit(ctx.table.otherwise_line())));
    }
    let values: Vec<String> = pattern.split(" | ").map(|v| ctx.expr(v)).collect();
    Some(Converted::line(ctx.emit(ctx.table.case_clause(&values.join(", ")))))
}

fn match_try(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    if line.code != "try:" {
        return None;
    }
    Some(Converted::line(ctx.emit(ctx.table.try_line())).opening(BlockKind::Try, None))
}

/// `except`, `except E:`, `except E as e:`, `except (A, B) as e:`
fn match_except(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let exception = if line.code == "except:" {
        None
    } else {
        let spec = block_header(&line.code, "except")?;
        let spec = match find_keyword_balanced(spec, "as") {
            Some(pos) => spec[..pos].trim(),
            None => spec,
        };
        let spec = spec
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .unwrap_or(spec);
        Some(split_by_comma_balanced(spec).join(", "))
    };
    let catch = ctx.table.catch_line(exception.as_deref());
    Some(Converted::line(ctx.emit(catch)).opening(BlockKind::Catch, None))
}

fn match_finally(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    if line.code != "finally:" {
        return None;
    }
    Some(Converted::line(ctx.emit(ctx.table.finally_line())).opening(BlockKind::Finally, None))
}

fn match_return(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let code = line.code.as_str();
    if code == "return" {
        return Some(Converted::line(ctx.emit(ctx.table.return_line(None))));
    }
    let value = code.strip_prefix("return ")?;
    let value = ctx.value(value);
    Some(Converted::line(ctx.emit(ctx.table.return_line(Some(&value)))))
}

/// CASE の中では捨て、ループの中では脱出文にする
fn match_break(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    if line.code != "break" {
        return None;
    }
    let frame = ctx.innermost_breakable()?;
    if frame.kind == BlockKind::Case {
        return Some(Converted::nothing());
    }
    let exit = ctx.table.exit_loop(frame.kind)?;
    Some(Converted::line(ctx.emit(exit)))
}

/// `pass`, `import x`, `from x import y`
fn match_silent(line: &LogicalLine, _ctx: &MatchContext<'_>) -> Option<Converted> {
    let code = line.code.as_str();
    let silent = code == "pass"
        || code.starts_with("import ")
        || (code.starts_with("from ") && find_keyword_balanced(code, "import").is_some());
    silent.then(Converted::nothing)
}

/// `sep=`, `end=`, `file=` のようなキーワード引数
fn is_keyword_arg(arg: &str) -> bool {
    find_assignment_eq(arg).map_or(false, |eq| is_identifier(arg[..eq].trim()))
}

fn match_print(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let args = call_args(&line.code, "print")?;
    let args: Vec<String> = split_by_comma_balanced(args)
        .iter()
        .filter(|a| !is_keyword_arg(a))
        .map(|a| ctx.value(a))
        .collect();
    Some(Converted::line(ctx.emit(ctx.table.output(&args))))
}

/// `x = input(...)`, `x = int(input(...))`, `input()`
fn match_input(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let code = line.code.as_str();
    let (target, value) = match find_assignment_eq(code) {
        Some(eq) => {
            let target = code[..eq].trim();
            let target = match find_char_balanced(target, ':') {
                Some(colon) => target[..colon].trim(),
                None => target,
            };
            (Some(target), code[eq + 1..].trim())
        }
        None => (None, code),
    };
    if target.map_or(false, |t| !is_target(t)) {
        return None;
    }
    let inner = ["int", "float", "str", "bool"]
        .iter()
        .find_map(|conv| call_args(value, conv))
        .unwrap_or(value);
    let prompt = call_args(inner, "input")?;
    let prompt = (!prompt.is_empty()).then(|| ctx.value(prompt));
    let lines = ctx
        .table
        .input(target, prompt.as_deref())
        .into_iter()
        .map(|l| ctx.emit(l))
        .collect();
    Some(Converted::lines(lines))
}

fn match_compound(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let (target, op, value) = split_aug_assign(&line.code)?;
    if value.is_empty() {
        return None;
    }
    let concat = has_string_literal(value) || ctx.scan.variable_type(target) == Some(&PseudoType::String);
    let body = ctx.table.compound(target, op, &ctx.value(value), concat);
    Some(Converted::line(ctx.emit(body)))
}

/// `MAX = 10` → `CONSTANT MAX = 10` (定数のある方言のみ)
fn match_constant(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    ctx.table.constant?;
    let code = line.code.as_str();
    let eq = find_assignment_eq(code)?;
    let name = code[..eq].trim();
    let value = code[eq + 1..].trim();
    if !is_constant_name(name) || !is_literal(value) {
        return None;
    }
    let body = ctx.table.constant_line(name, &ctx.expr(value))?;
    Some(Converted::line(ctx.emit(body)))
}

/// 数値・文字列・真偽値のリテラル
pub(crate) fn is_literal(value: &str) -> bool {
    let numeric = value.trim_start_matches('-');
    is_string_literal(value)
        || matches!(value, "True" | "False" | "true" | "false")
        || (numeric.starts_with(|c: char| c.is_ascii_digit()) && numeric.parse::<f64>().is_ok())
}

fn match_assign(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let code = line.code.as_str();
    let eq = find_assignment_eq(code)?;
    let target = code[..eq].trim();
    let target = match find_char_balanced(target, ':') {
        Some(colon) => target[..colon].trim(),
        None => target,
    };
    let value = code[eq + 1..].trim();
    if !is_target(target) || value.is_empty() {
        return None;
    }
    let body = ctx.table.assign(target, &ctx.value(value));
    Some(Converted::line(ctx.emit(body)))
}

/// 既知の手続きの呼び出し文
fn match_call(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let (callee, args) = split_call(&line.code)?;
    if !ctx.scan.is_subroutine(callee) {
        return None;
    }
    let args: Vec<String> = split_by_comma_balanced(args).iter().map(|a| ctx.value(a)).collect();
    let body = ctx.table.call(&ctx.table.subroutine_name(callee), &args.join(", "));
    Some(Converted::line(ctx.emit(body)))
}
