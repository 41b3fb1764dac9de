//! Java construct matchers
//!
//! 行は `split_logical_lines` で行頭の `}`、行末の `{` と `;` を取り除いた状態で渡される。

use super::utils::{
    call_args, find_assignment_eq, find_char_balanced, find_keyword_balanced, find_matching_close, is_identifier,
    is_target, split_aug_assign, split_by_comma_balanced, split_call,
};
use super::{Continuation, LogicalLine, MatchContext, Matcher};
use crate::dialect::SubroutineHeader;
use crate::ir::{AugAssignOp, BlockKind, Converted};
use crate::lexer::has_string_literal;
use crate::semantic::{minus_one, plus_one, PseudoType, RangeBounds};

const MODIFIERS: &[&str] = &[
    "public",
    "private",
    "protected",
    "static",
    "final",
    "abstract",
    "synchronized",
    "native",
    "transient",
    "volatile",
];

/// 型名やメソッド名になりえない語
const STATEMENT_WORDS: &[&str] = &[
    "return", "new", "else", "case", "throw", "package", "import", "class", "interface", "enum", "if", "for",
    "while", "do", "switch", "try", "catch", "finally", "break", "continue", "assert", "yield", "default",
];

/// メソッド宣言
#[derive(Debug, Clone, PartialEq)]
pub struct JavaMethod {
    pub modifiers: Vec<String>,
    /// 戻り値の型。コンストラクタは None
    pub returns: Option<String>,
    pub name: String,
    /// (型, 名前)
    pub params: Vec<(String, String)>,
}

/// 変数宣言 (`int a = 1, b;`)
#[derive(Debug, Clone, PartialEq)]
pub struct JavaDecl {
    pub is_final: bool,
    pub ty: String,
    pub vars: Vec<(String, Option<String>)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForHeader {
    /// `for (init; cond; update)`
    Counted { init: String, cond: String, update: String },
    /// `for (T v : collection)`
    Each { decl: String, var: String, collection: String },
}

fn is_type_word(word: &str) -> bool {
    word.starts_with(|c: char| c.is_ascii_alphabetic())
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '<' | '>' | '[' | ']' | '.' | '?'))
        && !STATEMENT_WORDS.contains(&word)
}

/// `name[]` → (`name`, `[]`)
fn split_array_suffix(name: &str) -> (&str, &str) {
    match name.find('[') {
        Some(pos) => (&name[..pos], &name[pos..]),
        None => (name, ""),
    }
}

/// `public static int add(int a, int b)` (行末の `{` は除去済み)
pub fn parse_method(code: &str) -> Option<JavaMethod> {
    let code = match find_keyword_balanced(code, "throws") {
        Some(pos) => code[..pos].trim(),
        None => code.trim(),
    };
    let open = code.find('(')?;
    if find_matching_close(code, open)? + 1 != code.len() {
        return None;
    }
    let head: Vec<&str> = code[..open].split_whitespace().collect();
    let (name, rest) = head.split_last()?;
    if !is_identifier(name) || STATEMENT_WORDS.contains(name) {
        return None;
    }

    let mut modifiers = Vec::new();
    let mut types = Vec::new();
    for word in rest {
        if MODIFIERS.contains(word) && types.is_empty() {
            modifiers.push(word.to_string());
        } else {
            types.push(*word);
        }
    }
    if types.len() > 1 || types.iter().any(|t| !is_type_word(t)) {
        return None;
    }
    let returns = types.first().map(|t| t.to_string());
    // `foo(x)` without a modifier or return type is a call, unless it names a class
    let constructor_like = name.starts_with(|c: char| c.is_ascii_uppercase());
    if returns.is_none() && modifiers.is_empty() && !constructor_like {
        return None;
    }

    let mut params = Vec::new();
    for param in split_by_comma_balanced(&code[open + 1..code.len() - 1]) {
        let words: Vec<&str> = param.split_whitespace().filter(|w| *w != "final").collect();
        let (pname, ty) = words.split_last()?;
        let (pname, suffix) = split_array_suffix(pname);
        let ty = format!("{}{suffix}", ty.join(" ")).replace("...", "[]");
        if !is_identifier(pname) || ty.is_empty() {
            return None;
        }
        params.push((ty, pname.to_string()));
    }

    Some(JavaMethod {
        modifiers,
        returns,
        name: name.to_string(),
        params,
    })
}

/// `final int a = 1, b` (行末の `;` は除去済み)
pub fn parse_declaration(code: &str) -> Option<JavaDecl> {
    let segments = split_by_comma_balanced(code);
    let (first, others) = segments.split_first()?;
    let (head, init) = split_init(first);

    let words: Vec<&str> = head.split_whitespace().collect();
    let (name, rest) = words.split_last()?;
    let mut is_final = false;
    let mut types = Vec::new();
    for word in rest {
        match *word {
            "final" => is_final = true,
            w if MODIFIERS.contains(&w) => {}
            w => types.push(w),
        }
    }
    if types.len() != 1 || !is_type_word(types[0]) {
        return None;
    }
    let (name, suffix) = split_array_suffix(name);
    if !is_identifier(name) {
        return None;
    }

    let mut vars = vec![(name.to_string(), init)];
    for segment in others {
        let (var, init) = split_init(segment);
        if !is_identifier(var) {
            return None;
        }
        vars.push((var.to_string(), init));
    }
    Some(JavaDecl {
        is_final,
        ty: format!("{}{suffix}", types[0]),
        vars,
    })
}

fn split_init(segment: &str) -> (&str, Option<String>) {
    match find_assignment_eq(segment) {
        Some(eq) => (segment[..eq].trim(), Some(segment[eq + 1..].trim().to_string())),
        None => (segment.trim(), None),
    }
}

/// `for (...)` の括弧の中身を分類する
pub fn for_header(code: &str) -> Option<ForHeader> {
    let inner = call_args(code, "for")?;
    if let Some(colon) = find_char_balanced(inner, ':') {
        let decl = inner[..colon].trim();
        let var = decl.split_whitespace().last()?;
        return Some(ForHeader::Each {
            decl: decl.to_string(),
            var: var.to_string(),
            collection: inner[colon + 1..].trim().to_string(),
        });
    }
    let parts: Vec<&str> = inner.split(';').map(str::trim).collect();
    match parts.as_slice() {
        [init, cond, update] => Some(ForHeader::Counted {
            init: init.to_string(),
            cond: cond.to_string(),
            update: update.to_string(),
        }),
        _ => None,
    }
}

/// `else` / `else if` は if 連鎖を、`catch` / `finally` は try 連鎖を続け、
/// `} while (c);` は do ブロックを条件付きで閉じる
pub fn continuation(line: &LogicalLine) -> Option<Continuation> {
    let code = line.code.as_str();
    if code == "else" || code.strip_prefix("else").map_or(false, |r| call_args(r.trim(), "if").is_some()) {
        return Some(Continuation::Chain(&[BlockKind::If, BlockKind::Elif]));
    }
    if code == "finally" || call_args(code, "catch").is_some() {
        return Some(Continuation::Chain(&[BlockKind::Try, BlockKind::Catch]));
    }
    if line.terminated {
        if let Some(cond) = call_args(code, "while") {
            return Some(Continuation::Until(cond.to_string()));
        }
    }
    None
}

pub static MATCHERS: &[Matcher] = &[
    Matcher { construct: "silent", apply: match_silent },
    Matcher { construct: "method", apply: match_method },
    Matcher { construct: "class", apply: match_class },
    Matcher { construct: "if", apply: match_if },
    Matcher { construct: "else-if", apply: match_else_if },
    Matcher { construct: "else", apply: match_else },
    Matcher { construct: "for-counted", apply: match_for_counted },
    Matcher { construct: "for-each", apply: match_for_each },
    Matcher { construct: "while", apply: match_while },
    Matcher { construct: "do", apply: match_do },
    Matcher { construct: "switch", apply: match_switch },
    Matcher { construct: "case", apply: match_case },
    Matcher { construct: "try", apply: match_try },
    Matcher { construct: "catch", apply: match_catch },
    Matcher { construct: "finally", apply: match_finally },
    Matcher { construct: "return", apply: match_return },
    Matcher { construct: "break", apply: match_break },
    Matcher { construct: "println", apply: match_print },
    Matcher { construct: "scanner-input", apply: match_input },
    Matcher { construct: "increment", apply: match_increment },
    Matcher { construct: "compound-assign", apply: match_compound },
    Matcher { construct: "constant", apply: match_constant },
    Matcher { construct: "declaration", apply: match_declaration },
    Matcher { construct: "assign", apply: match_assign },
    Matcher { construct: "call", apply: match_call },
];

/// `package`, `import`, Scanner の生成と `close()`
fn match_silent(line: &LogicalLine, _ctx: &MatchContext<'_>) -> Option<Converted> {
    let code = line.code.as_str();
    let silent = code.starts_with("package ")
        || code.starts_with("import ")
        || (code.contains("new Scanner(") && find_assignment_eq(code).is_some())
        || (code.ends_with(".close()") && is_target(code.trim_end_matches(".close()")));
    silent.then(Converted::nothing)
}

fn match_method(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    if line.terminated {
        return None;
    }
    let method = parse_method(&line.code)?;
    let class = ctx.enclosing_class();
    let constructor = method.returns.is_none();
    let kind = match method.returns.as_deref() {
        None | Some("void") => BlockKind::Procedure,
        Some(_) => BlockKind::Function,
    };
    let params = method
        .params
        .iter()
        .map(|(ty, name)| (name.clone(), PseudoType::from_java_type(ty)))
        .collect();
    let header = SubroutineHeader {
        kind,
        name: method.name.clone(),
        params,
        returns: method.returns.as_deref().and_then(PseudoType::from_java_type),
        member: class.is_some() && !method.modifiers.iter().any(|m| m == "static"),
        constructor,
    };
    Some(Converted::line(ctx.emit(ctx.table.subroutine_header(&header))).opening(kind, None))
}

/// `public class Dog extends Animal implements Pet`
fn match_class(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let code = line.code.as_str();
    let pos = find_keyword_balanced(code, "class")?;
    if !code[..pos].split_whitespace().all(|w| MODIFIERS.contains(&w)) {
        return None;
    }
    let rest: Vec<&str> = code[pos + "class".len()..].split_whitespace().collect();
    let name = rest.first()?;
    if !is_identifier(name) {
        return None;
    }
    let parent = rest
        .windows(2)
        .find(|w| w[0] == "extends")
        .map(|w| w[1]);
    let header = ctx.table.class_header(name, parent);
    Some(Converted::line(ctx.emit(header)).opening(BlockKind::Class, None))
}

fn match_if(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let cond = call_args(&line.code, "if")?;
    let header = ctx.table.if_header(&ctx.expr(cond));
    Some(Converted::line(ctx.emit(header)).opening(BlockKind::If, None))
}

fn match_else_if(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let rest = line.code.strip_prefix("else")?.trim_start();
    let cond = call_args(rest, "if")?;
    let header = ctx.table.else_if_header(&ctx.expr(cond));
    Some(Converted::line(ctx.emit(header)).opening(BlockKind::Elif, None))
}

fn match_else(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    if line.code != "else" {
        return None;
    }
    Some(Converted::line(ctx.emit(ctx.table.else_line())).opening(BlockKind::Else, None))
}

/// 数え上げ for を上限込みの範囲に直す
fn counted_bounds(init: &str, cond: &str, update: &str, ctx: &MatchContext<'_>) -> Option<(String, RangeBounds)> {
    let (var, start) = match parse_declaration(init) {
        Some(decl) if decl.vars.len() == 1 => {
            let (var, start) = decl.vars.into_iter().next()?;
            (var, start?)
        }
        _ => {
            let eq = find_assignment_eq(init)?;
            (init[..eq].trim().to_string(), init[eq + 1..].trim().to_string())
        }
    };
    if !is_identifier(&var) {
        return None;
    }

    let rest = cond.strip_prefix(var.as_str())?.trim_start();
    let (symbol, bound) = ["<=", ">=", "<", ">"]
        .iter()
        .find_map(|sym| rest.strip_prefix(sym).map(|b| (*sym, ctx.expr(b))))?;
    let end = match symbol {
        "<" => minus_one(&bound),
        ">" => plus_one(&bound),
        _ => bound,
    };

    let update = update.trim();
    let step = if update == format!("{var}++") || update == format!("++{var}") {
        None
    } else if update == format!("{var}--") || update == format!("--{var}") {
        Some("-1".to_string())
    } else {
        match split_aug_assign(update) {
            Some((target, AugAssignOp::Add, step)) if target == var => Some(ctx.expr(step)),
            Some((target, AugAssignOp::Sub, step)) if target == var => Some(format!("-{}", ctx.expr(step))),
            _ => return None,
        }
    };

    Some((
        var,
        RangeBounds {
            start: ctx.expr(&start),
            end,
            step,
        },
    ))
}

fn match_for_counted(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let (var, bounds) = match for_header(&line.code)? {
        ForHeader::Counted { init, cond, update } => counted_bounds(&init, &cond, &update, ctx)?,
        ForHeader::Each { .. } => return None,
    };
    let header = ctx.table.range_loop(&var, &bounds);
    Some(Converted::line(ctx.emit(header)).opening(BlockKind::For, Some(var)))
}

fn match_for_each(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let (var, collection) = match for_header(&line.code)? {
        ForHeader::Each { var, collection, .. } => (var, collection),
        ForHeader::Counted { .. } => return None,
    };
    let lines = ctx.table.collection_loop(&var, &ctx.expr(&collection), &ctx.unit);
    let lines = lines.into_iter().map(|l| ctx.emit(l)).collect();
    Some(Converted::lines(lines).opening(BlockKind::For, Some(var)))
}

fn match_while(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    if line.terminated {
        return None;
    }
    let cond = call_args(&line.code, "while")?;
    let header = ctx.table.while_header(&ctx.expr(cond));
    Some(Converted::line(ctx.emit(header)).opening(BlockKind::While, None))
}

/// `do {` は `} while (c);` で閉じる REPEAT を開く
fn match_do(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    if line.code != "do" {
        return None;
    }
    Some(Converted::line(ctx.emit(ctx.table.repeat_line())).opening(BlockKind::Repeat, None))
}

fn match_switch(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let subject = call_args(&line.code, "switch")?;
    let header = ctx.table.case_of(&ctx.expr(subject));
    Some(Converted::line(ctx.emit(header)).opening(BlockKind::Case, None))
}

/// `case 1:` / `default:`。ラベルの後ろに文が続く行は扱わない
fn match_case(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let code = line.code.as_str();
    if code == "default:" {
        return Some(Converted::line(ctx.emit(ctx.table.otherwise_line())));
    }
    let label = code.strip_prefix("case ")?.strip_suffix(':')?;
    if find_char_balanced(label, ':').is_some() {
        return None;
    }
    let values: Vec<String> = split_by_comma_balanced(label).iter().map(|v| ctx.expr(v)).collect();
    Some(Converted::line(ctx.emit(ctx.table.case_clause(&values.join(", ")))))
}

fn match_try(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    if line.code != "try" {
        return None;
    }
    Some(Converted::line(ctx.emit(ctx.table.try_line())).opening(BlockKind::Try, None))
}

/// `catch (IOException | RuntimeException e)`
fn match_catch(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let param = call_args(&line.code, "catch")?;
    let words: Vec<&str> = param.split_whitespace().collect();
    let exception = match words.split_last() {
        Some((_, types)) if !types.is_empty() => Some(types.join(" ")),
        _ => None,
    };
    let catch = ctx.table.catch_line(exception.as_deref());
    Some(Converted::line(ctx.emit(catch)).opening(BlockKind::Catch, None))
}

fn match_finally(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    if line.code != "finally" {
        return None;
    }
    Some(Converted::line(ctx.emit(ctx.table.finally_line())).opening(BlockKind::Finally, None))
}

fn match_return(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let code = line.code.as_str();
    if code == "return" {
        return Some(Converted::line(ctx.emit(ctx.table.return_line(None))));
    }
    let value = ctx.expr(code.strip_prefix("return ")?);
    Some(Converted::line(ctx.emit(ctx.table.return_line(Some(&value)))))
}

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

/// `System.out.println(...)` / `System.out.print(...)`
fn match_print(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let code = line.code.as_str();
    let args = call_args(code, "System.out.println").or_else(|| call_args(code, "System.out.print"))?;
    let args: Vec<String> = split_by_comma_balanced(args).iter().map(|a| ctx.expr(a)).collect();
    Some(Converted::line(ctx.emit(ctx.table.output(&args))))
}

/// `int n = sc.nextInt()`, `name = in.nextLine()`, `Integer.parseInt(sc.nextLine())`
fn match_input(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let code = line.code.as_str();
    let eq = find_assignment_eq(code)?;
    let head = code[..eq].trim();
    let target = match parse_declaration(code) {
        Some(decl) if decl.vars.len() == 1 => decl.vars[0].0.clone(),
        _ if is_target(head) => head.to_string(),
        _ => return None,
    };
    let mut value = code[eq + 1..].trim();
    for wrapper in ["Integer.parseInt", "Double.parseDouble"] {
        if let Some(inner) = call_args(value, wrapper) {
            value = inner;
        }
    }
    let (callee, args) = split_call(value)?;
    let (receiver, method) = callee.rsplit_once('.')?;
    if !method.starts_with("next") || !args.is_empty() || !is_identifier(receiver) {
        return None;
    }
    let lines = ctx
        .table
        .input(Some(&target), None)
        .into_iter()
        .map(|l| ctx.emit(l))
        .collect();
    Some(Converted::lines(lines))
}

/// `i++`, `++i`, `i--`, `--i`
fn match_increment(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let code = line.code.as_str();
    let (target, op) = if let Some(t) = code.strip_suffix("++").or_else(|| code.strip_prefix("++")) {
        (t.trim(), AugAssignOp::Add)
    } else if let Some(t) = code.strip_suffix("--").or_else(|| code.strip_prefix("--")) {
        (t.trim(), AugAssignOp::Sub)
    } else {
        return None;
    };
    if !is_target(target) {
        return None;
    }
    Some(Converted::line(ctx.emit(ctx.table.compound(target, op, "1", false))))
}

fn match_compound(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let (target, op, value) = split_aug_assign(&line.code)?;
    if value.is_empty() {
        return None;
    }
    let concat = has_string_literal(value) || ctx.scan.variable_type(target) == Some(&PseudoType::String);
    let body = ctx.table.compound(target, op, &ctx.expr(value), concat);
    Some(Converted::line(ctx.emit(body)))
}

/// `static final int MAX = 10`
fn match_constant(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let decl = parse_declaration(&line.code)?;
    if !decl.is_final {
        return None;
    }
    let mut lines = Vec::new();
    for (name, init) in &decl.vars {
        let value = array_literal(&ctx.expr(init.as_deref()?));
        let body = ctx
            .table
            .constant_line(name, &value)
            .unwrap_or_else(|| ctx.table.assign(name, &value));
        lines.push(ctx.emit(body));
    }
    Some(Converted::lines(lines))
}

/// `{1, 2, 3}` → `[1, 2, 3]`
fn array_literal(value: &str) -> String {
    match value.strip_prefix('{').and_then(|v| v.strip_suffix('}')) {
        Some(items) => format!("[{}]", items.trim()),
        None => value.to_string(),
    }
}

/// 型付き宣言。初期値のない宣言は、宣言をその場で出す設定のときだけ `DECLARE` になる
fn match_declaration(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let decl = parse_declaration(&line.code)?;
    let ty = PseudoType::from_java_type(&decl.ty);
    let mut lines = Vec::new();
    for (name, init) in &decl.vars {
        match init {
            Some(init) if init.starts_with("new ") && init.ends_with(']') && ctx.table.declares_upfront => {
                if ctx.inline_declarations {
                    let declared = ctx.scan.variable_type(name).cloned().or_else(|| ty.clone());
                    if let Some(declared) = declared {
                        lines.push(ctx.emit(ctx.table.declare(name, &declared)));
                    }
                }
            }
            Some(init) => {
                if ctx.inline_declarations {
                    if let Some(ty) = &ty {
                        lines.push(ctx.emit(ctx.table.declare(name, ty)));
                    }
                }
                let value = array_literal(&ctx.expr(init));
                lines.push(ctx.emit(ctx.table.assign(name, &value)));
            }
            None => {
                if let (true, Some(ty)) = (ctx.inline_declarations, &ty) {
                    lines.push(ctx.emit(ctx.table.declare(name, ty)));
                }
            }
        }
    }
    Some(Converted::lines(lines))
}

fn match_assign(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let code = line.code.as_str();
    let eq = find_assignment_eq(code)?;
    let target = code[..eq].trim();
    let value = code[eq + 1..].trim();
    if !is_target(target) || value.is_empty() {
        return None;
    }
    let value = array_literal(&ctx.expr(value));
    Some(Converted::line(ctx.emit(ctx.table.assign(target, &value))))
}

/// 既知のメソッドの呼び出し文
fn match_call(line: &LogicalLine, ctx: &MatchContext<'_>) -> Option<Converted> {
    let (callee, args) = split_call(&line.code)?;
    if !ctx.scan.is_subroutine(callee) {
        return None;
    }
    let args: Vec<String> = split_by_comma_balanced(args).iter().map(|a| ctx.expr(a)).collect();
    let body = ctx.table.call(&ctx.table.subroutine_name(callee), &args.join(", "));
    Some(Converted::line(ctx.emit(body)))
}
