//! 方言ごとの行の整形
//!
//! マッチャーは書き換え済みの式を渡し、キーワードと区切りはここで付ける。

use super::{Closer, CollectionStyle, KeywordTable, RangeStyle};
use crate::ir::{AugAssignOp, BlockKind, Frame, PseudoOp};
use crate::parser::utils::capitalize;
use crate::semantic::{PseudoType, RangeBounds};

/// `FUNCTION` / `PROCEDURE` ヘッダの材料
#[derive(Debug, Clone, PartialEq)]
pub struct SubroutineHeader {
    /// `BlockKind::Function` か `BlockKind::Procedure`
    pub kind: BlockKind,
    pub name: String,
    pub params: Vec<(String, Option<PseudoType>)>,
    pub returns: Option<PseudoType>,
    /// クラス内のメソッド
    pub member: bool,
    /// コンストラクタ (`__init__`, クラス名と同名のメソッド)
    pub constructor: bool,
}

impl KeywordTable {
    /// フレームを閉じる行。テーブルに無い種類は `END`
    pub fn closer(&self, frame: &Frame) -> String {
        let closer = self
            .closers
            .iter()
            .find(|(kind, _)| *kind == frame.kind)
            .map(|(_, closer)| *closer);
        match closer {
            Some(Closer::Keyword(kw)) => kw.to_string(),
            Some(Closer::Next(kw)) => match &frame.ident {
                Some(var) => format!("{kw} {var}"),
                None => kw.to_string(),
            },
            Some(Closer::Until(kw)) => {
                let cond = frame.ident.as_deref().unwrap_or_else(|| self.op(PseudoOp::False));
                format!("{kw} {cond}")
            }
            None => "END".to_string(),
        }
    }

    pub fn assign(&self, target: &str, value: &str) -> String {
        format!("{target} {} {value}", self.op(PseudoOp::Assign))
    }

    /// `x += 5` → `x ← x + 5`. `concat` は右辺が文字列のとき
    pub fn compound(&self, target: &str, op: AugAssignOp, value: &str, concat: bool) -> String {
        let symbol = match op.pseudo_op() {
            Some(pseudo) => self.op(pseudo),
            None if concat && op == AugAssignOp::Add => self.op(PseudoOp::Concat),
            None => op.plain_symbol().unwrap_or("+"),
        };
        self.assign(target, &format!("{target} {symbol} {value}"))
    }

    pub fn if_header(&self, cond: &str) -> String {
        format!("{} {cond} {}", self.if_kw, self.then_kw)
    }

    pub fn else_if_header(&self, cond: &str) -> String {
        format!("{} {cond} {}", self.else_if_kw, self.then_kw)
    }

    pub fn else_line(&self) -> String {
        self.else_kw.to_string()
    }

    pub fn while_header(&self, cond: &str) -> String {
        match self.do_kw {
            Some(do_kw) => format!("{} {cond} {do_kw}", self.while_kw),
            None => format!("{} {cond}", self.while_kw),
        }
    }

    pub fn repeat_line(&self) -> String {
        self.repeat_kw.to_string()
    }

    /// 上限込みの数え上げループ
    pub fn range_loop(&self, var: &str, bounds: &RangeBounds) -> String {
        match self.range_style {
            RangeStyle::LoopFromTo => format!("loop {var} from {} to {}", bounds.start, bounds.end),
            RangeStyle::ForTo => {
                let head = format!(
                    "FOR {var} {} {} TO {}",
                    self.op(PseudoOp::Assign),
                    bounds.start,
                    bounds.end
                );
                match (&bounds.step, self.renders_step) {
                    (Some(step), true) => format!("{head} STEP {step}"),
                    _ => head,
                }
            }
        }
    }

    /// コレクションの反復。行はヘッダ位置からの相対インデント付き。
    /// カーソル展開はどんな反復対象 (文字列・リテラル・呼び出し) にも使う
    pub fn collection_loop(&self, var: &str, collection: &str, unit: &str) -> Vec<String> {
        match self.collection_style {
            CollectionStyle::ForEach => vec![format!("FOR EACH {var} IN {collection}")],
            CollectionStyle::CursorExpansion => vec![
                format!("{collection}.resetNext()"),
                format!("loop while {collection}.hasNext()"),
                format!("{unit}{}", self.assign(var, &format!("{collection}.getNext()"))),
            ],
        }
    }

    pub fn output(&self, args: &[String]) -> String {
        if args.is_empty() {
            return format!("{} \"\"", self.output);
        }
        format!("{} {}", self.output, args.join(self.output_separator))
    }

    /// `INPUT x`。プロンプトを先に出す方言では `OUTPUT prompt` が前に付く
    pub fn input(&self, target: Option<&str>, prompt: Option<&str>) -> Vec<String> {
        let mut lines = Vec::new();
        if let (true, Some(prompt)) = (self.prompt_before_input, prompt) {
            lines.push(self.output(&[prompt.to_string()]));
        }
        match target {
            Some(target) => lines.push(format!("{} {target}", self.input)),
            None => lines.push(self.input.to_string()),
        }
        lines
    }

    pub fn subroutine_name(&self, name: &str) -> String {
        if self.capitalize_subroutines {
            capitalize(name)
        } else {
            name.to_string()
        }
    }

    pub fn subroutine_header(&self, header: &SubroutineHeader) -> String {
        let keyword = if header.kind == BlockKind::Function {
            self.function_kw
        } else {
            self.procedure_kw
        };
        let name = match (header.constructor, self.constructor_name) {
            (true, Some(ctor)) => ctor.to_string(),
            _ => self.subroutine_name(&header.name),
        };
        let params: Vec<String> = header
            .params
            .iter()
            .map(|(param, ty)| match (self.typed_signatures, ty) {
                (true, Some(ty)) => format!("{param} : {ty}"),
                _ => param.clone(),
            })
            .collect();

        let mut line = String::new();
        if let (true, Some(prefix)) = (header.member, self.member_prefix) {
            line.push_str(prefix);
            line.push(' ');
        }
        line.push_str(&format!("{keyword} {name}({})", params.join(", ")));
        if let (BlockKind::Function, Some(returns_kw), Some(ty)) = (header.kind, self.returns_kw, &header.returns) {
            line.push_str(&format!(" {returns_kw} {ty}"));
        }
        line
    }

    pub fn class_header(&self, name: &str, parent: Option<&str>) -> String {
        match parent {
            Some(parent) => format!("{} {name} {} {parent}", self.class_kw, self.extends_kw),
            None => format!("{} {name}", self.class_kw),
        }
    }

    pub fn case_of(&self, subject: &str) -> String {
        format!("{} {subject}", self.case_of)
    }

    pub fn case_clause(&self, value: &str) -> String {
        format!("{value} :")
    }

    pub fn otherwise_line(&self) -> String {
        self.otherwise.to_string()
    }

    pub fn try_line(&self) -> String {
        self.try_kw.to_string()
    }

    pub fn catch_line(&self, exception: Option<&str>) -> String {
        match exception {
            Some(exception) => format!("{} {exception}", self.catch_kw),
            None => self.catch_kw.to_string(),
        }
    }

    pub fn finally_line(&self) -> String {
        self.finally_kw.to_string()
    }

    pub fn return_line(&self, value: Option<&str>) -> String {
        match value {
            Some(value) => format!("{} {value}", self.return_kw),
            None => self.return_kw.to_string(),
        }
    }

    /// ループを抜ける行。対応が無いフレームなら None
    pub fn exit_loop(&self, kind: BlockKind) -> Option<&'static str> {
        self.exits.iter().find(|(k, _)| *k == kind).map(|(_, kw)| *kw)
    }

    /// `CONSTANT PI = 3.14`。定数を持たない方言では None
    pub fn constant_line(&self, name: &str, value: &str) -> Option<String> {
        self.constant.map(|(kw, eq)| format!("{kw} {name} {eq} {value}"))
    }

    pub fn declare(&self, name: &str, ty: &PseudoType) -> String {
        format!("{} {name} : {ty}", self.declare_kw)
    }

    /// 手続き呼び出しの文
    pub fn call(&self, callee: &str, args: &str) -> String {
        match self.call_kw {
            Some(kw) => format!("{kw} {callee}({args})"),
            None => format!("{callee}({args})"),
        }
    }
}
