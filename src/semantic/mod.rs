//! Semantic module - pre-scan over logical lines
//!
//! 行ごとの変換を始める前に全行を 1 度走査し、次の情報を集める。
//! - 変数の宣言集合 (事前宣言を要する方言のヘッダ用)
//! - サブルーチン表 (FUNCTION / PROCEDURE の判定、引数と戻り値の型)

pub mod bounds;
pub mod operators;
pub mod rewrite;
mod type_infer;
mod types;

pub use bounds::*;
pub use type_infer::*;
pub use types::*;

use crate::lexer::{tokenize, LexKind};
use crate::parser::utils::{
    find_assignment_eq, find_char_balanced, find_keyword_balanced, find_matching_close, is_constant_name,
    is_identifier, split_by_comma_balanced,
};
use crate::parser::{java, python, LineKind, LogicalLine, SourceLanguage};
use std::collections::HashMap;
use tracing::debug;

/// 事前宣言する変数
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub ty: PseudoType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Option<PseudoType>,
}

/// ユーザー定義のサブルーチン
#[derive(Debug, Clone, PartialEq)]
pub struct Subroutine {
    pub name: String,
    pub params: Vec<Param>,
    /// 値を返すか (FUNCTION / PROCEDURE の判定)
    pub returns_value: bool,
    pub returns: Option<PseudoType>,
}

/// 事前走査の結果。1 回の変換呼び出しの間だけ生きる
#[derive(Debug, Clone, Default)]
pub struct PreScan {
    declarations: Vec<Declaration>,
    index: HashMap<String, usize>,
    subroutines: HashMap<String, Subroutine>,
}

impl TypeLookup for PreScan {
    fn type_of(&self, name: &str) -> Option<PseudoType> {
        if let Some(ty) = self.variable_type(name) {
            return Some(ty.clone());
        }
        self.subroutines.get(name).and_then(|s| s.returns.clone())
    }
}

impl PreScan {
    pub fn run(lines: &[LogicalLine], language: SourceLanguage) -> Self {
        let mut scan = PreScan::default();
        let code = lines.iter().filter(|l| l.kind == LineKind::Code);
        match language {
            SourceLanguage::Python => scan.scan_python(code),
            SourceLanguage::Java => scan.scan_java(code),
        }
        debug!(
            declarations = scan.declarations.len(),
            subroutines = scan.subroutines.len(),
            "pre-scan finished"
        );
        scan
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn variable_type(&self, name: &str) -> Option<&PseudoType> {
        self.index.get(name).map(|&i| &self.declarations[i].ty)
    }

    pub fn subroutine(&self, name: &str) -> Option<&Subroutine> {
        self.subroutines.get(name)
    }

    pub fn is_subroutine(&self, name: &str) -> bool {
        self.subroutines.contains_key(name)
    }

    /// 最初の宣言が優先される
    fn declare(&mut self, name: &str, ty: PseudoType) {
        if self.index.contains_key(name) {
            return;
        }
        self.index.insert(name.to_string(), self.declarations.len());
        self.declarations.push(Declaration {
            name: name.to_string(),
            ty,
        });
    }

    fn scan_python<'a>(&mut self, lines: impl Iterator<Item = &'a LogicalLine>) {
        // (def name, header depth)
        let mut defs: Vec<(String, usize)> = Vec::new();
        let mut calls: Vec<(String, String)> = Vec::new();

        for line in lines {
            while defs.last().map_or(false, |(_, d)| line.depth <= *d) {
                defs.pop();
            }
            let code = line.code.as_str();

            if let Some(def) = python::parse_def(code) {
                let params = def
                    .params
                    .iter()
                    .filter(|p| p.name != "self" && p.name != "cls")
                    .map(|p| Param {
                        name: p.name.clone(),
                        ty: p
                            .hint
                            .as_deref()
                            .and_then(PseudoType::from_python_hint)
                            .or_else(|| p.default.as_deref().and_then(|d| infer_type(d, SourceLanguage::Python, self))),
                    })
                    .collect();
                let returns = def.returns.as_deref().and_then(PseudoType::from_python_hint);
                self.subroutines.insert(
                    def.name.clone(),
                    Subroutine {
                        name: def.name.clone(),
                        params,
                        returns_value: returns.is_some(),
                        returns,
                    },
                );
                defs.push((def.name, line.depth));
                continue;
            }

            collect_calls(code, &mut calls);

            if let Some(value) = code.strip_prefix("return ") {
                let inferred = infer_type(value, SourceLanguage::Python, self);
                if let Some((name, _)) = defs.last() {
                    if let Some(sub) = self.subroutines.get_mut(name) {
                        sub.returns_value = true;
                        if sub.returns.is_none() {
                            sub.returns = Some(inferred.unwrap_or(PseudoType::Integer));
                        }
                    }
                }
                continue;
            }

            if let Some(header) = code.strip_prefix("for ").and_then(|h| h.strip_suffix(':')) {
                if let Some(pos) = find_keyword_balanced(header, "in") {
                    let var = header[..pos].trim();
                    let iterable = header[pos + 2..].trim();
                    if is_identifier(var) {
                        if iterable.starts_with("range(") {
                            self.declare(var, PseudoType::Integer);
                        } else if let Some(PseudoType::Array { of, .. }) = self.variable_type(iterable) {
                            let of = (**of).clone();
                            self.declare(var, of);
                        }
                    }
                }
                continue;
            }

            let eq = match find_assignment_eq(code) {
                Some(eq) => eq,
                None => continue,
            };
            let (target, hint) = match find_char_balanced(&code[..eq], ':') {
                Some(colon) => (code[..colon].trim(), Some(code[colon + 1..eq].trim())),
                None => (code[..eq].trim(), None),
            };
            let value = code[eq + 1..].trim();
            // CONSTANT 行になるものは宣言しない
            if !is_identifier(target) || (is_constant_name(target) && python::is_literal(value)) {
                continue;
            }
            let is_param = defs.last().and_then(|(name, _)| self.subroutines.get(name)).map_or(false, |s| {
                s.params.iter().any(|p| p.name == target)
            });
            if is_param {
                continue;
            }
            let ty = hint
                .and_then(PseudoType::from_python_hint)
                .or_else(|| infer_type(value, SourceLanguage::Python, self));
            if let Some(ty) = ty {
                self.declare(target, ty);
            }
        }

        // call sites fill in parameter types that had no hint or default
        for (callee, args) in calls {
            let arg_types: Vec<Option<PseudoType>> = split_by_comma_balanced(&args)
                .iter()
                .map(|a| infer_type(a, SourceLanguage::Python, self))
                .collect();
            if let Some(sub) = self.subroutines.get_mut(&callee) {
                for (param, ty) in sub.params.iter_mut().zip(arg_types) {
                    if param.ty.is_none() {
                        param.ty = ty;
                    }
                }
            }
        }
        for sub in self.subroutines.values_mut() {
            for param in &mut sub.params {
                if param.ty.is_none() {
                    param.ty = Some(PseudoType::Integer);
                }
            }
        }
    }

    fn scan_java<'a>(&mut self, lines: impl Iterator<Item = &'a LogicalLine>) {
        for line in lines {
            let code = line.code.as_str();

            if !line.terminated {
                if let Some(method) = java::parse_method(code) {
                    let params = method
                        .params
                        .iter()
                        .map(|(ty, name)| Param {
                            name: name.clone(),
                            ty: PseudoType::from_java_type(ty),
                        })
                        .collect();
                    let returns = method.returns.as_deref().and_then(PseudoType::from_java_type);
                    self.subroutines.insert(
                        method.name.clone(),
                        Subroutine {
                            name: method.name,
                            params,
                            returns_value: method.returns.as_deref().map_or(false, |r| r != "void"),
                            returns,
                        },
                    );
                    continue;
                }
            }

            if let Some(header) = java::for_header(code) {
                // `for (i = 0; ...)` reuses an outer variable and declares nothing
                let decl = match &header {
                    java::ForHeader::Counted { init, .. } => java::parse_declaration(init),
                    java::ForHeader::Each { decl, .. } => java::parse_declaration(decl),
                };
                if let Some(decl) = decl {
                    if let Some(ty) = PseudoType::from_java_type(&decl.ty) {
                        for (name, _) in &decl.vars {
                            self.declare(name, ty.clone());
                        }
                    }
                }
                continue;
            }

            if let Some(decl) = java::parse_declaration(code) {
                if decl.is_final {
                    continue;
                }
                let base = match PseudoType::from_java_type(&decl.ty) {
                    Some(ty) => ty,
                    None => continue,
                };
                for (name, init) in &decl.vars {
                    let ty = match (&base, init) {
                        (PseudoType::Array { .. }, Some(init)) => {
                            infer_type(init, SourceLanguage::Java, self).unwrap_or_else(|| base.clone())
                        }
                        _ => base.clone(),
                    };
                    self.declare(name, ty);
                }
            }
        }
    }
}

/// `name(args)` の呼び出しを集める (引数の型推論用)
fn collect_calls(code: &str, calls: &mut Vec<(String, String)>) {
    let tokens = tokenize(code);
    for (i, tok) in tokens.iter().enumerate() {
        if tok.kind != LexKind::Word {
            continue;
        }
        let after_dot = i > 0 && tokens[i - 1].is_symbol(".");
        let open = match tokens.get(i + 1) {
            Some(next) if next.is_symbol("(") && !after_dot => next.start,
            _ => continue,
        };
        if let Some(close) = find_matching_close(code, open) {
            calls.push((tok.text.to_string(), code[open + 1..close].to_string()));
        }
    }
}

#[cfg(test)]
mod tests;
