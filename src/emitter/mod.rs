//! Emitter module - Line Driver
//!
//! 論理行を 1 行ずつ読み、Block Tracker でブロックを閉じてから
//! Construct Matcher を優先順に試す。最初に受理したマッチャーの結果を出力する。

mod tracker;

pub use tracker::BlockTracker;

use crate::config::{Options, UnmatchedPolicy};
use crate::diagnostics::{unmatched_line, Diagnostics};
use crate::dialect::{Dialect, IndentStyle, KeywordTable};
use crate::ir::{BlockKind, PseudoOp};
use crate::parser::{split_logical_lines, Continuation, LineKind, LogicalLine, MatchContext, SourceLanguage};
use crate::semantic::rewrite::{rewrite_expr, RewriteEnv};
use crate::semantic::PreScan;
use crate::unsupported_features::UnsupportedFeature;
use std::path::Path;
use tracing::{debug, trace, warn};

/// インデントを検出できなかったときの 1 段の幅
const DEFAULT_UNIT: usize = 4;

/// 1 回の変換の結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversion {
    pub text: String,
    pub diagnostics: Diagnostics,
    /// 開いたフレームの数
    pub opened: usize,
    /// 連鎖で引き継いだフレームの数
    pub continued: usize,
    /// 閉じ行を出したフレームの数
    pub closed: usize,
}

/// ソース全体を擬似コードに変換する。失敗はせず、変換できない行は診断に残る
pub fn transpile(
    source: &str,
    language: SourceLanguage,
    dialect: Dialect,
    options: &Options,
    file: Option<&Path>,
) -> Conversion {
    if source.trim().is_empty() {
        return Conversion::default();
    }

    let lines = split_logical_lines(source, language);
    let scan = PreScan::run(&lines, language);
    let table = dialect.table();
    let style = options.indent_style(table);
    let unit = match style {
        IndentStyle::Width(n) => " ".repeat(n),
        IndentStyle::Preserve => detect_unit(&lines),
    };

    let mut out = Vec::new();
    if table.declares_upfront && options.declarations && !scan.declarations().is_empty() {
        for decl in scan.declarations() {
            out.push(table.declare(&decl.name, &decl.ty));
        }
        out.push(String::new());
    }

    let mut driver = LineDriver {
        language,
        table,
        scan: &scan,
        options,
        style,
        unit,
        policy: options.unmatched_policy(language, dialect),
        inline_declarations: table.declares_upfront && !options.declarations,
        file,
        tracker: BlockTracker::new(table),
        diagnostics: Diagnostics::new(),
        blanks: 0,
    };
    for index in 0..lines.len() {
        driver.step(&lines, index, &mut out);
    }
    driver.tracker.flush_all(&mut out);
    driver.flush_blanks(&mut out);

    debug!(
        lines = lines.len(),
        opened = driver.tracker.opened,
        closed = driver.tracker.closed,
        unmatched = driver.diagnostics.len(),
        "conversion finished"
    );
    Conversion {
        text: out.join("\n"),
        opened: driver.tracker.opened,
        continued: driver.tracker.continued,
        closed: driver.tracker.closed,
        diagnostics: driver.diagnostics,
    }
}

/// 最初にインデントされたコード行の先頭空白を 1 段とみなす
fn detect_unit(lines: &[LogicalLine]) -> String {
    lines
        .iter()
        .find(|l| l.kind == LineKind::Code && l.depth > 0 && !l.indent.is_empty())
        .map(|l| l.indent.clone())
        .unwrap_or_else(|| " ".repeat(DEFAULT_UNIT))
}

fn next_code(lines: &[LogicalLine], index: usize) -> Option<&LogicalLine> {
    lines[index + 1..].iter().find(|l| l.kind == LineKind::Code)
}

/// 行末コメントは最初の出力行に付ける
fn attach_comment(lines: &mut Vec<String>, comment: Option<&str>, indent: &str, table: &KeywordTable) {
    let Some(text) = comment else {
        return;
    };
    match lines.first_mut() {
        Some(first) => first.push_str(&format!(" {} {text}", table.comment)),
        None => lines.push(format!("{indent}{} {text}", table.comment)),
    }
}

struct LineDriver<'a> {
    language: SourceLanguage,
    table: &'static KeywordTable,
    scan: &'a PreScan,
    options: &'a Options,
    style: IndentStyle,
    unit: String,
    policy: UnmatchedPolicy,
    inline_declarations: bool,
    file: Option<&'a Path>,
    tracker: BlockTracker<'static>,
    diagnostics: Diagnostics,
    /// 保留中の空行。閉じ行の後に出す
    blanks: usize,
}

impl<'a> LineDriver<'a> {
    fn step(&mut self, lines: &[LogicalLine], index: usize, out: &mut Vec<String>) {
        let line = &lines[index];
        match line.kind {
            LineKind::Blank => self.blanks += 1,
            LineKind::Comment => self.comment(lines, index, out),
            LineKind::Brace => {
                // `}` の次が `else` / `catch` / `while (c);` なら、その行に任せる
                if line.closes_brace && !self.continues_next(lines, index) {
                    self.tracker.close_until(line.depth, out);
                }
            }
            LineKind::Code => self.code(line, out),
        }
    }

    fn flush_blanks(&mut self, out: &mut Vec<String>) {
        out.extend(std::iter::repeat(String::new()).take(self.blanks));
        self.blanks = 0;
    }

    fn continues_next(&self, lines: &[LogicalLine], index: usize) -> bool {
        next_code(lines, index).map_or(false, |next| self.language.continuation(next).is_some())
    }

    fn comment(&mut self, lines: &[LogicalLine], index: usize, out: &mut Vec<String>) {
        let line = &lines[index];
        if !self.continues_next(lines, index) {
            let next_depth = next_code(lines, index).map_or(0, |next| next.depth);
            self.tracker.close_until(line.depth.max(next_depth), out);
        }
        self.flush_blanks(out);
        if let Some(body) = &line.comment {
            let indent = self.indent_for(line);
            out.push(format!("{indent}{} {body}", self.table.comment));
        }
    }

    /// 出力インデント。固定幅では外側のフレームのインデント + 1 段、
    /// CASE の中の本体 (ラベル以外) はさらに 1 段
    fn indent_for(&self, line: &LogicalLine) -> String {
        match self.style {
            IndentStyle::Preserve => line.indent.clone(),
            IndentStyle::Width(_) => match self.tracker.frames().last() {
                None => String::new(),
                Some(top) => {
                    let mut indent = format!("{}{}", top.indent, self.unit);
                    if top.kind == BlockKind::Case && !is_case_label(line, self.language) {
                        indent.push_str(&self.unit);
                    }
                    indent
                }
            },
        }
    }

    fn code(&mut self, line: &LogicalLine, out: &mut Vec<String>) {
        match self.language.continuation(line) {
            Some(Continuation::Until(cond)) => {
                let env = RewriteEnv {
                    language: self.language,
                    table: self.table,
                    scan: self.scan,
                };
                let until = format!("{} ({})", self.table.op(PseudoOp::Not), rewrite_expr(&cond, &env));
                let closed = self.tracker.close_repeat(line.depth, until, out);
                self.flush_blanks(out);
                if closed {
                    // the UNTIL line is the last one pushed
                    if let (Some(text), Some(last)) = (&line.comment, out.last_mut()) {
                        last.push_str(&format!(" {} {text}", self.table.comment));
                    }
                    trace!(line = line.line_number(), construct = "do-while", "matched");
                    return;
                }
            }
            Some(Continuation::Chain(kinds)) => {
                self.tracker.chain(line.depth, kinds, out);
            }
            None => self.tracker.close_until(line.depth, out),
        }
        self.tracker.settle(line.depth);
        self.flush_blanks(out);

        let indent = self.indent_for(line);
        let feature = self.options.features.detect(&line.code, self.language);
        let matched = if feature.is_some() {
            None
        } else {
            let ctx = MatchContext {
                language: self.language,
                table: self.table,
                scan: self.scan,
                frames: self.tracker.frames(),
                indent: indent.clone(),
                unit: self.unit.clone(),
                inline_declarations: self.inline_declarations,
            };
            self.language
                .matchers()
                .iter()
                .find_map(|m| (m.apply)(line, &ctx).map(|converted| (m.construct, converted)))
        };

        match matched {
            Some((construct, converted)) => {
                trace!(line = line.line_number(), construct, "matched");
                let mut emitted = converted.lines;
                attach_comment(&mut emitted, line.comment.as_deref(), &indent, self.table);
                out.extend(emitted);
                if let Some(block) = converted.opens {
                    self.tracker.open(block, line.depth, indent);
                }
            }
            None => self.unmatched(line, &indent, feature, out),
        }
    }

    fn unmatched(
        &mut self,
        line: &LogicalLine,
        indent: &str,
        feature: Option<UnsupportedFeature>,
        out: &mut Vec<String>,
    ) {
        let text = line.statement_text();
        warn!(
            line = line.line_number(),
            feature = ?feature,
            "no construct matched: {text}"
        );
        let mut emitted = vec![self.policy.render(indent, &text, self.table)];
        attach_comment(&mut emitted, line.comment.as_deref(), indent, self.table);
        out.extend(emitted);
        self.diagnostics
            .add(unmatched_line(self.file, line.location, &text, feature));
    }
}

/// CASE の本体に置かれるラベル行 (`case 1:`, `default:`)
fn is_case_label(line: &LogicalLine, language: SourceLanguage) -> bool {
    let code = line.code.as_str();
    match language {
        SourceLanguage::Python => code.starts_with("case ") && code.ends_with(':'),
        SourceLanguage::Java => code.starts_with("case ") || code.starts_with("default:") || code == "default",
    }
}

#[cfg(test)]
mod tests;
