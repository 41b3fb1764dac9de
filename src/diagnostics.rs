//! Diagnostics - conversion-time findings, collected and rendered as JSON or text
//!
//! 変換そのものは失敗しない。変換できなかった行はここに記録される。

use crate::ir::SourceLocation;
use crate::unsupported_features::UnsupportedFeature;
use serde::Serialize;
use std::path::Path;

pub const UNMATCHED_LINE: &str = "PSC-UNMATCHED-LINE";
pub const UNSUPPORTED_FEATURE: &str = "PSC-UNSUPPORTED-FEATURE";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticSpan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub code: String,
    pub message: String,
    pub severity: DiagnosticSeverity,
    pub span: DiagnosticSpan,
    pub phase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Diagnostics {
    pub diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Error)
    }

    pub fn add(&mut self, diag: Diagnostic) {
        self.diagnostics.push(diag);
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for diag in &self.diagnostics {
            let file = diag.span.file.as_deref().unwrap_or("<input>");
            out.push_str(&format!(
                "[{}] {}:{}:{} {}\n",
                diag.code, file, diag.span.line, diag.span.column, diag.message
            ));
        }
        out
    }
}

pub fn span_for_line(file: Option<&Path>, line: usize, column: usize, len: usize) -> DiagnosticSpan {
    let end_col = if len == 0 {
        column
    } else {
        column + len.saturating_sub(1)
    };
    DiagnosticSpan {
        file: file.map(|p| p.display().to_string()),
        line,
        column,
        end_line: line,
        end_column: end_col,
    }
}

fn diag(
    code: &str,
    severity: DiagnosticSeverity,
    message: String,
    span: DiagnosticSpan,
    meta: serde_json::Value,
) -> Diagnostic {
    Diagnostic {
        code: code.to_string(),
        message,
        severity,
        span,
        phase: "convert".to_string(),
        meta: Some(meta),
    }
}

/// 変換できなかった 1 行分の診断。既知の未対応構文はエラー、それ以外は警告
pub fn unmatched_line(
    file: Option<&Path>,
    location: SourceLocation,
    text: &str,
    feature: Option<UnsupportedFeature>,
) -> Diagnostic {
    let span = span_for_line(file, location.line, location.column, text.chars().count());
    match feature {
        Some(feature) => diag(
            UNSUPPORTED_FEATURE,
            DiagnosticSeverity::Error,
            feature.message(),
            span,
            serde_json::json!({ "feature": feature.name(), "text": text }),
        ),
        None => diag(
            UNMATCHED_LINE,
            DiagnosticSeverity::Warning,
            "no pseudocode construct matches this line".to_string(),
            span,
            serde_json::json!({ "text": text }),
        ),
    }
}
