//! Configuration - per-conversion options and the `pseudoc.toml` file

use crate::dialect::{Dialect, IndentStyle, KeywordTable};
use crate::error::{PseudocError, Result};
use crate::parser::SourceLanguage;
use crate::unsupported_features::{UnsupportedFeature, UnsupportedFeatureRegistry};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 変換できなかった行の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedPolicy {
    /// 現在のインデントを付けてそのまま出す
    Passthrough,
    /// `// TODO: <text>`
    Todo,
    /// `// Unsupported: <text>`
    Unsupported,
}

impl UnmatchedPolicy {
    /// Java は常に Unsupported、Python は IB なら素通し、IGCSE なら TODO
    pub fn default_for(language: SourceLanguage, dialect: Dialect) -> Self {
        match (language, dialect) {
            (SourceLanguage::Java, _) => UnmatchedPolicy::Unsupported,
            (SourceLanguage::Python, Dialect::Ib) => UnmatchedPolicy::Passthrough,
            (SourceLanguage::Python, Dialect::Igcse) => UnmatchedPolicy::Todo,
        }
    }

    pub fn render(self, indent: &str, text: &str, table: &KeywordTable) -> String {
        match self {
            UnmatchedPolicy::Passthrough => format!("{indent}{text}"),
            UnmatchedPolicy::Todo => format!("{indent}{} TODO: {text}", table.comment),
            UnmatchedPolicy::Unsupported => format!("{indent}{} Unsupported: {text}", table.comment),
        }
    }
}

/// 1 回の変換の設定
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// None なら方言の既定値
    pub indent: Option<IndentStyle>,
    /// 事前宣言する方言で `DECLARE` ヘッダを出すか。
    /// false のときは宣言をその場で出す
    pub declarations: bool,
    /// None なら (言語, 方言) の既定値
    pub unmatched: Option<UnmatchedPolicy>,
    pub features: UnsupportedFeatureRegistry,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            indent: None,
            declarations: true,
            unmatched: None,
            features: UnsupportedFeatureRegistry::default(),
        }
    }
}

impl Options {
    /// すべての項目を (言語, 方言) の既定値で埋める
    pub fn for_target(language: SourceLanguage, dialect: Dialect) -> Self {
        Self {
            indent: Some(dialect.table().default_indent),
            declarations: true,
            unmatched: Some(UnmatchedPolicy::default_for(language, dialect)),
            features: UnsupportedFeatureRegistry::default(),
        }
    }

    pub fn indent_style(&self, table: &KeywordTable) -> IndentStyle {
        self.indent.unwrap_or(table.default_indent)
    }

    pub fn unmatched_policy(&self, language: SourceLanguage, dialect: Dialect) -> UnmatchedPolicy {
        self.unmatched
            .unwrap_or_else(|| UnmatchedPolicy::default_for(language, dialect))
    }
}

/// `pseudoc.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// 未指定ならファイルの拡張子から決める
    #[serde(default)]
    pub language: Option<SourceLanguage>,

    #[serde(default = "default_dialect")]
    pub dialect: Dialect,

    /// 0 はソースのインデントをそのまま使う
    #[serde(default)]
    pub indent_width: Option<usize>,

    #[serde(default = "default_true")]
    pub declarations: bool,

    #[serde(default)]
    pub unmatched: Option<UnmatchedPolicy>,

    /// 報告しない未対応構文の名前 (`lambda`, `ternary`, ...)
    #[serde(default)]
    pub allow: Vec<String>,
}

fn default_dialect() -> Dialect {
    Dialect::Ib
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: None,
            dialect: default_dialect(),
            indent_width: None,
            declarations: default_true(),
            unmatched: None,
            allow: Vec::new(),
        }
    }
}

impl Config {
    pub const FILE_NAME: &'static str = "pseudoc.toml";

    pub fn from_toml_str(text: &str, path: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| PseudocError::Config {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text, &path.display().to_string())
    }

    /// カレントディレクトリに `pseudoc.toml` があれば読む
    pub fn load_default() -> Result<Option<Self>> {
        let path = Path::new(Self::FILE_NAME);
        if path.exists() {
            Self::load(path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// この設定で `language` を変換するときの Options
    pub fn options(&self, language: SourceLanguage) -> Result<Options> {
        let mut options = Options::for_target(language, self.dialect);
        if let Some(width) = self.indent_width {
            options.indent = Some(if width == 0 {
                IndentStyle::Preserve
            } else {
                IndentStyle::Width(width)
            });
        }
        options.declarations = self.declarations;
        if let Some(policy) = self.unmatched {
            options.unmatched = Some(policy);
        }
        for name in &self.allow {
            let feature =
                UnsupportedFeature::from_name(name).ok_or_else(|| PseudocError::UnknownFeature(name.clone()))?;
            options.features.disable(feature);
        }
        Ok(options)
    }
}
