//! Unsupported feature registry (centralized guard)
//!
//! 変換できなかった行に、既知の未対応構文が含まれていれば名前を付けて報告する。

use crate::lexer::{tokenize, LexKind};
use crate::parser::SourceLanguage;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnsupportedFeature {
    Lambda,
    Comprehension,
    WithStatement,
    Yield,
    Async,
    GlobalStatement,
    DelStatement,
    Decorator,
    WalrusOperator,
    ConditionalExpr,
    JavaLambda,
    JavaStream,
    Annotation,
    Interface,
    Enum,
    TryWithResources,
}

const PYTHON_FEATURES: &[UnsupportedFeature] = &[
    UnsupportedFeature::Decorator,
    UnsupportedFeature::Async,
    UnsupportedFeature::WithStatement,
    UnsupportedFeature::GlobalStatement,
    UnsupportedFeature::DelStatement,
    UnsupportedFeature::Yield,
    UnsupportedFeature::Lambda,
    UnsupportedFeature::Comprehension,
    UnsupportedFeature::WalrusOperator,
    UnsupportedFeature::ConditionalExpr,
];

const JAVA_FEATURES: &[UnsupportedFeature] = &[
    UnsupportedFeature::Annotation,
    UnsupportedFeature::Interface,
    UnsupportedFeature::Enum,
    UnsupportedFeature::TryWithResources,
    UnsupportedFeature::JavaStream,
    UnsupportedFeature::JavaLambda,
    UnsupportedFeature::ConditionalExpr,
];

impl UnsupportedFeature {
    pub fn name(&self) -> &'static str {
        match self {
            UnsupportedFeature::Lambda => "lambda",
            UnsupportedFeature::Comprehension => "comprehension",
            UnsupportedFeature::WithStatement => "with",
            UnsupportedFeature::Yield => "yield",
            UnsupportedFeature::Async => "async",
            UnsupportedFeature::GlobalStatement => "global",
            UnsupportedFeature::DelStatement => "del",
            UnsupportedFeature::Decorator => "decorator",
            UnsupportedFeature::WalrusOperator => "walrus",
            UnsupportedFeature::ConditionalExpr => "ternary",
            UnsupportedFeature::JavaLambda => "java-lambda",
            UnsupportedFeature::JavaStream => "stream",
            UnsupportedFeature::Annotation => "annotation",
            UnsupportedFeature::Interface => "interface",
            UnsupportedFeature::Enum => "enum",
            UnsupportedFeature::TryWithResources => "try-with-resources",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        PYTHON_FEATURES
            .iter()
            .chain(JAVA_FEATURES)
            .find(|f| f.name() == name.trim())
            .copied()
    }

    pub fn message(&self) -> String {
        format!("{} is not supported in pseudocode", self.name())
    }

    fn features_for(language: SourceLanguage) -> &'static [UnsupportedFeature] {
        match language {
            SourceLanguage::Python => PYTHON_FEATURES,
            SourceLanguage::Java => JAVA_FEATURES,
        }
    }

    /// 文字列リテラルを伏せたコードに対する判定
    fn appears_in(&self, code: &str, words: &[&str]) -> bool {
        let has_word = |w: &str| words.contains(&w);
        match self {
            UnsupportedFeature::Lambda => has_word("lambda"),
            UnsupportedFeature::Comprehension => has_word("for") && !code.starts_with("for"),
            UnsupportedFeature::WithStatement => code.starts_with("with "),
            UnsupportedFeature::Yield => has_word("yield"),
            UnsupportedFeature::Async => has_word("async") || has_word("await"),
            UnsupportedFeature::GlobalStatement => code.starts_with("global ") || code.starts_with("nonlocal "),
            UnsupportedFeature::DelStatement => code.starts_with("del "),
            UnsupportedFeature::Decorator | UnsupportedFeature::Annotation => code.starts_with('@'),
            UnsupportedFeature::WalrusOperator => code.contains(":="),
            UnsupportedFeature::ConditionalExpr => {
                if code.contains('?') {
                    return true;
                }
                let statement = ["if", "elif", "else"].iter().any(|k| words.first() == Some(k));
                !statement && has_word("if") && has_word("else")
            }
            UnsupportedFeature::JavaLambda => code.contains("->"),
            UnsupportedFeature::JavaStream => code.contains(".stream()"),
            UnsupportedFeature::Interface => has_word("interface"),
            UnsupportedFeature::Enum => has_word("enum"),
            UnsupportedFeature::TryWithResources => code.starts_with("try (") || code.starts_with("try("),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnsupportedFeatureRegistry {
    enabled: HashSet<UnsupportedFeature>,
}

impl UnsupportedFeatureRegistry {
    pub fn new(enabled: HashSet<UnsupportedFeature>) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self, feature: UnsupportedFeature) -> bool {
        self.enabled.contains(&feature)
    }

    pub fn enable(&mut self, feature: UnsupportedFeature) {
        self.enabled.insert(feature);
    }

    pub fn disable(&mut self, feature: UnsupportedFeature) {
        self.enabled.remove(&feature);
    }

    /// 行に含まれる、最初の既知の未対応構文
    pub fn detect(&self, code: &str, language: SourceLanguage) -> Option<UnsupportedFeature> {
        let masked = mask_string_literals(code);
        let masked = masked.trim();
        let tokens = tokenize(masked);
        let words: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == LexKind::Word)
            .map(|t| t.text)
            .collect();
        UnsupportedFeature::features_for(language)
            .iter()
            .copied()
            .filter(|f| self.is_enabled(*f))
            .find(|f| f.appears_in(masked, &words))
    }
}

impl Default for UnsupportedFeatureRegistry {
    fn default() -> Self {
        let enabled = PYTHON_FEATURES.iter().chain(JAVA_FEATURES).copied().collect();
        Self { enabled }
    }
}

/// 文字列リテラルを `""` に置き換える
fn mask_string_literals(code: &str) -> String {
    tokenize(code)
        .iter()
        .map(|t| if t.kind == LexKind::Str { "\"\"" } else { t.text })
        .collect()
}
