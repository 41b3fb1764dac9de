//! Error types for the pseudoc transpiler
//!
//! 変換コア自体は失敗しない (どんな入力にも文字列を返す)。
//! ここで定義するエラーは I/O と設定読み込みの境界でのみ発生する。

use thiserror::Error;

/// Main error type for pseudoc
#[derive(Debug, Error)]
pub enum PseudocError {
    #[error("Config error in {path}: {message}")]
    Config { path: String, message: String },

    #[error("Unknown source language '{0}' (expected python or java)")]
    UnknownLanguage(String),

    #[error("Unknown dialect '{0}' (expected ib or igcse)")]
    UnknownDialect(String),

    #[error("Unknown feature name '{0}'")]
    UnknownFeature(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PseudocError>;
