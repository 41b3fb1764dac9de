//! pseudoc - Python / Java to exam-board pseudocode transpiler
//!
//! # Overview
//! Line-oriented structural transpiler producing IB or Cambridge IGCSE pseudocode.
//! No syntax tree is built: each logical line is matched against an ordered list of
//! constructs while a block tracker emits the closing keywords.

pub mod config;
pub mod diagnostics;
pub mod dialect;
pub mod emitter;
pub mod error;
pub mod ir;
pub mod lexer;
pub mod parser;
pub mod semantic;
pub mod unsupported_features;

pub use config::{Config, Options, UnmatchedPolicy};
pub use dialect::{Dialect, IndentStyle};
pub use emitter::Conversion;
pub use error::{PseudocError, Result};
pub use parser::SourceLanguage;

use std::path::Path;

/// Convert source text with the default options for the target
pub fn convert(source: &str, language: SourceLanguage, dialect: Dialect) -> String {
    convert_with_options(source, language, dialect, &Options::default()).text
}

pub fn convert_with_options(
    source: &str,
    language: SourceLanguage,
    dialect: Dialect,
    options: &Options,
) -> Conversion {
    emitter::transpile(source, language, dialect, options, None)
}

/// Convert and return the text together with the diagnostics for unmatched lines
pub fn convert_with_diagnostics(
    source: &str,
    language: SourceLanguage,
    dialect: Dialect,
    file: Option<&Path>,
) -> (String, diagnostics::Diagnostics) {
    let conversion = emitter::transpile(source, language, dialect, &Options::default(), file);
    (conversion.text, conversion.diagnostics)
}

pub fn python_to_ib(source: &str) -> String {
    convert(source, SourceLanguage::Python, Dialect::Ib)
}

pub fn python_to_igcse(source: &str) -> String {
    convert(source, SourceLanguage::Python, Dialect::Igcse)
}

pub fn java_to_ib(source: &str) -> String {
    convert(source, SourceLanguage::Java, Dialect::Ib)
}

pub fn java_to_igcse(source: &str) -> String {
    convert(source, SourceLanguage::Java, Dialect::Igcse)
}

/// Convert a file; the language comes from its extension
pub fn convert_file(input: &Path, output: &Path, dialect: Dialect) -> Result<Conversion> {
    let language = SourceLanguage::from_path(input)
        .ok_or_else(|| PseudocError::UnknownLanguage(input.display().to_string()))?;
    let source = std::fs::read_to_string(input)?;
    let conversion = emitter::transpile(&source, language, dialect, &Options::default(), Some(input));
    std::fs::write(output, &conversion.text)?;
    Ok(conversion)
}
