//! Type definitions
//!
//! 宣言ヘッダとシグネチャに出す擬似コードの型。

use std::fmt;

/// Pseudocode data types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoType {
    Integer,
    Real,
    String,
    Char,
    Boolean,
    /// `upper` は上限添字 (0 始まり)。不明なら `ARRAY OF T`
    Array {
        upper: Option<String>,
        of: Box<PseudoType>,
    },
}

impl PseudoType {
    pub fn array_of(of: PseudoType, upper: Option<String>) -> Self {
        PseudoType::Array {
            upper,
            of: Box::new(of),
        }
    }

    /// Convert a Python type hint (`int`, `list[str]`, ...)
    pub fn from_python_hint(hint: &str) -> Option<Self> {
        let hint = hint.trim();
        match hint {
            "int" => return Some(PseudoType::Integer),
            "float" => return Some(PseudoType::Real),
            "str" => return Some(PseudoType::String),
            "bool" => return Some(PseudoType::Boolean),
            _ => {}
        }
        for prefix in ["list", "List"] {
            if let Some(rest) = hint.strip_prefix(prefix) {
                let inner = rest
                    .strip_prefix('[')
                    .and_then(|r| r.strip_suffix(']'))
                    .and_then(Self::from_python_hint)
                    .unwrap_or(PseudoType::Integer);
                if rest.is_empty() || rest.starts_with('[') {
                    return Some(Self::array_of(inner, None));
                }
            }
        }
        None
    }

    /// Convert a Java type name (`int`, `String`, `double[]`, ...)
    pub fn from_java_type(ty: &str) -> Option<Self> {
        let ty = ty.trim();
        if let Some(elem) = ty.strip_suffix("[]") {
            return Self::from_java_type(elem).map(|of| Self::array_of(of, None));
        }
        match ty {
            "int" | "long" | "short" | "byte" | "Integer" | "Long" => Some(PseudoType::Integer),
            "double" | "float" | "Double" | "Float" => Some(PseudoType::Real),
            "String" => Some(PseudoType::String),
            "char" | "Character" => Some(PseudoType::Char),
            "boolean" | "Boolean" => Some(PseudoType::Boolean),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, PseudoType::Integer | PseudoType::Real)
    }
}

impl fmt::Display for PseudoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PseudoType::Integer => f.write_str("INTEGER"),
            PseudoType::Real => f.write_str("REAL"),
            PseudoType::String => f.write_str("STRING"),
            PseudoType::Char => f.write_str("CHAR"),
            PseudoType::Boolean => f.write_str("BOOLEAN"),
            PseudoType::Array {
                upper: Some(upper),
                of,
            } => write!(f, "ARRAY[0:{upper}] OF {of}"),
            PseudoType::Array { upper: None, of } => write!(f, "ARRAY OF {of}"),
        }
    }
}
