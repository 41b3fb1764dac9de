//! IR module - line-level data model
//!
//! 構文木は作らない。ここにあるのは行単位の変換で受け渡す型だけ。
//!
//! ## サブモジュール
//! - `ops` - 方言ごとに表記が変わる演算子 (PseudoOp, AugAssignOp)
//! - `nodes` - ブロック種別・フレーム・マッチ結果 (BlockKind, Frame, Converted)
//! - `location` - ソース位置情報 (SourceLocation)

pub mod location;
pub mod nodes;
pub mod ops;

pub use location::*;
pub use nodes::*;
pub use ops::*;
