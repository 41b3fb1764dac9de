//! Range bound arithmetic
//!
//! 擬似コードのループは上限を含むので、Python の `range` の上限から 1 を引く。
//! 数値として読めない上限は `"<expr> - 1"` という記号的な式で表す。

/// Inclusive loop bounds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeBounds {
    pub start: String,
    pub end: String,
    pub step: Option<String>,
}

/// `range(...)` の引数から上限込みの範囲を作る
pub fn range_bounds(args: &[String]) -> Option<RangeBounds> {
    match args {
        [stop] => Some(RangeBounds {
            start: "0".to_string(),
            end: minus_one(stop),
            step: None,
        }),
        [start, stop] => Some(RangeBounds {
            start: start.trim().to_string(),
            end: minus_one(stop),
            step: None,
        }),
        [start, stop, step] => {
            // A negative step counts down, so the exclusive stop moves up by one.
            let end = if is_negative(step) {
                plus_one(stop)
            } else {
                minus_one(stop)
            };
            Some(RangeBounds {
                start: start.trim().to_string(),
                end,
                step: Some(step.trim().to_string()),
            })
        }
        _ => None,
    }
}

pub fn minus_one(expr: &str) -> String {
    offset(expr, -1)
}

pub fn plus_one(expr: &str) -> String {
    offset(expr, 1)
}

fn offset(expr: &str, delta: i64) -> String {
    let expr = expr.trim();
    match expr.parse::<i64>() {
        Ok(n) => (n + delta).to_string(),
        Err(_) if delta < 0 => format!("{expr} - {}", -delta),
        Err(_) => format!("{expr} + {delta}"),
    }
}

fn is_negative(step: &str) -> bool {
    step.trim().parse::<i64>().map(|n| n < 0).unwrap_or(false)
}
