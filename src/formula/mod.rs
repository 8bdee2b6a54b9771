//! Formula compiler for computed columns.
//!
//! A formula combines column references, literals, infix operators and
//! function calls:
//!
//! ```text
//! {price} * {quantity}
//! {first name} + " " + {last name}
//! @round({x} / {y} * 100, 1)
//! @slice({code}, 0, -2)
//! @replace_string({status}, "ok", "OK")
//! ```
//!
//! Operators within one nesting level apply strictly left to right, so
//! `1 + 2 * 3` is `9`. Use parentheses to group. Lines starting with `//`
//! are comments.

pub mod depth;
pub mod error;
pub mod functions;
pub mod reduce;
pub mod token;

use polars::prelude::Expr;

pub use error::{FormulaError, FormulaResult};
pub use token::{tokenize, Operator, Token};

/// Compile a formula into a single column expression.
pub fn compile(formula: &str) -> FormulaResult<Expr> {
    let source = strip_comments(formula);
    let tokens = tokenize(&source)?;
    if tokens.is_empty() {
        return Err(FormulaError::Empty);
    }
    let marked = depth::mark_depth(tokens)?;
    reduce::resolve(depth::collapse(marked)?)
}

/// Drop lines whose first non-blank characters are `//`.
pub fn strip_comments(formula: &str) -> String {
    formula
        .lines()
        .filter(|line| !line.trim_start().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}
