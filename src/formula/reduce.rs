//! Literal resolution and the left-to-right operator fold.

use polars::prelude::{col, lit, Expr};

use crate::formula::depth::Piece;
use crate::formula::error::{FormulaError, FormulaResult};
use crate::formula::token::Token;

/// Turn a piece into an expression.
///
/// `{name}` is a column, booleans and strings are literals, numbers with a
/// decimal point are floats and all other numbers are integers.
pub fn resolve(piece: Piece) -> FormulaResult<Expr> {
    match piece {
        Piece::Expr(expr) => Ok(expr),
        Piece::Token(token) => resolve_token(token),
    }
}

fn resolve_token(token: Token) -> FormulaResult<Expr> {
    match token {
        Token::Column(name) => Ok(col(name.as_str())),
        Token::Bool(value) => Ok(lit(value)),
        Token::Str(text) => Ok(lit(text)),
        Token::Number(text) if text.contains('.') => text
            .parse::<f64>()
            .map(lit)
            .map_err(|_| FormulaError::InvalidLiteral(text)),
        Token::Number(text) => text
            .parse::<i64>()
            .map(lit)
            .map_err(|_| FormulaError::InvalidLiteral(text)),
        other => Err(FormulaError::InvalidLiteral(other.to_string())),
    }
}

/// Fold `operand (operator operand)*` strictly left to right. There is no
/// precedence: `1 + 2 * 3` is `(1 + 2) * 3`.
pub fn fold(pieces: Vec<Piece>) -> FormulaResult<Expr> {
    let mut pieces = pieces.into_iter();
    let first = pieces.next().ok_or(FormulaError::Empty)?;
    let mut expr = resolve(first)?;

    while let Some(piece) = pieces.next() {
        let op = match piece {
            Piece::Token(Token::Operator(op)) => op,
            other => return Err(FormulaError::ExpectedOperator(other.describe())),
        };
        let rhs = pieces
            .next()
            .ok_or_else(|| FormulaError::MissingOperand(op.symbol().to_string()))?;
        expr = op.apply(expr, resolve(rhs)?);
    }
    Ok(expr)
}
