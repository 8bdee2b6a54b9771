//! Nesting depth marking and collapse.
//!
//! Parentheses are replaced by depth annotations. A function name sits one
//! level above its surroundings and its arguments one level above that, with
//! argument-separating commas back at the function's level:
//!
//! ```text
//! @to_string(@round({x}/{y}*100, 1)) + "%"
//!
//! 1 @to_string
//!     3 @round
//!         4 {x} / {y} * 100
//!     3 ,
//!         4 1
//! 0 + "%"
//! ```
//!
//! Collapsing repeatedly compiles the deepest runs into single pieces one
//! level up until one piece is left.

use polars::prelude::Expr;

use crate::formula::error::{FormulaError, FormulaResult};
use crate::formula::functions;
use crate::formula::reduce;
use crate::formula::token::Token;

/// A token not yet resolved, or an already compiled sub-expression.
#[derive(Debug, Clone)]
pub enum Piece {
    Token(Token),
    Expr(Expr),
}

impl Piece {
    pub fn describe(&self) -> String {
        match self {
            Piece::Token(token) => token.to_string(),
            Piece::Expr(_) => "expression".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Marked {
    pub depth: i32,
    pub piece: Piece,
}

impl Marked {
    fn new(depth: i32, piece: Piece) -> Self {
        Self { depth, piece }
    }
}

enum Scope {
    Group,
    Call,
}

/// Annotate tokens with depth and drop parentheses.
pub fn mark_depth(tokens: Vec<Token>) -> FormulaResult<Vec<Marked>> {
    let mut depth: i32 = 0;
    let mut scopes: Vec<Scope> = Vec::new();
    let mut pending_call: Option<String> = None;
    let mut marked = Vec::with_capacity(tokens.len());

    for token in tokens {
        if let Some(name) = pending_call.take() {
            if token != Token::OpenParen {
                return Err(FormulaError::MissingCallParenthesis(name));
            }
            scopes.push(Scope::Call);
            depth += 1;
            continue;
        }
        match token {
            Token::OpenParen => {
                scopes.push(Scope::Group);
                depth += 1;
            }
            Token::CloseParen => match scopes.pop() {
                Some(Scope::Group) => depth -= 1,
                Some(Scope::Call) => depth -= 2,
                None => return Err(FormulaError::UnbalancedParentheses),
            },
            Token::Comma => match scopes.last() {
                Some(Scope::Call) => marked.push(Marked::new(depth - 1, Piece::Token(Token::Comma))),
                _ => return Err(FormulaError::MisplacedComma),
            },
            Token::Function(name) => {
                depth += 1;
                pending_call = Some(name.clone());
                marked.push(Marked::new(depth, Piece::Token(Token::Function(name))));
            }
            other => marked.push(Marked::new(depth, Piece::Token(other))),
        }
    }

    if let Some(name) = pending_call {
        return Err(FormulaError::MissingCallParenthesis(name));
    }
    if !scopes.is_empty() {
        return Err(FormulaError::UnbalancedParentheses);
    }
    Ok(marked)
}

/// Collapse the deepest runs one level.
pub fn collapse_deepest(marked: Vec<Marked>) -> FormulaResult<Vec<Marked>> {
    let Some(deepest) = marked.iter().map(|m| m.depth).max() else {
        return Err(FormulaError::Empty);
    };
    let mut collapsed = Vec::with_capacity(marked.len());
    let mut run: Vec<Piece> = Vec::new();

    for item in marked {
        if item.depth == deepest {
            run.push(item.piece);
            continue;
        }
        if !run.is_empty() {
            collapsed.push(Marked::new(deepest - 1, compile_run(std::mem::take(&mut run))?));
        }
        collapsed.push(item);
    }
    if !run.is_empty() {
        collapsed.push(Marked::new(deepest - 1, compile_run(run)?));
    }
    Ok(collapsed)
}

/// Collapse until a single piece at top level remains.
pub fn collapse(mut marked: Vec<Marked>) -> FormulaResult<Piece> {
    loop {
        match marked.as_slice() {
            [] => return Err(FormulaError::Empty),
            [single] if single.depth <= 0 => break,
            _ => marked = collapse_deepest(marked)?,
        }
    }
    marked
        .pop()
        .map(|m| m.piece)
        .ok_or(FormulaError::Empty)
}

/// Compile one run of same-depth pieces.
///
/// A run headed by a function name goes to the function builder. A lone
/// piece is passed up unchanged so its consumer can read it as a literal
/// argument. Anything else is folded left to right.
fn compile_run(mut run: Vec<Piece>) -> FormulaResult<Piece> {
    if let Some(Piece::Token(Token::Function(name))) = run.first() {
        let name = name.clone();
        let args = split_arguments(run.split_off(1))?;
        return functions::build(&name, args).map(Piece::Expr);
    }
    if run.len() == 1 {
        return run.pop().ok_or(FormulaError::Empty);
    }
    reduce::fold(run).map(Piece::Expr)
}

/// Split a function's pieces on commas. Every argument must have collapsed
/// to exactly one piece.
fn split_arguments(pieces: Vec<Piece>) -> FormulaResult<Vec<Piece>> {
    if pieces.is_empty() {
        return Ok(Vec::new());
    }
    let mut args = Vec::new();
    let mut current: Vec<Piece> = Vec::new();
    for piece in pieces.into_iter().chain(std::iter::once(Piece::Token(Token::Comma))) {
        if matches!(piece, Piece::Token(Token::Comma)) {
            if current.len() != 1 {
                return Err(FormulaError::MisplacedComma);
            }
            args.extend(current.drain(..));
        } else {
            current.push(piece);
        }
    }
    Ok(args)
}
