//! Formula compilation errors.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error("Formula is empty")]
    Empty,

    #[error("Unexpected character {found:?} at position {position}")]
    UnexpectedCharacter { position: usize, found: char },

    #[error("Unbalanced parentheses")]
    UnbalancedParentheses,

    #[error("Function @{0} must be followed by (")]
    MissingCallParenthesis(String),

    #[error("Comma outside of a function call")]
    MisplacedComma,

    #[error("Unknown function @{0}")]
    UnknownFunction(String),

    #[error("@{function} expects {expected} argument(s), got {found}")]
    ArgumentCount {
        function: String,
        expected: &'static str,
        found: usize,
    },

    #[error("Argument {index} of @{function} must be {expected}")]
    InvalidArgument {
        function: String,
        index: usize,
        expected: &'static str,
    },

    #[error("Invalid literal {0:?}")]
    InvalidLiteral(String),

    #[error("Expected an operator, found {0:?}")]
    ExpectedOperator(String),

    #[error("Operator {0:?} is missing its right operand")]
    MissingOperand(String),
}

pub type FormulaResult<T> = std::result::Result<T, FormulaError>;
