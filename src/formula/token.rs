//! Formula tokenizer.
//!
//! One alternation regex is tried at each position, in priority order:
//! column reference, number, function name, string, boolean word, operator.

use std::sync::LazyLock;

use polars::prelude::{DataType, Expr};
use regex::Regex;

use crate::formula::error::{FormulaError, FormulaResult};

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:",
        r"(?P<column>\{[^}]*\})",
        r"|(?P<number>-?\d+\.\d+|-?\d+)",
        r"|(?P<function>@\w+)",
        r#"|(?P<string>"[^"]*")"#,
        r"|(?P<boolean>(?i:true|false)\b)",
        r"|(?P<operator>==|!=|<=|>=|[-+*/%(),<>&|])",
        r")"
    ))
    .expect("token pattern compiles")
});

/// Binary operators, applied strictly left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

/// Symbol → operator lookup.
const OPERATORS: &[(&str, Operator)] = &[
    ("+", Operator::Add),
    ("-", Operator::Sub),
    ("*", Operator::Mul),
    ("/", Operator::Div),
    ("%", Operator::Rem),
    ("==", Operator::Eq),
    ("!=", Operator::NotEq),
    ("<", Operator::Lt),
    ("<=", Operator::LtEq),
    (">", Operator::Gt),
    (">=", Operator::GtEq),
    ("&", Operator::And),
    ("|", Operator::Or),
];

impl Operator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        OPERATORS
            .iter()
            .find(|(s, _)| *s == symbol)
            .map(|(_, op)| *op)
    }

    pub fn symbol(&self) -> &'static str {
        OPERATORS
            .iter()
            .find(|(_, op)| op == self)
            .map_or("?", |(s, _)| *s)
    }

    /// Combine two expressions. Division is always true division.
    pub fn apply(&self, lhs: Expr, rhs: Expr) -> Expr {
        match self {
            Operator::Add => lhs + rhs,
            Operator::Sub => lhs - rhs,
            Operator::Mul => lhs * rhs,
            Operator::Div => lhs.cast(DataType::Float64) / rhs.cast(DataType::Float64),
            Operator::Rem => lhs % rhs,
            Operator::Eq => lhs.eq(rhs),
            Operator::NotEq => lhs.neq(rhs),
            Operator::Lt => lhs.lt(rhs),
            Operator::LtEq => lhs.lt_eq(rhs),
            Operator::Gt => lhs.gt(rhs),
            Operator::GtEq => lhs.gt_eq(rhs),
            Operator::And => lhs.and(rhs),
            Operator::Or => lhs.or(rhs),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `{name}`, stored without braces.
    Column(String),
    /// Numeric literal as written.
    Number(String),
    /// `@name`, stored without the `@`.
    Function(String),
    /// `"text"`, stored without quotes.
    Str(String),
    Bool(bool),
    Operator(Operator),
    OpenParen,
    CloseParen,
    Comma,
}

impl Token {
    /// Whether the token ends an operand, so that a following `-1` is a
    /// subtraction rather than a negative literal.
    fn ends_operand(&self) -> bool {
        matches!(
            self,
            Token::Column(_) | Token::Number(_) | Token::Str(_) | Token::Bool(_) | Token::CloseParen
        )
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Column(name) => write!(f, "{{{}}}", name),
            Token::Number(text) => write!(f, "{}", text),
            Token::Function(name) => write!(f, "@{}", name),
            Token::Str(text) => write!(f, "\"{}\"", text),
            Token::Bool(value) => write!(f, "{}", value),
            Token::Operator(op) => write!(f, "{}", op.symbol()),
            Token::OpenParen => write!(f, "("),
            Token::CloseParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
        }
    }
}

/// Split a formula into tokens. Whitespace between tokens is skipped; any
/// other unrecognized character is an error.
pub fn tokenize(formula: &str) -> FormulaResult<Vec<Token>> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut position = 0;

    while position < formula.len() {
        let rest = &formula[position..];
        let trimmed = rest.trim_start();
        position += rest.len() - trimmed.len();
        if trimmed.is_empty() {
            break;
        }

        let Some(caps) = TOKEN.captures(trimmed) else {
            let found = trimmed.chars().next().unwrap_or_default();
            return Err(FormulaError::UnexpectedCharacter { position, found });
        };
        let text = caps.get(0).map_or("", |m| m.as_str());
        position += text.len();

        if let Some(m) = caps.name("column") {
            let name = m.as_str();
            tokens.push(Token::Column(name[1..name.len() - 1].to_string()));
        } else if let Some(m) = caps.name("number") {
            let number = m.as_str();
            match number.strip_prefix('-') {
                Some(unsigned) if tokens.last().is_some_and(Token::ends_operand) => {
                    tokens.push(Token::Operator(Operator::Sub));
                    tokens.push(Token::Number(unsigned.to_string()));
                }
                _ => tokens.push(Token::Number(number.to_string())),
            }
        } else if let Some(m) = caps.name("function") {
            tokens.push(Token::Function(m.as_str()[1..].to_string()));
        } else if let Some(m) = caps.name("string") {
            let quoted = m.as_str();
            tokens.push(Token::Str(quoted[1..quoted.len() - 1].to_string()));
        } else if let Some(m) = caps.name("boolean") {
            tokens.push(Token::Bool(m.as_str().eq_ignore_ascii_case("true")));
        } else if let Some(m) = caps.name("operator") {
            let token = match m.as_str() {
                "(" => Token::OpenParen,
                ")" => Token::CloseParen,
                "," => Token::Comma,
                symbol => match Operator::from_symbol(symbol) {
                    Some(op) => Token::Operator(op),
                    None => {
                        return Err(FormulaError::UnexpectedCharacter {
                            position: position - text.len(),
                            found: symbol.chars().next().unwrap_or_default(),
                        })
                    }
                },
            };
            tokens.push(token);
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(formula: &str) -> Vec<String> {
        tokenize(formula)
            .unwrap()
            .iter()
            .map(|t| t.to_string())
            .collect()
    }

    #[test]
    fn test_tokenize_mixed() {
        assert_eq!(
            texts(r#"@to_string(@round({x}/{y}*100, 1)) + "%""#),
            vec![
                "@to_string", "(", "@round", "(", "{x}", "/", "{y}", "*", "100", ",", "1", ")",
                ")", "+", "\"%\""
            ]
        );
    }

    #[test]
    fn test_tokenize_columns_with_spaces() {
        assert_eq!(
            tokenize("{first name} + 1").unwrap(),
            vec![
                Token::Column("first name".to_string()),
                Token::Operator(Operator::Add),
                Token::Number("1".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_comparisons_prefer_two_chars() {
        assert_eq!(texts("{a} <= 2 != {b}"), vec!["{a}", "<=", "2", "!=", "{b}"]);
    }

    #[test]
    fn test_negative_numbers() {
        assert_eq!(texts("-1.5 * {x}"), vec!["-1.5", "*", "{x}"]);
        assert_eq!(texts("{x}-1"), vec!["{x}", "-", "1"]);
        assert_eq!(texts("(-2)"), vec!["(", "-2", ")"]);
    }

    #[test]
    fn test_booleans_any_case() {
        assert_eq!(
            tokenize("TRUE | false").unwrap(),
            vec![
                Token::Bool(true),
                Token::Operator(Operator::Or),
                Token::Bool(false)
            ]
        );
    }

    #[test]
    fn test_unexpected_character() {
        assert_eq!(
            tokenize("{x} $ 2").unwrap_err(),
            FormulaError::UnexpectedCharacter {
                position: 4,
                found: '$'
            }
        );
        assert!(tokenize("1 = 2").is_err());
    }

    #[test]
    fn test_operator_table_round_trip() {
        for (symbol, op) in OPERATORS {
            assert_eq!(Operator::from_symbol(symbol), Some(*op));
            assert_eq!(op.symbol(), *symbol);
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_tokenize_never_panics(formula in "\\PC{0,40}") {
                let _ = tokenize(&formula);
            }
        }
    }
}
