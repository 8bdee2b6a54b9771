//! `@function(...)` builders.

use polars::prelude::{lit, when, DataType, Expr, NULL};

use crate::formula::depth::Piece;
use crate::formula::error::{FormulaError, FormulaResult};
use crate::formula::reduce::resolve;
use crate::formula::token::Token;

/// Functions taking only the value they apply to.
const UNARY: &[(&str, fn(Expr) -> Expr)] = &[
    ("abs", |e| e.abs()),
    ("ceil", |e| e.ceil()),
    ("floor", |e| e.floor()),
    ("sqrt", |e| e.sqrt()),
    ("exp", |e| e.exp()),
    ("log", |e| e.log(std::f64::consts::E)),
    ("sin", |e| e.sin()),
    ("cos", |e| e.cos()),
    ("tan", |e| e.tan()),
    ("arcsin", |e| e.arcsin()),
    ("arccos", |e| e.arccos()),
    ("arctan", |e| e.arctan()),
    ("degrees", |e| e.degrees()),
    ("radians", |e| e.radians()),
    ("is_null", |e| e.is_null()),
    ("is_not_null", |e| e.is_not_null()),
    ("is_nan", |e| e.is_nan()),
    ("is_not_nan", |e| e.is_not_nan()),
    ("is_finite", |e| e.is_finite()),
    ("is_infinite", |e| e.is_infinite()),
    ("not", |e| e.not()),
    ("count", |e| e.count()),
    ("len", |e| e.str().len_chars()),
    ("len_chars", |e| e.str().len_chars()),
    ("upper", |e| e.str().to_uppercase()),
    ("to_uppercase", |e| e.str().to_uppercase()),
    ("lower", |e| e.str().to_lowercase()),
    ("to_lowercase", |e| e.str().to_lowercase()),
    ("to_string", |e| e.cast(DataType::String)),
    ("to_int", |e| e.cast(DataType::Int64)),
    ("to_float", |e| e.cast(DataType::Float64)),
    ("to_boolean", |e| e.cast(DataType::Boolean)),
];

/// Names of every supported function, for help text.
pub fn names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = UNARY.iter().map(|(name, _)| *name).collect();
    names.extend([
        "round",
        "slice",
        "replace_string",
        "replace_int",
        "replace_float",
        "remove_nans",
        "remove_infs",
    ]);
    names.sort_unstable();
    names
}

/// Build the expression for `@name(args...)`.
pub fn build(name: &str, args: Vec<Piece>) -> FormulaResult<Expr> {
    let call = Call { name, args };
    if let Some((_, unary)) = UNARY.iter().find(|(n, _)| *n == name) {
        call.expect_count("1", |n| n == 1)?;
        return Ok(unary(call.value()?));
    }
    match name {
        "round" => {
            call.expect_count("1 or 2", |n| n == 1 || n == 2)?;
            let decimals = match call.args.get(1) {
                Some(_) => call.unsigned(1)?,
                None => 0,
            };
            Ok(call.value()?.round(decimals))
        }
        "slice" => {
            call.expect_count("2 or 3", |n| n == 2 || n == 3)?;
            let start = call.integer(1)?;
            let end = match call.args.get(2) {
                Some(_) => Some(call.integer(2)?),
                None => None,
            };
            Ok(slice(call.value()?, start, end))
        }
        "replace_string" => {
            call.expect_count("3", |n| n == 3)?;
            let (old, new) = (call.string(1)?, call.string(2)?);
            Ok(call.value()?.replace(lit(old), lit(new)))
        }
        "replace_int" => {
            call.expect_count("3", |n| n == 3)?;
            let (old, new) = (call.integer(1)?, call.integer(2)?);
            Ok(call.value()?.replace(lit(old), lit(new)))
        }
        "replace_float" => {
            call.expect_count("3", |n| n == 3)?;
            let (old, new) = (call.float(1)?, call.float(2)?);
            Ok(call.value()?.replace(lit(old), lit(new)))
        }
        "remove_nans" => {
            call.expect_count("1 or 2", |n| n == 1 || n == 2)?;
            let fill = call.fill(1)?;
            Ok(call.value()?.fill_nan(fill))
        }
        "remove_infs" => {
            call.expect_count("1 or 2", |n| n == 1 || n == 2)?;
            let fill = call.fill(1)?;
            let value = call.value()?;
            Ok(when(value.clone().is_infinite())
                .then(fill)
                .otherwise(value))
        }
        _ => Err(FormulaError::UnknownFunction(name.to_string())),
    }
}

/// Substring from `start` through `end`, both inclusive. An `end` of 0 or
/// none runs to the end of the string. A negative `start` is taken from
/// `len + 1`, so `-2` starts at the last character. A negative `end` gives a
/// length of `len + end + 1`, at least 1.
fn slice(value: Expr, start: i64, end: Option<i64>) -> Expr {
    let length = value.clone().str().len_chars().cast(DataType::Int64);
    let offset = if start < 0 {
        clamp_at_zero(length.clone() + lit(start + 1))
    } else {
        lit(start)
    };
    let size = match end {
        None | Some(0) => lit(NULL),
        Some(end) if end < 0 => {
            let size = length + lit(end + 1);
            when(size.clone().lt(lit(1i64)))
                .then(lit(1i64))
                .otherwise(size)
        }
        Some(end) => clamp_at_zero(lit(end.saturating_add(1)) - offset.clone()),
    };
    value.str().slice(offset, size)
}

fn clamp_at_zero(value: Expr) -> Expr {
    when(value.clone().lt(lit(0i64)))
        .then(lit(0i64))
        .otherwise(value)
}

struct Call<'a> {
    name: &'a str,
    args: Vec<Piece>,
}

impl Call<'_> {
    fn expect_count(&self, expected: &'static str, ok: impl Fn(usize) -> bool) -> FormulaResult<()> {
        if ok(self.args.len()) {
            Ok(())
        } else {
            Err(FormulaError::ArgumentCount {
                function: self.name.to_string(),
                expected,
                found: self.args.len(),
            })
        }
    }

    fn invalid(&self, index: usize, expected: &'static str) -> FormulaError {
        FormulaError::InvalidArgument {
            function: self.name.to_string(),
            index: index + 1,
            expected,
        }
    }

    /// The first argument, as an expression.
    fn value(&self) -> FormulaResult<Expr> {
        let piece = self.args.first().cloned().ok_or(FormulaError::ArgumentCount {
            function: self.name.to_string(),
            expected: "at least 1",
            found: 0,
        })?;
        resolve(piece)
    }

    fn number_text(&self, index: usize, expected: &'static str) -> FormulaResult<&str> {
        match self.args.get(index) {
            Some(Piece::Token(Token::Number(text))) => Ok(text),
            _ => Err(self.invalid(index, expected)),
        }
    }

    fn integer(&self, index: usize) -> FormulaResult<i64> {
        let text = self.number_text(index, "an integer literal")?;
        text.parse().map_err(|_| self.invalid(index, "an integer literal"))
    }

    fn unsigned(&self, index: usize) -> FormulaResult<u32> {
        let text = self.number_text(index, "a non-negative integer literal")?;
        text.parse()
            .map_err(|_| self.invalid(index, "a non-negative integer literal"))
    }

    fn float(&self, index: usize) -> FormulaResult<f64> {
        let text = self.number_text(index, "a number literal")?;
        text.parse().map_err(|_| self.invalid(index, "a number literal"))
    }

    fn string(&self, index: usize) -> FormulaResult<String> {
        match self.args.get(index) {
            Some(Piece::Token(Token::Str(text))) => Ok(text.clone()),
            _ => Err(self.invalid(index, "a string literal")),
        }
    }

    /// Optional replacement value, null when omitted.
    fn fill(&self, index: usize) -> FormulaResult<Expr> {
        match self.args.get(index) {
            Some(piece) => resolve(piece.clone()),
            None => Ok(lit(NULL)),
        }
    }
}
