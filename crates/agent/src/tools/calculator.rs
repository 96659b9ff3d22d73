//! Calculator capability
//!
//! Two-operand arithmetic. `calculate` accepts a whole expression such as
//! `12 * 7`; `add` and `multiply` are the direct forms the step executor uses.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// `<num> <op> <num>` and nothing else
static NUM_OP_NUM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(-?[0-9]+(?:\.[0-9]+)?)\s*([+\-*/x×])\s*(-?[0-9]+(?:\.[0-9]+)?)\s*$").unwrap()
});

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-?[0-9]+(?:\.[0-9]+)?").unwrap());

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("Unsupported expression format. Use like '12 * 7'")]
    UnsupportedFormat,

    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    #[error("float division by zero")]
    DivisionByZero,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// `x` and `×` are accepted as multiplication
    pub fn from_symbol(symbol: &str) -> Result<Self, CalcError> {
        match symbol {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Subtract),
            "*" | "x" | "×" => Ok(Operator::Multiply),
            "/" => Ok(Operator::Divide),
            other => Err(CalcError::UnsupportedOperator(other.to_string())),
        }
    }

    pub fn apply(self, a: f64, b: f64) -> Result<f64, CalcError> {
        match self {
            Operator::Add => Ok(add(a, b)),
            Operator::Subtract => Ok(a - b),
            Operator::Multiply => Ok(multiply(a, b)),
            Operator::Divide if b == 0.0 => Err(CalcError::DivisionByZero),
            Operator::Divide => Ok(a / b),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
        };
        f.write_str(symbol)
    }
}

pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

pub fn multiply(a: f64, b: f64) -> f64 {
    a * b
}

/// Whether `expr` has the `<num> <op> <num>` shape
pub fn is_simple_expression(expr: &str) -> bool {
    NUM_OP_NUM.is_match(expr.trim())
}

/// Split `<num> <op> <num>` into its parts
pub fn parse_simple(expr: &str) -> Result<(f64, Operator, f64), CalcError> {
    let lower = expr.trim().to_lowercase();
    let caps = NUM_OP_NUM
        .captures(&lower)
        .ok_or(CalcError::UnsupportedFormat)?;

    let number = |i: usize| -> Result<f64, CalcError> {
        caps[i].parse().map_err(|_| CalcError::UnsupportedFormat)
    };

    Ok((number(1)?, Operator::from_symbol(&caps[2])?, number(3)?))
}

/// Evaluate a two-operand expression
pub fn calculate(expr: &str) -> Result<f64, CalcError> {
    let (a, op, b) = parse_simple(expr)?;
    op.apply(a, b)
}

/// Every signed decimal in `text`, in order of appearance
pub fn extract_numbers(text: &str) -> Vec<f64> {
    NUMBER
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== parse_simple Tests ==========

    #[test]
    fn test_parse_simple_operators() {
        assert_eq!(parse_simple("12 * 7").unwrap(), (12.0, Operator::Multiply, 7.0));
        assert_eq!(parse_simple("1+2").unwrap(), (1.0, Operator::Add, 2.0));
        assert_eq!(parse_simple("-3 - 4").unwrap(), (-3.0, Operator::Subtract, 4.0));
        assert_eq!(parse_simple("9 / 3").unwrap(), (9.0, Operator::Divide, 3.0));
        assert_eq!(parse_simple("6 X 7").unwrap(), (6.0, Operator::Multiply, 7.0));
        assert_eq!(parse_simple("2 × 2.5").unwrap(), (2.0, Operator::Multiply, 2.5));
    }

    #[test]
    fn test_parse_simple_rejects_other_shapes() {
        assert_eq!(parse_simple("what is 2 + 2"), Err(CalcError::UnsupportedFormat));
        assert_eq!(parse_simple("2 + 2 + 2"), Err(CalcError::UnsupportedFormat));
        assert_eq!(parse_simple(""), Err(CalcError::UnsupportedFormat));
        assert_eq!(parse_simple("2 ^ 3"), Err(CalcError::UnsupportedFormat));
    }

    // ========== calculate Tests ==========

    #[test]
    fn test_calculate() {
        assert_eq!(calculate("12 * 7").unwrap(), 84.0);
        assert_eq!(calculate("  10 / 4  ").unwrap(), 2.5);
        assert_eq!(calculate("5 - 8").unwrap(), -3.0);
        assert_eq!(calculate("0.5 + 0.25").unwrap(), 0.75);
    }

    #[test]
    fn test_calculate_division_by_zero() {
        assert_eq!(calculate("1 / 0"), Err(CalcError::DivisionByZero));
        assert_eq!(
            CalcError::DivisionByZero.to_string(),
            "float division by zero"
        );
    }

    #[test]
    fn test_format_error_message() {
        let err = calculate("twelve times seven").unwrap_err();
        assert_eq!(err.to_string(), "Unsupported expression format. Use like '12 * 7'");
    }

    // ========== Helpers Tests ==========

    #[test]
    fn test_add_and_multiply() {
        assert_eq!(add(2.0, 3.0), 5.0);
        assert_eq!(multiply(2.5, 4.0), 10.0);
        assert_eq!(add(-1.5, 1.5), 0.0);
    }

    #[test]
    fn test_extract_numbers() {
        assert_eq!(extract_numbers("Add 45 and 30"), vec![45.0, 30.0]);
        assert_eq!(extract_numbers("multiply -2.5 by 4 then 1"), vec![-2.5, 4.0, 1.0]);
        assert!(extract_numbers("no digits here").is_empty());
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        assert_eq!(parse_simple("１２ * 7"), Err(CalcError::UnsupportedFormat));
        assert!(!is_simple_expression("٣ + 4"));
        assert_eq!(extract_numbers("add ４５ and 30"), vec![30.0]);
    }

    #[test]
    fn test_operator_display_and_unknown_symbol() {
        assert_eq!(Operator::Divide.to_string(), "/");
        assert_eq!(
            Operator::from_symbol("%"),
            Err(CalcError::UnsupportedOperator("%".to_string()))
        );
    }
}
