//! Deterministic capabilities: arithmetic and translation

pub mod calculator;
pub mod translator;

pub use calculator::{
    add, calculate, extract_numbers, is_simple_expression, multiply, parse_simple, CalcError,
    Operator,
};
pub use translator::translate_en_to_de;
