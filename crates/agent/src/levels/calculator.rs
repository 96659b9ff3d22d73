//! Level 2: single-purpose calculator routing
//!
//! Arithmetic is routed to the calculator, never to the model. A query that
//! mixes arithmetic with a fact question is declined.

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use stepwise_config::Config;

use super::Responder;
use crate::format::format_general;
use crate::knowledge::{select_knowledge, Knowledge, LocalKnowledge, FALLBACK_PREFIX};
use crate::tools::{add, calculate, extract_numbers, is_simple_expression, multiply, CalcError};

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant. For non-math questions, answer clearly and concisely. For math, the PROGRAM will call tools, not you.";

pub const BANNER: &str = "Level 2 — LLM + Calculator Tool (type 'exit' to quit)";

pub const MIXED_QUERY_REPLY: &str =
    "I can do a single task at a time at Level 2. Multi-step mixed queries aren't supported yet.";

pub const USAGE_HINT: &str =
    "Please provide a simple expression like '12 * 7' or 'Add 45 and 30'.";

static MATH_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(add|plus|sum|times|multiply|multiplied|product|minus|difference|divided|/|\*|\+|-|\bx\b|×)\b",
    )
    .unwrap()
});

const FACT_MARKERS: &[&str] = &[
    "capital",
    "who is",
    "what is the capital of",
    "tell me the capital",
];

const MULTIPLY_WORDS: &[&str] = &["times", "multiply", "multiplied"];
const ADD_WORDS: &[&str] = &["add", "plus", "sum"];

/// Query has the `<num> <op> <num>` shape or mentions an arithmetic keyword
pub fn looks_like_math(query: &str) -> bool {
    is_simple_expression(query) || MATH_KEYWORDS.is_match(query)
}

/// Arithmetic together with a fact question
pub fn is_mixed_query(query: &str) -> bool {
    let lower = query.to_lowercase();
    looks_like_math(query) && FACT_MARKERS.iter().any(|marker| lower.contains(marker))
}

fn mentions_any(lower: &str, words: &[&str]) -> bool {
    words.iter().any(|word| lower.contains(word))
}

/// Compute a math-like query. `Ok(None)` means no usable form was found.
fn compute(query: &str) -> Result<Option<f64>, CalcError> {
    if is_simple_expression(query) {
        return calculate(query).map(Some);
    }

    let lower = query.to_lowercase();
    if mentions_any(&lower, MULTIPLY_WORDS) {
        if let [a, b, ..] = extract_numbers(query).as_slice() {
            return Ok(Some(multiply(*a, *b)));
        }
    }
    if mentions_any(&lower, ADD_WORDS) {
        if let [a, b, ..] = extract_numbers(query).as_slice() {
            return Ok(Some(add(*a, *b)));
        }
    }

    Ok(None)
}

pub struct CalculatorResponder {
    knowledge: Box<dyn Knowledge>,
}

impl CalculatorResponder {
    pub fn new(knowledge: Box<dyn Knowledge>) -> Self {
        Self { knowledge }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(select_knowledge(
            config,
            LocalKnowledge::level2(),
            Some(FALLBACK_PREFIX),
        ))
    }

    /// Reply for a math-like query
    pub fn handle_math(&self, query: &str) -> String {
        match compute(query) {
            Ok(Some(result)) => format!("Calculator result: {}", format_general(result)),
            Ok(None) => USAGE_HINT.to_string(),
            Err(e) => {
                debug!("◆ CALCULATOR REJECTED {:?}: {}", query, e);
                format!("Sorry, I couldn't compute that: {}", e)
            }
        }
    }
}

#[async_trait]
impl Responder for CalculatorResponder {
    fn level(&self) -> u8 {
        2
    }

    fn banner(&self) -> &str {
        BANNER
    }

    async fn respond(&self, query: &str) -> String {
        if is_mixed_query(query) {
            return MIXED_QUERY_REPLY.to_string();
        }
        if looks_like_math(query) {
            return self.handle_math(query);
        }

        match self.knowledge.ask(SYSTEM_PROMPT, query).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("◆ KNOWLEDGE FAILED: {}", e);
                format!("{}{}", FALLBACK_PREFIX, LocalKnowledge::level2().answer(query))
            }
        }
    }
}
