//! Step model and rule-based step detection
//!
//! A request is scanned by independent pattern rules in a fixed order; each
//! rule that matches contributes one step. When nothing matches the whole
//! request becomes a single knowledge lookup, so the result is never empty.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

use crate::{AgentError, Result};

static TRANSLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"translate\s+'([^']+)'\s+into\s+german").unwrap());

static ADD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\badd\s+(-?[0-9]+(?:\.[0-9]+)?)\s+and\s+(-?[0-9]+(?:\.[0-9]+)?)").unwrap()
});

static MULTIPLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bmultiply\s+(-?[0-9]+(?:\.[0-9]+)?)\s+and\s+(-?[0-9]+(?:\.[0-9]+)?)").unwrap()
});

static CAPITAL_OF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"capital of\s+([a-zA-Z]+)").unwrap());

const EARTH_MARS: &str = "distance between earth and mars";

/// One unit of work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Step {
    Add { a: f64, b: f64 },
    Multiply { a: f64, b: f64 },
    Translate { text: String },
    Fact { question: String },
    /// Descriptor with a tag this version does not know. Never detected,
    /// only decoded.
    #[serde(skip)]
    Other { tag: String },
}

impl Step {
    pub fn fact(question: impl Into<String>) -> Self {
        Step::Fact {
            question: question.into(),
        }
    }

    pub fn translate(text: impl Into<String>) -> Self {
        Step::Translate { text: text.into() }
    }

    pub fn tag(&self) -> &str {
        match self {
            Step::Add { .. } => "add",
            Step::Multiply { .. } => "multiply",
            Step::Translate { .. } => "translate",
            Step::Fact { .. } => "fact",
            Step::Other { tag } => tag,
        }
    }

    /// Decode one descriptor. Unknown tags become `Step::Other`.
    pub fn from_value(value: Value) -> Result<Self> {
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| AgentError::InvalidStep("missing string field \"type\"".to_string()))?
            .to_string();

        match tag.as_str() {
            "add" | "multiply" | "translate" | "fact" => Ok(serde_json::from_value(value)?),
            _ => Ok(Step::Other { tag }),
        }
    }
}

/// Decode a JSON array of descriptors
pub fn parse_plan(json: &str) -> Result<Vec<Step>> {
    let values: Vec<Value> = serde_json::from_str(json)?;
    if values.is_empty() {
        return Err(AgentError::InvalidStep("plan has no steps".to_string()));
    }
    values.into_iter().map(Step::from_value).collect()
}

fn number_pair(re: &Regex, text: &str) -> Option<(f64, f64)> {
    let caps = re.captures(text)?;
    let a = caps[1].parse().ok()?;
    let b = caps[2].parse().ok()?;
    Some((a, b))
}

fn detect_translate(lower: &str) -> Option<Step> {
    TRANSLATE
        .captures(lower)
        .map(|caps| Step::translate(&caps[1]))
}

fn detect_add(lower: &str) -> Option<Step> {
    number_pair(&ADD, lower).map(|(a, b)| Step::Add { a, b })
}

fn detect_multiply(lower: &str) -> Option<Step> {
    number_pair(&MULTIPLY, lower).map(|(a, b)| Step::Multiply { a, b })
}

fn detect_capital(lower: &str) -> Option<Step> {
    CAPITAL_OF
        .captures(lower)
        .map(|caps| Step::fact(format!("What is the capital of {}?", &caps[1])))
}

fn detect_earth_mars(lower: &str) -> Option<Step> {
    lower
        .contains(EARTH_MARS)
        .then(|| Step::fact("What is the distance between Earth and Mars?"))
}

/// Rules in priority order
const RULES: &[fn(&str) -> Option<Step>] = &[
    detect_translate,
    detect_add,
    detect_multiply,
    detect_capital,
    detect_earth_mars,
];

/// Turn a free-form request into an ordered, non-empty list of steps
pub fn detect_steps(request: &str) -> Vec<Step> {
    let trimmed = request.trim();
    let lower = trimmed.to_lowercase();

    let mut steps: Vec<Step> = RULES.iter().filter_map(|rule| rule(&lower)).collect();

    if steps.is_empty() {
        steps.push(Step::fact(trimmed));
    }

    debug!(
        "◆ DETECTED {} STEP(S): {:?}",
        steps.len(),
        steps.iter().map(Step::tag).collect::<Vec<_>>()
    );
    steps
}
