//! Step execution and short-term memory
//!
//! Runs each step once, in order, against its capability. Results land in a
//! per-request `Memory` keyed `step{N}`; the rendered output is the transcript
//! followed by a summary of memory sorted by key.

use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

use crate::format::format_general;
use crate::knowledge::Knowledge;
use crate::steps::Step;
use crate::tools::{add, multiply, translate_en_to_de};

/// System prompt for Level 3 knowledge lookups
pub const SYSTEM_PROMPT: &str = "You are an agent that completes multi-step tasks by describing each step and keeping a brief memory.";

/// A computed step result
#[derive(Debug, Clone, PartialEq)]
pub enum StepValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for StepValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepValue::Number(n) => f.write_str(&format_general(*n)),
            StepValue::Text(s) => f.write_str(s),
        }
    }
}

/// Results keyed by step identifier.
///
/// Keys are strings, so iteration is lexicographic: `step1`, `step10`,
/// `step2`. The summary relies on that order.
#[derive(Debug, Clone, Default)]
pub struct Memory {
    entries: BTreeMap<String, StepValue>,
}

impl Memory {
    pub fn key_for(index: usize) -> String {
        format!("step{}", index)
    }

    pub fn insert(&mut self, index: usize, value: StepValue) {
        self.entries.insert(Self::key_for(index), value);
    }

    pub fn get(&self, key: &str) -> Option<&StepValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `- {key}: {value}` lines in key order
    pub fn summary_lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(key, value)| format!("- {}: {}", key, value))
            .collect()
    }
}

/// Outcome of one request: transcript plus memory
#[derive(Debug, Clone, Default)]
pub struct Execution {
    pub transcript: Vec<String>,
    pub memory: Memory,
}

impl Execution {
    /// Transcript, blank line, `Summary:`, memory lines
    pub fn render(&self) -> String {
        let mut lines = self.transcript.clone();
        lines.push("\nSummary:".to_string());
        lines.extend(self.memory.summary_lines());
        lines.join("\n")
    }
}

pub struct StepExecutor<'a> {
    knowledge: &'a dyn Knowledge,
    system_prompt: &'a str,
}

impl<'a> StepExecutor<'a> {
    pub fn new(knowledge: &'a dyn Knowledge) -> Self {
        Self {
            knowledge,
            system_prompt: SYSTEM_PROMPT,
        }
    }

    /// Run every step and keep the raw transcript and memory
    pub async fn execute(&self, steps: &[Step]) -> Execution {
        let mut execution = Execution::default();

        for (offset, step) in steps.iter().enumerate() {
            let idx = offset + 1;
            debug!("◆ STEP {}: {}", idx, step.tag());

            let line = match step {
                Step::Add { a, b } => {
                    let result = add(*a, *b);
                    execution.memory.insert(idx, StepValue::Number(result));
                    format!(
                        "Step {}: Add {} and {} -> {}",
                        idx,
                        format_general(*a),
                        format_general(*b),
                        format_general(result)
                    )
                }
                Step::Multiply { a, b } => {
                    let result = multiply(*a, *b);
                    execution.memory.insert(idx, StepValue::Number(result));
                    format!(
                        "Step {}: Multiply {} and {} -> {}",
                        idx,
                        format_general(*a),
                        format_general(*b),
                        format_general(result)
                    )
                }
                Step::Translate { text } => {
                    let result = translate_en_to_de(text);
                    let line = format!("Step {}: Translate '{}' to German -> {}", idx, text, result);
                    execution.memory.insert(idx, StepValue::Text(result));
                    line
                }
                Step::Fact { question } => {
                    match self.knowledge.ask(self.system_prompt, question).await {
                        Ok(result) => {
                            let line = format!(
                                "Step {}: LLM fact lookup: '{}' -> {}",
                                idx, question, result
                            );
                            execution.memory.insert(idx, StepValue::Text(result));
                            line
                        }
                        Err(e) => {
                            warn!("◆ STEP {} FAILED: {}", idx, e);
                            format!(
                                "Step {}: LLM fact lookup: '{}' failed: {}",
                                idx, question, e
                            )
                        }
                    }
                }
                Step::Other { tag } => {
                    format!("Step {}: Unknown step type '{}' (skipped).", idx, tag)
                }
            };

            execution.transcript.push(line);
        }

        execution
    }

    /// Run every step and render transcript plus summary
    pub async fn run(&self, steps: &[Step]) -> String {
        self.execute(steps).await.render()
    }
}
