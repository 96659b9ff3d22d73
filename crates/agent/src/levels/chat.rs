//! Level 1: knowledge only, refuses arithmetic

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use stepwise_config::Config;

use super::Responder;
use crate::knowledge::{select_knowledge, Knowledge, LocalKnowledge, FALLBACK_PREFIX};

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant. Always think step-by-step and present a clear, numbered reasoning list followed by a short final answer starting with 'Answer:'. If the user asks for arithmetic like '15 + 23', do NOT compute; instead, politely refuse and suggest using a calculator tool.";

pub const BANNER: &str = "Level 1 — LLM-only assistant (type 'exit' to quit)";

pub const REFUSAL: &str =
    "I can't compute arithmetic in Level 1.\nHint: please use the calculator tool in the next level.";

static MATH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*([-+/*]|\d|\s|what\s+is|add|plus|minus|times|multiply|multiplied|divided|sum|difference|product|quotient)+\?*\s*$",
    )
    .unwrap()
});

/// Whole query is arithmetic: digits, operators and arithmetic words only
pub fn is_direct_math(query: &str) -> bool {
    MATH_PATTERN.is_match(query.trim())
}

pub struct ChatResponder {
    knowledge: Box<dyn Knowledge>,
}

impl ChatResponder {
    pub fn new(knowledge: Box<dyn Knowledge>) -> Self {
        Self { knowledge }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(select_knowledge(
            config,
            LocalKnowledge::level1(),
            Some(FALLBACK_PREFIX),
        ))
    }
}

#[async_trait]
impl Responder for ChatResponder {
    fn level(&self) -> u8 {
        1
    }

    fn banner(&self) -> &str {
        BANNER
    }

    async fn respond(&self, query: &str) -> String {
        if is_direct_math(query) {
            debug!("◆ ARITHMETIC REFUSED");
            return REFUSAL.to_string();
        }

        match self.knowledge.ask(SYSTEM_PROMPT, query).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("◆ KNOWLEDGE FAILED: {}", e);
                format!("{}{}", FALLBACK_PREFIX, LocalKnowledge::level1().answer(query))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_math_detection() {
        assert!(is_direct_math("15 + 23"));
        assert!(is_direct_math("  what is 15 + 23?  "));
        assert!(is_direct_math("ADD 2 plus 3"));
        assert!(is_direct_math("100 divided 4??"));

        assert!(!is_direct_math("What is the capital of France?"));
        assert!(!is_direct_math("why the sky is blue"));
        assert!(!is_direct_math(""));
    }

    #[tokio::test]
    async fn test_refuses_arithmetic() {
        let responder = ChatResponder::new(Box::new(LocalKnowledge::level1()));
        assert_eq!(responder.respond("15 + 23").await, REFUSAL);
    }

    #[tokio::test]
    async fn test_non_math_goes_to_knowledge() {
        let responder = ChatResponder::new(Box::new(LocalKnowledge::level1()));
        let reply = responder.respond("Tell me the colors in a rainbow").await;

        assert!(reply.starts_with("Step-by-step reasoning:\n1. Recall the acronym VIBGYOR."));
        assert!(reply.ends_with("- Orange\n- Red"));
    }
}
