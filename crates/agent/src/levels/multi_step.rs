//! Level 3: multi-step agent

use async_trait::async_trait;

use stepwise_config::Config;

use super::Responder;
use crate::executor::{Execution, StepExecutor};
use crate::knowledge::{select_knowledge, Knowledge, LocalKnowledge};
use crate::steps::{detect_steps, Step};

pub const BANNER: &str = "Level 3 — Full Agent (type 'exit' to quit)";

pub struct StepResponder {
    knowledge: Box<dyn Knowledge>,
}

impl StepResponder {
    pub fn new(knowledge: Box<dyn Knowledge>) -> Self {
        Self { knowledge }
    }

    /// Remote answers at this level carry no fallback marker
    pub fn from_config(config: &Config) -> Self {
        Self::new(select_knowledge(config, LocalKnowledge::level3(), None))
    }

    pub async fn execute(&self, steps: &[Step]) -> Execution {
        StepExecutor::new(self.knowledge.as_ref())
            .execute(steps)
            .await
    }

    pub async fn run_steps(&self, steps: &[Step]) -> String {
        self.execute(steps).await.render()
    }
}

#[async_trait]
impl Responder for StepResponder {
    fn level(&self) -> u8 {
        3
    }

    fn banner(&self) -> &str {
        BANNER
    }

    async fn respond(&self, query: &str) -> String {
        let steps = detect_steps(query);
        self.run_steps(&steps).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_capital_then_translate() {
        let responder = StepResponder::new(Box::new(LocalKnowledge::level3()));
        let reply = responder
            .respond("Translate 'good morning' into German and tell me the capital of Italy")
            .await;

        assert_eq!(
            reply,
            "Step 1: Translate 'good morning' to German -> Guten Morgen\n\
             Step 2: LLM fact lookup: 'What is the capital of italy?' -> Rome\n\
             \n\
             Summary:\n\
             - step1: Guten Morgen\n\
             - step2: Rome"
        );
    }

    #[test]
    fn test_level_and_banner() {
        let responder = StepResponder::new(Box::new(LocalKnowledge::level3()));
        assert_eq!(responder.level(), 3);
        assert!(responder.banner().starts_with("Level 3"));
    }
}
