//! Knowledge capability
//!
//! Answers open questions. `RemoteKnowledge` forwards to a hosted model and
//! degrades to a `LocalKnowledge` table on any failure; `LocalKnowledge` is
//! used directly when no credential is configured.

use async_trait::async_trait;
use tracing::{debug, warn};

use stepwise_config::Config;
use stepwise_provider::{ChatParams, OpenAiProvider, Provider};

/// Prefix Levels 1 and 2 put on answers produced after a remote failure
pub const FALLBACK_PREFIX: &str = "[LLM Error / fallback mock] ";

#[async_trait]
pub trait Knowledge: Send + Sync {
    async fn ask(&self, system_prompt: &str, user_prompt: &str) -> crate::Result<String>;
}

/// Canned answers matched by case-insensitive substring
#[derive(Debug, Clone)]
pub struct LocalKnowledge {
    entries: Vec<(String, String)>,
    default_answer: String,
}

impl LocalKnowledge {
    pub fn new(default_answer: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            default_answer: default_answer.into(),
        }
    }

    /// Add an entry; earlier entries win
    pub fn with_entry(mut self, needle: impl Into<String>, answer: impl Into<String>) -> Self {
        self.entries
            .push((needle.into().to_lowercase(), answer.into()));
        self
    }

    pub fn answer(&self, prompt: &str) -> String {
        let lower = prompt.to_lowercase();
        self.entries
            .iter()
            .find(|(needle, _)| lower.contains(needle.as_str()))
            .map(|(_, answer)| answer.clone())
            .unwrap_or_else(|| self.default_answer.clone())
    }

    /// Level 1 table: every answer is a numbered reasoning block
    pub fn level1() -> Self {
        Self::new(format_step_by_step(
            &[
                "Identify the core question.",
                "Recall relevant facts.",
                "Synthesize a concise, structured answer.",
            ],
            "Here is a clear, structured answer to your question.",
        ))
        .with_entry(
            "colors in a rainbow",
            format_step_by_step(
                &[
                    "Recall the acronym VIBGYOR.",
                    "List each color from longest to shortest wavelength.",
                    "Provide a brief reason it's seen in that order.",
                ],
                "- Violet\n- Indigo\n- Blue\n- Green\n- Yellow\n- Orange\n- Red",
            ),
        )
        .with_entry(
            "why the sky is blue",
            format_step_by_step(
                &[
                    "Sunlight contains many wavelengths.",
                    "Air molecules scatter shorter wavelengths more efficiently (Rayleigh scattering).",
                    "Blue light (shorter wavelength) is scattered across the sky and reaches our eyes.",
                ],
                "Because shorter wavelengths (blue) scatter more in the atmosphere (Rayleigh scattering).",
            ),
        )
        .with_entry(
            "which planet is the hottest",
            format_step_by_step(
                &[
                    "Compare average surface temperatures of planets.",
                    "Note that Venus has a runaway greenhouse effect.",
                    "Conclude the hottest planet is Venus.",
                ],
                "Venus is the hottest planet in our solar system due to an extreme greenhouse effect.",
            ),
        )
    }

    pub fn level2() -> Self {
        Self::new("Answer: Here is a concise answer.")
            .with_entry("capital of france", "Answer: Paris")
    }

    pub fn level3() -> Self {
        Self::new("Here is a concise answer.")
            .with_entry("capital of italy", "Rome")
            .with_entry(
                "distance between earth and mars",
                "It varies widely (about 54.6 million km at closest to over 400 million km).",
            )
    }
}

#[async_trait]
impl Knowledge for LocalKnowledge {
    async fn ask(&self, _system_prompt: &str, user_prompt: &str) -> crate::Result<String> {
        Ok(self.answer(user_prompt))
    }
}

/// Render a numbered reasoning list followed by the final answer
pub fn format_step_by_step(steps: &[&str], final_answer: &str) -> String {
    let mut lines = vec!["Step-by-step reasoning:".to_string()];
    for (i, step) in steps.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, step));
    }
    lines.push("—".to_string());
    lines.push(format!("Answer: {}", final_answer));
    lines.join("\n")
}

/// Hosted model with a local safety net
pub struct RemoteKnowledge<P: Provider> {
    provider: P,
    model: String,
    temperature: f32,
    fallback: LocalKnowledge,
    error_prefix: Option<&'static str>,
}

impl<P: Provider> RemoteKnowledge<P> {
    pub fn new(provider: P, fallback: LocalKnowledge) -> Self {
        let model = provider.default_model();
        Self {
            provider,
            model,
            temperature: 0.2,
            fallback,
            error_prefix: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Mark answers produced after a remote failure
    pub fn with_error_prefix(mut self, prefix: &'static str) -> Self {
        self.error_prefix = Some(prefix);
        self
    }

    fn fallback_answer(&self, user_prompt: &str) -> String {
        let answer = self.fallback.answer(user_prompt);
        match self.error_prefix {
            Some(prefix) => format!("{}{}", prefix, answer),
            None => answer,
        }
    }
}

#[async_trait]
impl<P: Provider> Knowledge for RemoteKnowledge<P> {
    async fn ask(&self, system_prompt: &str, user_prompt: &str) -> crate::Result<String> {
        let params = ChatParams::prompt(&self.model, system_prompt, user_prompt)
            .with_temperature(self.temperature);

        debug!("◆ ASKING {} ({} chars)", self.model, user_prompt.len());

        match self.provider.chat(params).await {
            Ok(response) => match response.trimmed_content() {
                Some(text) => Ok(text.to_string()),
                None => {
                    warn!("◆ EMPTY MODEL RESPONSE, USING LOCAL ANSWER");
                    Ok(self.fallback_answer(user_prompt))
                }
            },
            Err(e) => {
                warn!("◆ MODEL CALL FAILED, USING LOCAL ANSWER: {}", e);
                Ok(self.fallback_answer(user_prompt))
            }
        }
    }
}

/// Pick the knowledge backend once, from configuration
pub fn select_knowledge(
    config: &Config,
    local: LocalKnowledge,
    error_prefix: Option<&'static str>,
) -> Box<dyn Knowledge> {
    match &config.api_key {
        Some(key) => {
            debug!("◆ REMOTE KNOWLEDGE VIA {}", config.api_base);
            let provider = OpenAiProvider::new(
                key.clone(),
                Some(config.api_base.clone()),
                Some(config.model.clone()),
            );
            let remote = RemoteKnowledge::new(provider, local)
                .with_temperature(config.temperature);
            match error_prefix {
                Some(prefix) => Box::new(remote.with_error_prefix(prefix)),
                None => Box::new(remote),
            }
        }
        None => {
            debug!("◆ NO CREDENTIAL, LOCAL KNOWLEDGE ONLY");
            Box::new(local)
        }
    }
}
