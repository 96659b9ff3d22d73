//! Stepwise agents
//!
//! Three tutorial levels sharing one set of capabilities:
//! a knowledge lookup, a calculator and a toy English to German translator.
//! Level 3 decomposes a request into typed steps and runs them in order.

use thiserror::Error;

pub mod executor;
pub mod format;
pub mod knowledge;
pub mod levels;
pub mod repl;
pub mod steps;
pub mod tools;

pub use executor::{Execution, Memory, StepExecutor, StepValue};
pub use knowledge::{Knowledge, LocalKnowledge, RemoteKnowledge};
pub use levels::{CalculatorResponder, ChatResponder, Responder, StepResponder};
pub use repl::{answer_once, run_session};
pub use steps::{detect_steps, Step};

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("◆ KNOWLEDGE LOOKUP FAILED: {0}")]
    Knowledge(String),

    #[error("◆ INVALID STEP: {0}")]
    InvalidStep(String),

    #[error("◆ MALFORMED PLAN: {0}")]
    Json(#[from] serde_json::Error),

    #[error("◆ DATA LINK ERROR: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AgentError>;
