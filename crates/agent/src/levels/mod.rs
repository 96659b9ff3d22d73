//! Level responders
//!
//! Each level turns one trimmed query into one reply. The interactive loop
//! only sees the `Responder` trait.

use async_trait::async_trait;

mod calculator;
mod chat;
mod multi_step;

pub use calculator::{is_mixed_query, looks_like_math, CalculatorResponder};
pub use chat::{is_direct_math, ChatResponder};
pub use multi_step::StepResponder;

#[async_trait]
pub trait Responder: Send + Sync {
    /// Tutorial level, 1 to 3
    fn level(&self) -> u8;

    /// Line printed when a session starts
    fn banner(&self) -> &str;

    async fn respond(&self, query: &str) -> String;
}
