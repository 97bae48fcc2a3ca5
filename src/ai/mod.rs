//! AI Module
//!
//! One-shot language-model access: a thin chat-completions client and the
//! orchestrator that turns named actions into fetch → summarize → prompt
//! → single model call pipelines.

mod client;
mod orchestrator;

pub use client::ModelClient;
pub use orchestrator::{run, Action, SYSTEM_PROMPT};
