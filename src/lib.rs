//! Tarantino: documentary writing wizard
//!
//! Turns story answers, interview transcripts and footage notes into structured
//! documentary artifacts by prompting a text-generation model, recovering the JSON
//! payload from its reply and persisting each phase's result.

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod lifecycle;
pub mod logging;
pub mod project;
pub mod prompts;
pub mod provider;
pub mod store;
