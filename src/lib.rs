//! Kelp - conversational night-out planner library
//!
//! Kelp turns a described outing (vibe, location, budget, time, group size)
//! into a structured multi-stop plan called a flow, then lets the user refine
//! it through chat turns that may replace the plan.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `flow`: Preferences, flows, messages, and normalization of model output
//! - `planner`: Itinerary generation, refinement, and session state
//! - `prompts`: Instructions and declared response shapes
//! - `providers`: Hosted model abstraction and implementations (Gemini, Ollama)
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//! - `commands`: Command handlers and terminal rendering
//!
//! # Example
//!
//! ```no_run
//! use kelp::planner::{PlannerSession, SessionContext};
//! use kelp::providers::create_provider;
//! use kelp::{Config, UserPreferences};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let provider = create_provider(&config.provider.provider_type, &config.provider)?;
//!     let mut session = PlannerSession::new(Arc::from(provider), &config, SessionContext::guest());
//!     let flow = session.start(&UserPreferences::new("Austin", "live music, low key")).await?;
//!     println!("{}", flow.title);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod flow;
pub mod planner;
pub mod prompts;
pub mod providers;

// Re-export commonly used types
pub use config::Config;
pub use error::{KelpError, Result};
pub use flow::{Flow, FlowStop, Message, UserPreferences};
pub use planner::{PlannerSession, SessionContext};

#[cfg(test)]
pub mod test_utils;
