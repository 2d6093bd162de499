//! symcheck - AI-assisted symptom checker
//!
//! Serves `POST /api/analyze`, which turns a list of symptoms into possible
//! conditions, a condition into treatment options, or returns the currently
//! trending symptoms, by prompting an OpenAI-compatible chat-completion
//! provider and coercing its reply into a fixed JSON shape.
//!
//! Requests flow through [`pipeline::Analyzer`]: validation, per-client rate
//! limiting, a TTL response cache, prompt construction, the model call, and
//! response parsing.

pub mod agent;
pub mod analysis;
pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod rate_limit;
pub mod store;
