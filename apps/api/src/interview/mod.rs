// Interview core: prompt building, response parsing, and orchestration.
// All model calls go through llm_client.

pub mod handlers;
pub mod models;
pub mod parser;
pub mod prompts;
pub mod service;
