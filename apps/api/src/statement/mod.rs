// Statement analysis: input validation, request building, and the provider-backed analyzer.
// All LLM calls go through llm_client; no direct provider calls here.

pub mod analyzer;
pub mod handlers;
pub mod prompts;
pub mod request;
pub mod validation;
