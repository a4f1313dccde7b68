// Review extraction pipeline.
// Flow: validate request → build prompt → one generation call → parse reply → ReviewResult.
// All LLM calls go through llm_client::TextGenerator, never raw HTTP.

pub mod error;
pub mod extractor;
pub mod handlers;
pub mod models;
pub mod parser;
pub mod prompts;

pub use error::ReviewError;
pub use extractor::ReviewExtractor;
