// Resume-vs-job analysis.
// One model call per request; the answer is schema-checked before anyone sees it.
// All model calls go through llm_client.

pub mod handlers;
pub mod models;
pub mod prompts;
pub mod schema;
pub mod service;
