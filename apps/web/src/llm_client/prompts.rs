// Shared prompt fragments. Each service that calls the model keeps its own
// prompts.rs alongside it and reuses these.

/// Closing instruction for every prompt that expects a JSON answer.
pub const JSON_ONLY_INSTRUCTION: &str = "Provide ONLY valid JSON, no additional text.";
