// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Instruction appended to every structured-output prompt.
pub const JSON_ONLY_INSTRUCTION: &str = "Return the response in strictly valid JSON format \
    matching the schema provided. Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";
