// Prompt fragments shared by every completion call.
// Feature-specific prompts live next to the feature (see letter::prompts).

/// System message sent ahead of every user prompt.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";
