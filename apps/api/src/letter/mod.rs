// Cover letter generation.
// Prompt → completion → salutation/closing extraction → letterhead → wrap → sink.
// All model calls go through llm_client.

pub mod extract;
pub mod generator;
pub mod handlers;
pub mod letterhead;
pub mod prompts;
pub mod resume;

pub use generator::{LetterDocument, LetterService};
pub use letterhead::ApplicantProfile;
