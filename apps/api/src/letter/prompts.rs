// Prompt text for cover letter generation.

/// Opens the prompt; the résumé follows in quotes.
pub const RESUME_PREAMBLE: &str = "I need a high quality cover letter. Before writing it, \
    read my résumé below and learn it:";

/// Placed between the résumé and the job description.
pub const LETTER_INSTRUCTION: &str = "Here is the job description. Write the final cover letter \
    I can send as is. Never claim a qualification the résumé does not support, \
    and do not leave placeholders of any kind.";

/// Builds the completion prompt: instruction, résumé verbatim, then the job description.
pub fn build_prompt(resume: &str, job_description: &str) -> String {
    format!("{RESUME_PREAMBLE}\n\"{resume}\"\n\n{LETTER_INSTRUCTION}\n\n{job_description}")
}
