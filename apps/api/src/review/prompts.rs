// Prompt text for proposal review. Fixed at compile time; nothing at runtime alters it.

use crate::review::models::ReviewRequest;

/// The three review criteria, in the order the model should weigh them.
pub const REVIEW_INSTRUCTIONS: &str = "You are an experienced grant reviewer. \
Evaluate the research proposal below.
1. Assess the clarity and structure of the abstract and objectives.
2. Assess the originality of the proposed research.
3. Assess the feasibility of the objectives and their relevance to the stated problem.";

/// Output contract the parser relies on. One field per line, labels exactly as written.
pub const OUTPUT_FORMAT: &str = "Respond in EXACTLY this format, one field per line, with no other text:
Score: <integer 0-100>
Explanation: <your rationale, on a single line>
Recommendation: <Recommended|Not Recommended>";

/// Model-facing instruction text for one review. Built fresh per request, never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Renders the review prompt. Pure; input text is embedded as-is, even when empty.
pub fn build_prompt(request: &ReviewRequest) -> Prompt {
    Prompt(format!(
        "{REVIEW_INSTRUCTIONS}\n\nAbstract:\n{}\n\nObjectives:\n{}\n\n{OUTPUT_FORMAT}",
        request.abstract_text, request.objectives
    ))
}
