// All LLM prompt constants for statement analysis.
// Reuses the JSON-only fragment from llm_client::prompts.

/// Analysis prompt template.
/// Replace: {subject}, {university_clause}, {max_chars}, {max_lines},
///          {json_only_instruction}, {statement}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an expert Senior UCAS Admissions Tutor with 20 years of experience at top UK universities.
Analyze the following personal statement for a student applying to study {subject}{university_clause}.

The UCAS personal statement limit is {max_chars} characters or {max_lines} lines.

Evaluate it based on:
1. **Academic Suitability (70%):** Evidence of interest, understanding of the subject, and critical thinking.
2. **Transferable Skills (20%):** Extra-curriculars, work experience, but ONLY how they relate to the course.
3. **Structure & Style (10%):** Clarity, grammar, flow, and avoiding clichés.
4. **Originality & Integrity:** Check for overused clichés, generic phrases, or content that looks like a copied template.

Be critical but constructive. Focus on "Show, Don't Tell".

{json_only_instruction}

Personal Statement:
"{statement}""#;

// Field descriptions sent with the response schema.

pub const SCORE_DESCRIPTION: &str =
    "A score out of 100 representing the quality of the statement.";
pub const SUMMARY_DESCRIPTION: &str =
    "A 2-3 sentence executive summary of the statement's quality.";
pub const STRUCTURE_DESCRIPTION: &str =
    "Specific feedback on the paragraphing, flow, and introduction/conclusion.";
pub const CONTENT_DESCRIPTION: &str = "Feedback on the academic content, evidence of \
    super-curricular engagement, and relevance.";
pub const STYLE_DESCRIPTION: &str =
    "Feedback on vocabulary, grammar, spelling, and enthusiasm.";
pub const RISK_SCORE_DESCRIPTION: &str =
    "0-100 probability score. Higher means more generic/clichéd/unoriginal.";
pub const STATUS_DESCRIPTION: &str =
    "Exactly one of: 'Low Risk', 'Moderate Risk', 'High Risk'";
pub const ORIGINALITY_FEEDBACK_DESCRIPTION: &str =
    "Feedback on the originality of the phrasing and use of generic templates.";
pub const STRENGTHS_DESCRIPTION: &str = "List of 3-4 specific things the student did well.";
pub const IMPROVEMENTS_DESCRIPTION: &str = "List of 3-4 major weaknesses to address.";
pub const TIPS_DESCRIPTION: &str =
    "Concrete, step-by-step instructions on what to change immediately.";
