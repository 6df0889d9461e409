use std::fmt;

use serde::{Deserialize, Serialize};

/// Raw form input as submitted by the student. Missing fields decode as
/// empty so the validator, not the extractor, reports them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserInput {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub university: Option<String>,
    #[serde(default)]
    pub statement: String,
}

impl UserInput {
    /// Target institution, if one was actually entered.
    pub fn university(&self) -> Option<&str> {
        self.university
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }
}

/// Originality band reported by the provider. Only these three strings are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskStatus {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Moderate Risk")]
    Moderate,
    #[serde(rename = "High Risk")]
    High,
}

impl RiskStatus {
    pub const ALL: [RiskStatus; 3] = [RiskStatus::Low, RiskStatus::Moderate, RiskStatus::High];

    pub fn label(&self) -> &'static str {
        match self {
            RiskStatus::Low => "Low Risk",
            RiskStatus::Moderate => "Moderate Risk",
            RiskStatus::High => "High Risk",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

impl fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlagiarismCheck {
    pub risk_score: u32, // 0 – 100, higher = more generic
    pub status: RiskStatus,
    pub feedback: String,
}

/// A completed evaluation. Replaced wholesale on every new analysis, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: u32, // 0 – 100
    pub summary: String,
    pub structure_feedback: String,
    pub content_feedback: String,
    pub style_tone_feedback: String,
    pub plagiarism_check: PlagiarismCheck,
    pub key_strengths: Vec<String>,
    pub key_improvements: Vec<String>,
    pub actionable_tips: Vec<String>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Sample result used across renderer, controller, and route tests.
    pub fn sample_result(score: u32, status: RiskStatus) -> AnalysisResult {
        AnalysisResult {
            score,
            summary: "A sincere statement with a clear interest in the subject.".to_string(),
            structure_feedback: "The introduction is strong but the conclusion trails off."
                .to_string(),
            content_feedback: "Mention the reading you did beyond the syllabus.".to_string(),
            style_tone_feedback: "Tone is enthusiastic; watch for repeated adjectives.".to_string(),
            plagiarism_check: PlagiarismCheck {
                risk_score: 35,
                status,
                feedback: "The opening line is a common cliché.".to_string(),
            },
            key_strengths: vec![
                "Clear motivation".to_string(),
                "Relevant work experience".to_string(),
                "Good use of examples".to_string(),
            ],
            key_improvements: vec![
                "Too much narrative about hobbies".to_string(),
                "Weak conclusion".to_string(),
                "Few super-curricular references".to_string(),
            ],
            actionable_tips: vec![
                "Cut the opening quotation.".to_string(),
                "Add one book you read and what you concluded from it.".to_string(),
            ],
        }
    }
}
