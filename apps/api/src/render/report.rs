//! Results view model: a total, pure mapping from `AnalysisResult` to the
//! fixed report layout. The HTML writer and the JSON API both consume it.

use serde::Serialize;

use crate::models::analysis::{AnalysisResult, PlagiarismCheck, RiskStatus};

pub const GREEN: &str = "#22c55e";
pub const AMBER: &str = "#eab308";
pub const RED: &str = "#ef4444";
const TRACK: &str = "#f3f4f6";

/// Gauge ring radius in SVG user units.
pub const GAUGE_RADIUS: f64 = 70.0;

pub const NO_FEEDBACK: &str = "No feedback available.";
pub const ORIGINALITY_NOTE: &str = "This is an AI assessment of originality, cliché usage, \
    and generic structure. It does not check against private UCAS databases or the internet.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent, // ≥ 80
    Good,      // 60 – 79
    NeedsWork, // < 60
}

impl ScoreBand {
    pub fn from_score(score: u32) -> Self {
        if score >= 80 {
            ScoreBand::Excellent
        } else if score >= 60 {
            ScoreBand::Good
        } else {
            ScoreBand::NeedsWork
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => GREEN,
            ScoreBand::Good => AMBER,
            ScoreBand::NeedsWork => RED,
        }
    }

    pub fn caption(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent work! Only minor tweaks needed.",
            ScoreBand::Good => "Good foundation, but needs refinement.",
            ScoreBand::NeedsWork => {
                "Significant improvements required for a competitive application."
            }
        }
    }
}

/// Banner palette for the originality card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Green,
    Amber,
    Red,
}

impl Tone {
    pub fn css_class(&self) -> &'static str {
        match self {
            Tone::Green => "tone-green",
            Tone::Amber => "tone-amber",
            Tone::Red => "tone-red",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gauge {
    pub score: u32,
    pub remaining: u32,
    pub band: ScoreBand,
    pub color: &'static str,
    pub track_color: &'static str,
    pub caption: &'static str,
    /// Stroke length of the filled arc, for an SVG `stroke-dasharray`.
    pub arc_length: f64,
    pub circumference: f64,
}

impl Gauge {
    pub fn new(score: u32) -> Self {
        let band = ScoreBand::from_score(score);
        let filled = score.min(100);
        let circumference = 2.0 * std::f64::consts::PI * GAUGE_RADIUS;
        Self {
            score,
            remaining: 100 - filled,
            band,
            color: band.color(),
            track_color: TRACK,
            caption: band.caption(),
            arc_length: circumference * f64::from(filled) / 100.0,
            circumference,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OriginalityBanner {
    pub status: &'static str,
    pub tone: Tone,
    pub risk_score: Option<u32>,
    pub feedback: String,
    pub note: &'static str,
}

impl OriginalityBanner {
    /// A missing check degrades to "Low Risk" with no feedback rather than failing.
    /// `parse_analysis` always supplies one today; the fallback covers providers
    /// whose schema leaves the check optional.
    pub fn from_check(check: Option<&PlagiarismCheck>) -> Self {
        let status = check.map(|c| c.status).unwrap_or(RiskStatus::Low);
        let tone = match status {
            RiskStatus::High => Tone::Red,
            RiskStatus::Moderate => Tone::Amber,
            RiskStatus::Low => Tone::Green,
        };
        let feedback = check
            .map(|c| c.feedback.trim())
            .filter(|f| !f.is_empty())
            .unwrap_or(NO_FEEDBACK)
            .to_string();

        Self {
            status: status.label(),
            tone,
            risk_score: check.map(|c| c.risk_score),
            feedback,
            note: ORIGINALITY_NOTE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackCard {
    pub title: &'static str,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberedTip {
    pub number: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub gauge: Gauge,
    pub summary: String,
    pub originality: OriginalityBanner,
    pub categories: Vec<FeedbackCard>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub tips: Vec<NumberedTip>,
}

pub fn build_report(result: &AnalysisResult) -> ReportView {
    ReportView {
        gauge: Gauge::new(result.score),
        summary: result.summary.clone(),
        originality: OriginalityBanner::from_check(Some(&result.plagiarism_check)),
        categories: vec![
            FeedbackCard {
                title: "Structure",
                body: result.structure_feedback.clone(),
            },
            FeedbackCard {
                title: "Content",
                body: result.content_feedback.clone(),
            },
            FeedbackCard {
                title: "Style",
                body: result.style_tone_feedback.clone(),
            },
        ],
        strengths: result.key_strengths.clone(),
        improvements: result.key_improvements.clone(),
        tips: result
            .actionable_tips
            .iter()
            .enumerate()
            .map(|(i, text)| NumberedTip {
                number: i + 1,
                text: text.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::fixtures::sample_result;

    #[test]
    fn test_score_72_is_amber_good_foundation() {
        let view = build_report(&sample_result(72, RiskStatus::Moderate));
        assert_eq!(view.gauge.band, ScoreBand::Good);
        assert_eq!(view.gauge.color, AMBER);
        assert_eq!(view.gauge.caption, "Good foundation, but needs refinement.");
        assert_eq!(view.gauge.remaining, 28);
        assert_eq!(view.originality.status, "Moderate Risk");
        assert_eq!(view.originality.tone, Tone::Amber);
    }

    #[test]
    fn test_score_85_is_green_excellent() {
        let gauge = Gauge::new(85);
        assert_eq!(gauge.color, GREEN);
        assert_eq!(gauge.caption, "Excellent work! Only minor tweaks needed.");
    }

    #[test]
    fn test_score_40_is_red_significant_improvements() {
        let gauge = Gauge::new(40);
        assert_eq!(gauge.color, RED);
        assert_eq!(
            gauge.caption,
            "Significant improvements required for a competitive application."
        );
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(ScoreBand::from_score(80), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(79), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(60), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(59), ScoreBand::NeedsWork);
        assert_eq!(ScoreBand::from_score(0), ScoreBand::NeedsWork);
        assert_eq!(ScoreBand::from_score(100), ScoreBand::Excellent);
    }

    #[test]
    fn test_gauge_arc_is_proportional() {
        let full = Gauge::new(100);
        assert!((full.arc_length - full.circumference).abs() < 1e-9);
        assert_eq!(Gauge::new(0).arc_length, 0.0);
        let half = Gauge::new(50);
        assert!((half.arc_length * 2.0 - half.circumference).abs() < 1e-9);
    }

    #[test]
    fn test_originality_tones() {
        for (status, tone) in [
            (RiskStatus::Low, Tone::Green),
            (RiskStatus::Moderate, Tone::Amber),
            (RiskStatus::High, Tone::Red),
        ] {
            let view = build_report(&sample_result(70, status));
            assert_eq!(view.originality.tone, tone);
            assert_eq!(view.originality.status, status.label());
        }
    }

    #[test]
    fn test_missing_originality_check_degrades() {
        let banner = OriginalityBanner::from_check(None);
        assert_eq!(banner.status, "Low Risk");
        assert_eq!(banner.tone, Tone::Green);
        assert_eq!(banner.feedback, NO_FEEDBACK);
        assert_eq!(banner.risk_score, None);
    }

    #[test]
    fn test_blank_originality_feedback_degrades() {
        let mut result = sample_result(70, RiskStatus::High);
        result.plagiarism_check.feedback = "  ".to_string();
        let view = build_report(&result);
        assert_eq!(view.originality.feedback, NO_FEEDBACK);
        assert_eq!(view.originality.status, "High Risk");
    }

    #[test]
    fn test_layout_order_and_numbering() {
        let result = sample_result(72, RiskStatus::Low);
        let view = build_report(&result);
        let titles: Vec<_> = view.categories.iter().map(|c| c.title).collect();
        assert_eq!(titles, ["Structure", "Content", "Style"]);
        assert_eq!(view.categories[2].body, result.style_tone_feedback);
        assert_eq!(view.strengths, result.key_strengths);
        assert_eq!(view.improvements, result.key_improvements);
        assert_eq!(view.tips[0].number, 1);
        assert_eq!(view.tips[1].number, 2);
        assert_eq!(view.tips[1].text, result.actionable_tips[1]);
    }

    #[test]
    fn test_build_report_is_idempotent_and_non_mutating() {
        let result = sample_result(61, RiskStatus::Low);
        let before = result.clone();
        assert_eq!(build_report(&result), build_report(&result));
        assert_eq!(result, before);
    }
}
