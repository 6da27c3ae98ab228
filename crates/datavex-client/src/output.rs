use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Minimum per-axis score a draft must reach to pass a quality gate.
pub const QUALITY_GATE_THRESHOLD: f64 = 7.0;

/// Metadata recorded for one pipeline run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Keyword the run was started with.
    pub keyword: String,
    /// Backend-side completion timestamp.
    pub timestamp: String,
    pub total_pipeline_duration_seconds: f64,
}

/// Signal the backend selected as the strongest content opportunity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidateSignal {
    pub title: String,
    pub url: String,
    pub date: String,
    pub summary: String,
    pub relevance_score: f64,
}

/// Per-dimension confidence breakdown for the selected signal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignalConfidenceScores {
    pub authority: f64,
    pub recency: f64,
    pub relevance: f64,
    pub novelty: f64,
    pub composite: f64,
}

/// Full report for the signal discovery and validation stages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignalReport {
    pub selected_signal: CandidateSignal,
    pub confidence_scores: SignalConfidenceScores,
    pub validated_facts: Vec<String>,
    pub competitor_angles: Vec<String>,
    pub identified_gaps: Vec<String>,
}

/// Content angle the strategy stage considered and discarded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RejectedAngle {
    pub angle: String,
    pub reason: String,
}

/// Per-platform distribution guidance from the strategy brief.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlatformDistributionPlan {
    pub blog: String,
    pub linkedin: String,
    pub twitter: String,
}

/// Strategy brief produced after SERP analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrategyBrief {
    pub signal_summary: String,
    pub chosen_angle: String,
    pub angle_rationale: String,
    pub rejected_angles: Vec<RejectedAngle>,
    pub competitive_gap_exploited: String,
    pub core_positioning_thesis: String,
    pub platform_distribution_plan: PlatformDistributionPlan,
    pub target_audience: String,
    pub estimated_authority_score: f64,
}

/// Critique scores for one blog draft, one axis per field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlogScores {
    pub hook_strength: f64,
    pub clarity: f64,
    pub authority_tone: f64,
    pub differentiation: f64,
    pub logical_structure: f64,
    pub datavex_brand_fit: f64,
}

impl BlogScores {
    /// Lowest score across all axes.
    pub fn min_score(&self) -> f64 {
        self.hook_strength
            .min(self.clarity)
            .min(self.authority_tone)
            .min(self.differentiation)
            .min(self.logical_structure)
            .min(self.datavex_brand_fit)
    }

    /// Returns `true` when every axis reaches `threshold`.
    pub fn all_pass(&self, threshold: f64) -> bool {
        self.min_score() >= threshold
    }
}

/// One entry of the blog draft/critique evolution log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlogDraftEntry {
    pub draft_number: u32,
    pub draft: String,
    pub scores: BlogScores,
    pub key_changes_made: String,
    #[serde(default)]
    pub score_delta: Option<f64>,
}

/// Final blog asset with its draft evolution history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlogOutput {
    pub final_draft: String,
    pub meta_title: String,
    pub meta_description: String,
    pub evolution_log: Vec<BlogDraftEntry>,
}

/// Critique scores for one short-form draft (LinkedIn or Twitter).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShortFormScores {
    pub hook_density: f64,
    pub platform_native_feel: f64,
    pub engagement_trigger_strength: f64,
    pub shareability: f64,
    pub brand_fit: f64,
}

impl ShortFormScores {
    /// Lowest score across all axes.
    pub fn min_score(&self) -> f64 {
        self.hook_density
            .min(self.platform_native_feel)
            .min(self.engagement_trigger_strength)
            .min(self.shareability)
            .min(self.brand_fit)
    }

    /// Returns `true` when every axis reaches `threshold`.
    pub fn all_pass(&self, threshold: f64) -> bool {
        self.min_score() >= threshold
    }
}

/// One entry of a short-form draft/critique evolution log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShortFormDraftEntry {
    pub draft_number: u32,
    pub draft: String,
    pub scores: ShortFormScores,
    pub key_changes_made: String,
    #[serde(default)]
    pub score_delta: Option<f64>,
}

/// Final LinkedIn asset with its evolution history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkedInOutput {
    pub final_draft: String,
    pub evolution_log: Vec<ShortFormDraftEntry>,
}

/// Final Twitter thread with its evolution history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TwitterOutput {
    pub tweets: Vec<String>,
    pub evolution_log: Vec<ShortFormDraftEntry>,
}

/// Score trajectories per asset across drafts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CritiqueTrace {
    pub blog_scores_by_draft: Vec<BlogScores>,
    pub linkedin_scores_by_draft: Vec<ShortFormScores>,
    pub twitter_scores_by_draft: Vec<ShortFormScores>,
}

/// Outcome of one quality gate check.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GateDecision {
    /// Asset the gate applied to (`blog`, `linkedin`, `twitter`).
    pub asset: String,
    pub gate_passed: bool,
    pub trigger_reason: String,
    pub final_scores: HashMap<String, f64>,
}

/// Complete output of one successful pipeline run.
///
/// Delivered unchanged by the terminal `result` event; the client never
/// rewrites any of these fields. Unknown extra fields from newer backend
/// versions are tolerated and dropped on deserialize.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub run_metadata: RunMetadata,
    pub signal_report: SignalReport,
    pub strategy_brief: StrategyBrief,
    pub blog: BlogOutput,
    pub linkedin: LinkedInOutput,
    pub twitter_thread: TwitterOutput,
    pub critique_trace: CritiqueTrace,
    pub quality_gate_log: Vec<GateDecision>,
}
