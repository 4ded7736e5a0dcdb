//! Candidate records produced by the generators.
//!
//! A candidate wraps a [`PositionRecord`] with the justification for
//! showing it: a human-readable reason, a priority tier, and a
//! category-specific payload. The payload is a tagged variant so that
//! mistake-only fields (judgment, evaluation) and shift-only fields
//! (evaluation change) cannot leak into foreign categories.

use serde::{Deserialize, Serialize};

use crate::record::{GamePhase, MoveJudgment, PositionRecord};

/// Analytical priority with a strict total order: critical > high > medium.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    #[display("medium")]
    Medium,
    #[display("high")]
    High,
    #[display("critical")]
    Critical,
}

/// Which generator family produced a candidate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum CandidateCategory {
    #[display("transition")]
    Transition,
    #[display("mistake")]
    Mistake,
    #[display("evaluation")]
    Evaluation,
    #[display("strategic")]
    Strategic,
}

/// Descriptive tag for the renderer; not used in ranking.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    #[display("tactical")]
    Tactical,
    #[display("positional")]
    Positional,
    #[display("strategic")]
    Strategic,
}

/// Category-specific candidate payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum CandidateKind {
    Transition {
        from: GamePhase,
        to: GamePhase,
    },
    Mistake {
        judgment: MoveJudgment,
        evaluation: Option<f64>,
    },
    #[serde(rename = "evaluation")]
    EvaluationShift {
        /// Absolute material delta that triggered the candidate.
        change: f64,
    },
    Strategic,
}

impl CandidateKind {
    #[must_use]
    pub fn category(&self) -> CandidateCategory {
        match self {
            Self::Transition { .. } => CandidateCategory::Transition,
            Self::Mistake { .. } => CandidateCategory::Mistake,
            Self::EvaluationShift { .. } => CandidateCategory::Evaluation,
            Self::Strategic => CandidateCategory::Strategic,
        }
    }

    #[must_use]
    pub fn analysis_type(&self) -> AnalysisType {
        match self {
            Self::Transition { .. } => AnalysisType::Positional,
            Self::Mistake { .. } | Self::EvaluationShift { .. } => AnalysisType::Tactical,
            Self::Strategic => AnalysisType::Strategic,
        }
    }
}

/// A position selected by a generator, with its justification attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub position: PositionRecord,
    pub reason: String,
    pub priority: PriorityTier,
    #[serde(flatten)]
    pub kind: CandidateKind,
}

impl Candidate {
    #[must_use]
    pub fn category(&self) -> CandidateCategory {
        self.kind.category()
    }

    #[must_use]
    pub fn analysis_type(&self) -> AnalysisType {
        self.kind.analysis_type()
    }

    /// The deduplication identity key.
    #[must_use]
    pub fn board_state(&self) -> &str {
        &self.position.board_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_total_order() {
        assert!(PriorityTier::Critical > PriorityTier::High);
        assert!(PriorityTier::High > PriorityTier::Medium);
        let mut tiers = vec![
            PriorityTier::Medium,
            PriorityTier::Critical,
            PriorityTier::High,
        ];
        tiers.sort();
        assert_eq!(
            tiers,
            vec![
                PriorityTier::Medium,
                PriorityTier::High,
                PriorityTier::Critical
            ]
        );
    }

    #[test]
    fn test_kind_category_and_analysis_type() {
        let kind = CandidateKind::Transition {
            from: GamePhase::Opening,
            to: GamePhase::Middlegame,
        };
        assert_eq!(kind.category(), CandidateCategory::Transition);
        assert_eq!(kind.analysis_type(), AnalysisType::Positional);

        let kind = CandidateKind::Mistake {
            judgment: MoveJudgment::Blunder,
            evaluation: Some(-3.2),
        };
        assert_eq!(kind.category(), CandidateCategory::Mistake);
        assert_eq!(kind.analysis_type(), AnalysisType::Tactical);

        assert_eq!(
            CandidateKind::Strategic.category(),
            CandidateCategory::Strategic
        );
    }

    #[test]
    fn test_kind_serialization_tags() {
        let json = serde_json::to_value(CandidateKind::EvaluationShift { change: 3.0 }).unwrap();
        assert_eq!(json["category"], "evaluation");
        assert_eq!(json["change"], 3.0);

        let json = serde_json::to_value(CandidateKind::Strategic).unwrap();
        assert_eq!(json["category"], "strategic");
    }
}
