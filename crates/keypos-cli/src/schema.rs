//! JSON shapes exchanged with the outside world.

use keypos_analysis::{
    candidate::{AnalysisType, Candidate, CandidateCategory, CandidateKind, PriorityTier},
    record::{GamePhase, MoveAnnotation, MoveJudgment},
};
use keypos_engine::Color;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One per-ply entry of an external annotation file.
///
/// The judgment is a free-form string so files from evaluators with a
/// richer vocabulary still load; unknown judgments degrade to `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnnotationEntry {
    pub judgment: Option<String>,
    pub evaluation: Option<f64>,
}

impl AnnotationEntry {
    pub fn into_annotation(self, ply: usize) -> MoveAnnotation {
        let judgment = self.judgment.and_then(|raw| {
            let parsed = raw.parse::<MoveJudgment>().ok();
            if parsed.is_none() {
                warn!(ply, judgment = raw, "ignoring unknown move judgment");
            }
            parsed
        });
        MoveAnnotation {
            judgment,
            evaluation: self.evaluation,
        }
    }
}

/// One selected key position, flattened for report consumers.
#[derive(Debug, Clone, Serialize)]
pub struct SelectedPosition {
    pub move_number: u32,
    pub move_notation: String,
    pub board_state: String,
    pub phase: GamePhase,
    pub side_to_move: Color,
    pub reason: String,
    pub priority: PriorityTier,
    pub category: CandidateCategory,
    pub analysis_type: AnalysisType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub judgment: Option<MoveJudgment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation_change: Option<f64>,
}

impl From<&Candidate> for SelectedPosition {
    fn from(candidate: &Candidate) -> Self {
        let (judgment, evaluation, evaluation_change) = match candidate.kind {
            CandidateKind::Mistake {
                judgment,
                evaluation,
            } => (Some(judgment), evaluation, None),
            CandidateKind::EvaluationShift { change } => (None, None, Some(change)),
            CandidateKind::Transition { .. } | CandidateKind::Strategic => (None, None, None),
        };
        Self {
            move_number: candidate.position.move_number,
            move_notation: candidate.position.move_notation.clone(),
            board_state: candidate.position.board_state.clone(),
            phase: candidate.position.phase,
            side_to_move: candidate.position.side_to_move,
            reason: candidate.reason.clone(),
            priority: candidate.priority,
            category: candidate.category(),
            analysis_type: candidate.analysis_type(),
            judgment,
            evaluation,
            evaluation_change,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_judgment_degrades() {
        let entry = AnnotationEntry {
            judgment: Some("dubious".to_string()),
            evaluation: Some(-0.4),
        };
        let annotation = entry.into_annotation(0);
        assert!(annotation.judgment.is_none());
        assert_eq!(annotation.evaluation, Some(-0.4));
    }

    #[test]
    fn test_known_judgment_parses() {
        let entry = AnnotationEntry {
            judgment: Some("blunder".to_string()),
            evaluation: None,
        };
        let annotation = entry.into_annotation(3);
        assert_eq!(annotation.judgment, Some(MoveJudgment::Blunder));
    }
}
