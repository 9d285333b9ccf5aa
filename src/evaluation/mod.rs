//! Evaluation engine.
//!
//! Stateless analytics over a [`CultureProtocol`]:
//!
//! - [`axis`]: six profile vectors (`analyze`)
//! - [`quality`]: seven sub-scores and a weighted overall score
//! - [`compatibility`]: pairwise compatibility, synergy and conflict
//!
//! [`EvaluationEngine`] wraps these functions and keeps an append-only
//! record of the evaluations it has produced.

pub mod axis;
pub mod compatibility;
pub mod keywords;
pub mod quality;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::protocol::CultureProtocol;

pub use axis::{
    AdaptabilityProfile, CognitionStyleProfile, CognitiveStyle, CommunicationStyle,
    CommunicationStyleProfile, CultureEvaluationAxis, DecisionMakingProfile, FeedbackStyle,
    ListeningStyle, RelationshipModelProfile, SocialOrientation, TimeHorizon,
    TimePerceptionProfile, TrustBuildingStyle,
};
pub use compatibility::{CultureCompatibilityMatrix, COMPATIBILITY_WEIGHTS};
pub use quality::{CultureQualityMetrics, QUALITY_WEIGHTS};

/// Sum `values` in ascending order so the result does not depend on the
/// order they were produced in.
pub(crate) fn ordered_sum<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let mut terms: Vec<f64> = values.into_iter().collect();
    terms.sort_by(f64::total_cmp);
    terms.iter().sum()
}

/// Axis and quality of one protocol, computed together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolEvaluation {
    pub protocol_id: String,
    pub axis: CultureEvaluationAxis,
    pub quality: CultureQualityMetrics,
}

/// History entry appended by [`EvaluationEngine::evaluate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub protocol_id: String,
    pub overall_quality: f64,
    pub timestamp: DateTime<Utc>,
}

/// Evaluation context object.
///
/// `analyze`, `quality` and `compatibility` are pure.  Only `evaluate`
/// touches the history, and appends are serialized by the lock.
#[derive(Debug, Default)]
pub struct EvaluationEngine {
    history: RwLock<Vec<EvaluationRecord>>,
}

impl EvaluationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn analyze(&self, protocol: &CultureProtocol) -> CultureEvaluationAxis {
        axis::analyze(protocol)
    }

    pub fn quality(&self, protocol: &CultureProtocol) -> CultureQualityMetrics {
        quality::quality(protocol)
    }

    pub fn compatibility(&self, a: &CultureProtocol, b: &CultureProtocol) -> CultureCompatibilityMatrix {
        compatibility::compatibility(a, b)
    }

    /// Analyze and score `protocol`, recording the result.
    pub fn evaluate(&self, protocol: &CultureProtocol) -> ProtocolEvaluation {
        let evaluation = ProtocolEvaluation {
            protocol_id: protocol.id.clone(),
            axis: self.analyze(protocol),
            quality: self.quality(protocol),
        };

        log::debug!(
            "Evaluated protocol '{}': overall quality {:.3}",
            protocol.id,
            evaluation.quality.overall_quality
        );

        self.history.write().push(EvaluationRecord {
            protocol_id: protocol.id.clone(),
            overall_quality: evaluation.quality.overall_quality,
            timestamp: Utc::now(),
        });

        evaluation
    }

    /// Snapshot of the evaluation history, oldest first.
    pub fn history(&self) -> Vec<EvaluationRecord> {
        self.history.read().clone()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PresetProtocol;
    use std::sync::Arc;

    #[test]
    fn test_evaluate_appends_history() {
        let engine = EvaluationEngine::new();
        let p = PresetProtocol::Gravity.protocol();
        let eval = engine.evaluate(&p);
        assert_eq!(eval.protocol_id, "iona-gravita-v1");
        assert_eq!(eval.quality, engine.quality(&p));

        engine.evaluate(&PresetProtocol::Delta.protocol());
        let history = engine.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].protocol_id, "iona-gravita-v1");
        assert_eq!(history[1].protocol_id, "rua-delta-v1");
    }

    #[test]
    fn test_pure_calls_leave_history_alone() {
        let engine = EvaluationEngine::new();
        let p = PresetProtocol::Resonance.protocol();
        assert_eq!(engine.analyze(&p), engine.analyze(&p));
        engine.compatibility(&p, &p);
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_ordered_sum_ignores_input_order() {
        let terms = [0.1, 0.2, 0.3, -0.25, 1e-17];
        let mut reversed = terms;
        reversed.reverse();
        assert_eq!(ordered_sum(terms), ordered_sum(reversed));
        assert_eq!(ordered_sum(std::iter::empty()), 0.0);
    }

    #[test]
    fn test_concurrent_evaluations_are_all_recorded() {
        let engine = Arc::new(EvaluationEngine::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    for preset in PresetProtocol::ALL {
                        engine.evaluate(&preset.protocol());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(engine.history().len(), 4 * PresetProtocol::ALL.len());
    }
}
