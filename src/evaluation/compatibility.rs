//! Pairwise compatibility, synergy and conflict between two protocols.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::axis::{analyze, CommunicationStyleProfile, CultureEvaluationAxis, TimePerceptionProfile};
use super::ordered_sum;
use crate::protocol::{unit, CultureProtocol, PracticeContext, ValueCategory};

/// Component weights: value alignment, practice compatibility,
/// communication harmony, temporal synchronization.
pub const COMPATIBILITY_WEIGHTS: [f64; 4] = [0.30, 0.25, 0.25, 0.20];

/// Detailed compatibility report for an ordered pair of protocols.
///
/// Every scalar is symmetric in its two inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CultureCompatibilityMatrix {
    pub culture_a_id: String,
    pub culture_b_id: String,
    pub compatibility_score: f64,
    pub synergy_potential: f64,
    pub conflict_risk: f64,

    pub value_alignment: f64,
    pub practice_compatibility: f64,
    pub communication_harmony: f64,
    pub temporal_synchronization: f64,

    pub collaboration_recommendations: Vec<String>,
    pub potential_challenges: Vec<String>,
}

/// Compare `a` with `b`.
pub fn compatibility(a: &CultureProtocol, b: &CultureProtocol) -> CultureCompatibilityMatrix {
    let axis_a = analyze(a);
    let axis_b = analyze(b);

    let value_alignment = value_alignment(a, b);
    let practice_compatibility = practice_compatibility(a, b);
    let communication_harmony =
        communication_harmony(&axis_a.communication_style, &axis_b.communication_style);
    let temporal_synchronization =
        temporal_synchronization(&axis_a.time_perception, &axis_b.time_perception);

    let compatibility_score = unit(
        [
            value_alignment,
            practice_compatibility,
            communication_harmony,
            temporal_synchronization,
        ]
        .iter()
        .zip(COMPATIBILITY_WEIGHTS.iter())
        .map(|(score, weight)| score * weight)
        .sum(),
    );

    let conflict_risk = conflict_risk(&axis_a, &axis_b);

    CultureCompatibilityMatrix {
        culture_a_id: a.id.clone(),
        culture_b_id: b.id.clone(),
        compatibility_score,
        synergy_potential: synergy_potential(a, b),
        conflict_risk,
        value_alignment,
        practice_compatibility,
        communication_harmony,
        temporal_synchronization,
        collaboration_recommendations: recommendations(&axis_a, &axis_b, compatibility_score),
        potential_challenges: challenges(&axis_a, &axis_b, conflict_risk),
    }
}

// ============================================================================
// Components
// ============================================================================

fn category_mean(protocol: &CultureProtocol, category: ValueCategory) -> Option<f64> {
    let values: Vec<f64> = protocol
        .value_tokens
        .iter()
        .filter(|t| t.category == category)
        .map(|t| t.value)
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(ordered_sum(values.iter().copied()) / values.len() as f64)
    }
}

fn frequency_mean(protocol: &CultureProtocol) -> Option<f64> {
    if protocol.practices.is_empty() {
        return None;
    }
    let total = ordered_sum(protocol.practices.iter().map(|p| p.frequency));
    Some(total / protocol.practices.len() as f64)
}

fn categories(protocol: &CultureProtocol) -> BTreeSet<ValueCategory> {
    protocol.value_tokens.iter().map(|t| t.category).collect()
}

fn contexts(protocol: &CultureProtocol) -> BTreeSet<PracticeContext> {
    protocol.practices.iter().map(|p| p.context).collect()
}

fn value_alignment(a: &CultureProtocol, b: &CultureProtocol) -> f64 {
    let total = ValueCategory::ALL
        .iter()
        .filter_map(|&category| {
            let mean_a = category_mean(a, category)?;
            let mean_b = category_mean(b, category)?;
            Some((1.0 - (mean_a - mean_b).abs()) * 0.2)
        })
        .sum();
    unit(total)
}

fn practice_compatibility(a: &CultureProtocol, b: &CultureProtocol) -> f64 {
    let mut factors = Vec::new();

    let (ctx_a, ctx_b) = (contexts(a), contexts(b));
    if !ctx_a.is_empty() && !ctx_b.is_empty() {
        let shared = ctx_a.intersection(&ctx_b).count() as f64;
        let union = ctx_a.union(&ctx_b).count() as f64;
        factors.push(shared / union);
    }

    if let (Some(fa), Some(fb)) = (frequency_mean(a), frequency_mean(b)) {
        factors.push(1.0 - (fa - fb).abs());
    }

    if factors.is_empty() {
        0.5
    } else {
        unit(factors.iter().sum::<f64>() / factors.len() as f64)
    }
}

fn communication_harmony(a: &CommunicationStyleProfile, b: &CommunicationStyleProfile) -> f64 {
    let directness = 1.0 - (a.directness_indirectness - b.directness_indirectness).abs() / 2.0;
    let emotion = 1.0 - (a.emotional_expression - b.emotional_expression).abs();
    let context = 1.0 - (a.context_dependency - b.context_dependency).abs();
    (directness + emotion + context) / 3.0
}

fn temporal_synchronization(a: &TimePerceptionProfile, b: &TimePerceptionProfile) -> f64 {
    let urgency = 1.0 - (a.urgency_bias - b.urgency_bias).abs();
    let planning = 1.0 - (a.planning_depth - b.planning_depth).abs();
    let speed = 1.0 - (a.adaptive_speed - b.adaptive_speed).abs();
    let horizon = if a.time_horizon == b.time_horizon { 1.0 } else { 0.5 };
    (urgency + planning + speed + horizon) / 4.0
}

/// Rewards complementary coverage: categories and contexts held by only one side.
fn synergy_potential(a: &CultureProtocol, b: &CultureProtocol) -> f64 {
    let mut factors = Vec::new();

    let (cat_a, cat_b) = (categories(a), categories(b));
    let union = cat_a.union(&cat_b).count();
    if union > 0 {
        factors.push(cat_a.symmetric_difference(&cat_b).count() as f64 / union as f64);
    }

    let (ctx_a, ctx_b) = (contexts(a), contexts(b));
    if !ctx_a.is_empty() && !ctx_b.is_empty() {
        let union = ctx_a.union(&ctx_b).count() as f64;
        factors.push(ctx_a.symmetric_difference(&ctx_b).count() as f64 / union);
    }

    if factors.is_empty() {
        0.5
    } else {
        factors.iter().sum::<f64>() / factors.len() as f64
    }
}

fn conflict_risk(a: &CultureEvaluationAxis, b: &CultureEvaluationAxis) -> f64 {
    let (ra, rb) = (&a.relationship_model, &b.relationship_model);
    let relationship = [
        (ra.individualism_collectivism - rb.individualism_collectivism).abs(),
        (ra.competition_cooperation - rb.competition_cooperation).abs(),
        (ra.hierarchy_equality - rb.hierarchy_equality).abs(),
    ];

    let (da, db) = (&a.decision_making, &b.decision_making);
    let decision = [
        (da.consensus_autocracy - db.consensus_autocracy).abs(),
        (da.data_intuition - db.data_intuition).abs(),
        (da.speed_accuracy - db.speed_accuracy).abs(),
    ];

    // Bipolar gaps span [0, 2].
    let relationship = relationship.iter().sum::<f64>() / 3.0 / 2.0;
    let decision = decision.iter().sum::<f64>() / 3.0 / 2.0;
    unit((relationship + decision) / 2.0)
}

// ============================================================================
// Advisory text
// ============================================================================

fn recommendations(a: &CultureEvaluationAxis, b: &CultureEvaluationAxis, score: f64) -> Vec<String> {
    let mut out = Vec::new();

    if score >= 0.7 {
        out.push("High compatibility: natural collaboration is expected".to_string());
    }
    if (a.communication_style.directness_indirectness - b.communication_style.directness_indirectness).abs() > 0.5 {
        out.push("Make the difference in communication style explicit to build mutual understanding".to_string());
    }
    if (a.time_perception.urgency_bias - b.time_perception.urgency_bias).abs() > 0.3 {
        out.push("Divide roles to account for different perceptions of urgency".to_string());
    }
    if (a.decision_making.consensus_autocracy - b.decision_making.consensus_autocracy).abs() > 0.5 {
        out.push("Agree on the decision process in advance to avoid confusion".to_string());
    }

    if out.is_empty() {
        out.push("Start from basic mutual understanding".to_string());
    }
    out
}

fn challenges(a: &CultureEvaluationAxis, b: &CultureEvaluationAxis, conflict_risk: f64) -> Vec<String> {
    let mut out = Vec::new();

    if conflict_risk >= 0.6 {
        out.push("High conflict risk: proceed with a careful approach".to_string());
    }
    let (ra, rb) = (&a.relationship_model, &b.relationship_model);
    if (ra.individualism_collectivism - rb.individualism_collectivism).abs() > 0.6 {
        out.push("Individualist versus collectivist value conflict".to_string());
    }
    if (ra.competition_cooperation - rb.competition_cooperation).abs() > 0.6 {
        out.push("Competitive versus cooperative stance".to_string());
    }
    if (a.cognition_style.intuition_logic - b.cognition_style.intuition_logic).abs() > 0.6 {
        out.push("Intuitive versus logical thinking approaches".to_string());
    }

    if out.is_empty() {
        out.push("No particular challenges expected".to_string());
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
