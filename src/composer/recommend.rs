//! Ranked pairings worth blending.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::metrics::pair_compatibility;
use super::strategy::BlendStrategy;
use crate::protocol::{CultureProtocol, PracticeContext, ValueCategory};

/// Pairs below this compatibility are not recommended.
const MIN_COMPATIBILITY: f64 = 0.3;
/// Pairs at or above this get the creative strategy.
const CREATIVE_COMPATIBILITY: f64 = 0.6;
const MAX_RECOMMENDATIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendRecommendation {
    pub protocol_ids: [String; 2],
    pub protocol_names: [String; 2],
    pub compatibility_score: f64,
    pub recommended_strategy: BlendStrategy,
    pub suggested_weights: [f64; 2],
    pub expected_benefits: Vec<String>,
}

/// Recommend up to five pairings, most compatible first.
pub fn get_blend_recommendations(protocols: &[CultureProtocol]) -> Vec<BlendRecommendation> {
    let mut out = Vec::new();

    for (i, a) in protocols.iter().enumerate() {
        for b in &protocols[i + 1..] {
            let score = pair_compatibility(a, b);
            if score < MIN_COMPATIBILITY {
                continue;
            }
            let (strategy, weights) = if score >= CREATIVE_COMPATIBILITY {
                (BlendStrategy::CreativeFusion, [0.6, 0.4])
            } else {
                (BlendStrategy::SelectiveCombine, [0.5, 0.5])
            };
            out.push(BlendRecommendation {
                protocol_ids: [a.id.clone(), b.id.clone()],
                protocol_names: [a.name.clone(), b.name.clone()],
                compatibility_score: score,
                recommended_strategy: strategy,
                suggested_weights: weights,
                expected_benefits: expected_benefits(a, b, score),
            });
        }
    }

    // Stable: equal scores keep pair order.
    out.sort_by(|x, y| y.compatibility_score.total_cmp(&x.compatibility_score));
    out.truncate(MAX_RECOMMENDATIONS);
    out
}

fn expected_benefits(a: &CultureProtocol, b: &CultureProtocol, score: f64) -> Vec<String> {
    let mut benefits = Vec::new();

    if score >= 0.7 {
        benefits.push("High compatibility promises a stable fusion".to_string());
    }

    let has = |p: &CultureProtocol, c: ValueCategory| p.value_tokens.iter().any(|t| t.category == c);
    if has(a, ValueCategory::Cognitive) && has(b, ValueCategory::Emotional) {
        benefits.push("Balanced integration of cognition and emotion".to_string());
    }
    if has(a, ValueCategory::Temporal) && has(b, ValueCategory::Social) {
        benefits.push("Synergy between time awareness and sociality".to_string());
    }

    let contexts: HashSet<PracticeContext> = a
        .practices
        .iter()
        .chain(b.practices.iter())
        .map(|p| p.context)
        .collect();
    if contexts.len() >= 3 {
        benefits.push("Applicable across diverse contexts".to_string());
    }

    if benefits.is_empty() {
        benefits.push("Integration of basic cultural elements".to_string());
    }
    benefits
}
