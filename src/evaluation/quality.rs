//! Seven quality sub-scores and their weighted overall score.
//!
//! Factors whose input subset is empty are left out of a score's mean
//! rather than counted as zero.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::keywords::{self, COMMON_TAGS};
use crate::protocol::{unit, CultureProtocol, PracticeContext, ValueCategory};

/// Sub-score weights for `overall_quality`, in field order.  Sums to 1.0.
pub const QUALITY_WEIGHTS: [f64; 7] = [0.20, 0.15, 0.20, 0.15, 0.10, 0.10, 0.10];

/// Score used when a score has no applicable factor at all.
const NEUTRAL: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CultureQualityMetrics {
    /// Internal consistency.
    pub coherence: f64,
    /// Richness and diversity.
    pub complexity: f64,
    /// Capacity to respond to change.
    pub adaptability: f64,
    /// Creative potential.
    pub innovation: f64,
    /// Consistency over time.
    pub stability: f64,
    /// Distinctiveness.
    pub uniqueness: f64,
    /// Practical usefulness.
    pub utility: f64,
    pub overall_quality: f64,
}

impl CultureQualityMetrics {
    /// Build from the seven sub-scores, clamping each and deriving the overall score.
    pub fn from_scores(scores: [f64; 7]) -> Self {
        let s = scores.map(unit);
        let overall = s
            .iter()
            .zip(QUALITY_WEIGHTS.iter())
            .map(|(score, weight)| score * weight)
            .sum::<f64>();
        Self {
            coherence: s[0],
            complexity: s[1],
            adaptability: s[2],
            innovation: s[3],
            stability: s[4],
            uniqueness: s[5],
            utility: s[6],
            overall_quality: unit(overall),
        }
    }

    /// The seven sub-scores in weight order.
    pub fn scores(&self) -> [f64; 7] {
        [
            self.coherence,
            self.complexity,
            self.adaptability,
            self.innovation,
            self.stability,
            self.uniqueness,
            self.utility,
        ]
    }
}

// ============================================================================
// Statistics helpers
// ============================================================================

fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        None
    } else {
        Some(xs.iter().sum::<f64>() / xs.len() as f64)
    }
}

/// Population variance.
fn variance(xs: &[f64]) -> f64 {
    match mean(xs) {
        Some(m) => xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / xs.len() as f64,
        None => 0.0,
    }
}

fn std_dev(xs: &[f64]) -> f64 {
    variance(xs).sqrt()
}

/// Mean of the present factors, or `fallback` when none are.
fn mean_of(factors: &[Option<f64>], fallback: f64) -> f64 {
    let present: Vec<f64> = factors.iter().flatten().copied().collect();
    mean(&present).unwrap_or(fallback)
}

// ============================================================================
// Scoring
// ============================================================================

/// Score `protocol` on all seven dimensions.
pub fn quality(protocol: &CultureProtocol) -> CultureQualityMetrics {
    CultureQualityMetrics::from_scores([
        coherence(protocol),
        complexity(protocol),
        adaptability(protocol),
        innovation(protocol),
        stability(protocol),
        uniqueness(protocol),
        utility(protocol),
    ])
}

fn distinct_categories(protocol: &CultureProtocol) -> usize {
    protocol
        .value_tokens
        .iter()
        .map(|t| t.category)
        .collect::<BTreeSet<ValueCategory>>()
        .len()
}

/// Tokens spread over few categories and echoed by practices and memes.
fn coherence(protocol: &CultureProtocol) -> f64 {
    let tokens = &protocol.value_tokens;
    let concentration = (tokens.len() > 1)
        .then(|| 1.0 - distinct_categories(protocol) as f64 / tokens.len() as f64);

    let practice_alignment = protocol
        .practices
        .iter()
        .flat_map(|p| tokens.iter().map(move |t| (p, t)))
        .filter(|(p, t)| keywords::shares_word(&t.name, &p.description))
        .count() as f64
        * 0.1;

    let meme_alignment = protocol
        .memes
        .iter()
        .flat_map(|m| tokens.iter().map(move |t| (m, t)))
        .filter(|(m, t)| keywords::shares_word(&t.name, &m.content))
        .count() as f64
        * 0.1;

    mean_of(
        &[
            concentration,
            Some(practice_alignment.min(1.0)),
            Some(meme_alignment.min(1.0)),
        ],
        NEUTRAL,
    )
}

fn complexity(protocol: &CultureProtocol) -> f64 {
    let size = (protocol.element_count() as f64 / 15.0).min(1.0);

    let influences: Vec<f64> = protocol.value_tokens.iter().map(|t| t.influence).collect();
    let context_diversity = if protocol.practices.is_empty() {
        0.0
    } else {
        let contexts: BTreeSet<PracticeContext> =
            protocol.practices.iter().map(|p| p.context).collect();
        contexts.len() as f64 / protocol.practices.len() as f64
    };
    let diversity = (variance(&influences) + context_diversity).min(1.0);

    (size + diversity) / 2.0
}

fn adaptability(protocol: &CultureProtocol) -> f64 {
    let temporal: Vec<f64> = protocol
        .value_tokens
        .iter()
        .filter(|t| t.category == ValueCategory::Temporal)
        .map(|t| t.value)
        .collect();

    let learning: Vec<f64> = protocol
        .practices
        .iter()
        .filter(|p| {
            matches!(
                p.context,
                PracticeContext::Learning | PracticeContext::ProblemSolving
            )
        })
        .map(|p| p.frequency)
        .collect();

    let change_tokens: f64 = protocol
        .value_tokens
        .iter()
        .filter(|t| keywords::CHANGE.matches(&t.name))
        .map(|t| t.value * 0.2)
        .sum();
    let change_practices: f64 = protocol
        .practices
        .iter()
        .filter(|p| keywords::CHANGE.matches(&p.description))
        .map(|p| p.frequency * 0.1)
        .sum();

    mean_of(
        &[
            mean(&temporal),
            mean(&learning),
            Some((change_tokens + change_practices).min(1.0)),
        ],
        NEUTRAL,
    )
}

fn innovation(protocol: &CultureProtocol) -> f64 {
    let creativity: f64 = protocol
        .value_tokens
        .iter()
        .filter(|t| keywords::CREATIVITY.matches(&t.name))
        .map(|t| t.value * t.influence)
        .sum();

    let experiments: Vec<f64> = protocol
        .practices
        .iter()
        .filter(|p| keywords::EXPERIMENT.matches(&p.name) || keywords::EXPERIMENT.matches(&p.description))
        .map(|p| p.frequency)
        .collect();

    let viral = protocol.memes.iter().filter(|m| m.virality > 0.7).count() as f64 * 0.2;

    mean_of(
        &[Some(creativity.min(1.0)), mean(&experiments), Some(viral.min(1.0))],
        NEUTRAL,
    )
}

fn stability(protocol: &CultureProtocol) -> f64 {
    let values: Vec<f64> = protocol.value_tokens.iter().map(|t| t.value).collect();
    let frequencies: Vec<f64> = protocol.practices.iter().map(|p| p.frequency).collect();
    let myth_influence: Vec<f64> = protocol.myths.iter().map(|m| m.influence).collect();

    mean_of(
        &[
            (!values.is_empty()).then(|| (1.0 - std_dev(&values)).max(0.0)),
            (!frequencies.is_empty()).then(|| (1.0 - std_dev(&frequencies)).max(0.0)),
            mean(&myth_influence),
        ],
        NEUTRAL,
    )
}

fn uniqueness(protocol: &CultureProtocol) -> f64 {
    let tag_share = if protocol.tags.is_empty() {
        0.0
    } else {
        let distinctive = protocol
            .tags
            .iter()
            .filter(|tag| !COMMON_TAGS.contains(&tag.to_lowercase().as_str()))
            .count();
        distinctive as f64 / protocol.tags.len() as f64
    };

    let spread = if protocol.value_tokens.len() > 1 {
        distinct_categories(protocol) as f64 / ValueCategory::ALL.len() as f64
    } else {
        0.0
    };

    let long_memes = protocol
        .memes
        .iter()
        .filter(|m| m.content.chars().count() > 20)
        .count() as f64
        * 0.2;

    mean_of(&[Some(tag_share), Some(spread), Some(long_memes.min(1.0))], NEUTRAL)
}

fn utility(protocol: &CultureProtocol) -> f64 {
    let practical: Vec<f64> = protocol
        .practices
        .iter()
        .filter(|p| {
            matches!(
                p.context,
                PracticeContext::DecisionMaking
                    | PracticeContext::ProblemSolving
                    | PracticeContext::Communication
            )
        })
        .map(|p| p.frequency)
        .collect();

    let strong_share = (!protocol.value_tokens.is_empty()).then(|| {
        protocol
            .value_tokens
            .iter()
            .filter(|t| t.influence > 0.7)
            .count() as f64
            / protocol.value_tokens.len() as f64
    });

    mean_of(&[mean(&practical), strong_share], NEUTRAL)
}

// ============================================================================
// Tests
// ============================================================================
