//! Blend strategies.
//!
//! Every strategy receives the input protocols together with their
//! normalized weights (same length, summing to 1) and returns a new
//! protocol plus human-readable synthesis notes.  Inputs are never modified.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::fusion;
use crate::error::CultureError;
use crate::protocol::{CultureOrigin, CultureProtocol, ValueCategory, ValueToken};

/// Weight at or above which a source contributes whole elements.
pub const SELECTION_THRESHOLD: f64 = 0.3;

/// Slack for threshold comparisons on normalized weights.
const TOLERANCE: f64 = 1e-9;

/// How a set of protocols is combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendStrategy {
    /// Per-category numeric averaging; whole elements from heavy sources.
    WeightedAverage,
    /// The heaviest protocol extended with a few elements of the others.
    DominantMerge,
    /// Synthesized elements, names and memes.
    #[default]
    CreativeFusion,
    /// Independent top-k selection per element kind.
    SelectiveCombine,
}

impl BlendStrategy {
    pub const ALL: [BlendStrategy; 4] = [
        Self::WeightedAverage,
        Self::DominantMerge,
        Self::CreativeFusion,
        Self::SelectiveCombine,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WeightedAverage => "weighted_average",
            Self::DominantMerge => "dominant_merge",
            Self::CreativeFusion => "creative_fusion",
            Self::SelectiveCombine => "selective_combine",
        }
    }

    /// Prefix of generated result ids.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::WeightedAverage => "blend",
            Self::DominantMerge => "dominant-merge",
            Self::CreativeFusion => "creative-fusion",
            Self::SelectiveCombine => "selective-combine",
        }
    }

    /// Run this strategy.  `weights` must already be normalized.
    pub(crate) fn apply(
        &self,
        protocols: &[CultureProtocol],
        weights: &[f64],
        rng: &mut dyn RngCore,
    ) -> Synthesis {
        match self {
            Self::WeightedAverage => weighted_average(protocols, weights),
            Self::DominantMerge => dominant_merge(protocols, weights),
            Self::CreativeFusion => fusion::creative_fusion(protocols, weights, rng),
            Self::SelectiveCombine => selective_combine(protocols, weights),
        }
    }
}

impl fmt::Display for BlendStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlendStrategy {
    type Err = CultureError;

    /// Accepts `creative_fusion` as well as `CREATIVE_FUSION`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == lower)
            .ok_or_else(|| CultureError::UnsupportedStrategy(s.to_string()))
    }
}

/// Output of one strategy run.
#[derive(Debug, Clone)]
pub(crate) struct Synthesis {
    pub protocol: CultureProtocol,
    pub notes: Vec<String>,
}

// ============================================================================
// Shared helpers
// ============================================================================

pub(crate) fn meets(weight: f64, threshold: f64) -> bool {
    weight + TOLERANCE >= threshold
}

pub(crate) fn new_id(strategy: BlendStrategy) -> String {
    format!("{}-{}", strategy.id_prefix(), Uuid::new_v4())
}

/// Weighted mean of two values, falling back to the plain mean when both
/// weights are zero.
pub(crate) fn pair_mean(a: f64, wa: f64, b: f64, wb: f64) -> f64 {
    let total = wa + wb;
    if total > 0.0 {
        (a * wa + b * wb) / total
    } else {
        (a + b) / 2.0
    }
}

/// Concatenate two lists, dropping repeats while keeping first occurrences.
pub(crate) fn ordered_union(a: &[String], b: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(a.len() + b.len());
    for item in a.iter().chain(b) {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}

/// Pair every element of every protocol with its source weight.
pub(crate) fn weighted<'a, T, F>(
    protocols: &'a [CultureProtocol],
    weights: &[f64],
    elements: F,
) -> Vec<(&'a T, f64)>
where
    F: Fn(&'a CultureProtocol) -> &'a [T],
{
    protocols
        .iter()
        .zip(weights.iter())
        .flat_map(|(p, &w)| elements(p).iter().map(move |e| (e, w)))
        .collect()
}

/// Stable descending sort on a float key.
pub(crate) fn sort_desc<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> f64,
{
    items.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));
}

fn names(protocols: &[CultureProtocol]) -> Vec<&str> {
    protocols.iter().map(|p| p.name.as_str()).collect()
}

// ============================================================================
// WEIGHTED_AVERAGE
// ============================================================================

fn weighted_average(protocols: &[CultureProtocol], weights: &[f64]) -> Synthesis {
    // Categories in first-appearance order with (Σ v·w, Σ w).
    let mut sums: Vec<(ValueCategory, f64, f64)> = Vec::new();
    for (token, w) in weighted(protocols, weights, |p| p.value_tokens.as_slice()) {
        match sums.iter_mut().find(|(c, _, _)| *c == token.category) {
            Some(entry) => {
                entry.1 += token.value * w;
                entry.2 += w;
            }
            None => sums.push((token.category, token.value * w, w)),
        }
    }

    let value_tokens = sums
        .into_iter()
        .map(|(category, total, weight)| {
            let value = if weight > 0.0 { total / weight } else { 0.0 };
            ValueToken::new(format!("blended {}", category), value, 0.7, category)
        })
        .collect();

    let heavy = |w: &f64| meets(*w, SELECTION_THRESHOLD);
    let mut memes = Vec::new();
    let mut practices = Vec::new();
    let mut myths = Vec::new();
    for (protocol, w) in protocols.iter().zip(weights) {
        if heavy(w) {
            memes.extend(protocol.memes.iter().cloned());
            practices.extend(protocol.practices.iter().cloned());
            myths.extend(protocol.myths.iter().cloned());
        }
    }

    let mut protocol = CultureProtocol::builder(
        new_id(BlendStrategy::WeightedAverage),
        format!("Fusion Protocol: {}", names(protocols).join(" × ")),
    )
    .description(format!("Weighted-average fusion of {} cultures", protocols.len()))
    .origin(CultureOrigin::Synthetic)
    .tags(["fusion", "weighted_average"])
    .tags(protocols.iter().flat_map(|p| p.tags.iter().cloned()))
    .build();
    protocol.value_tokens = value_tokens;
    protocol.memes = memes;
    protocol.practices = practices;
    protocol.myths = myths;

    let allocation: Vec<String> = protocols
        .iter()
        .zip(weights)
        .map(|(p, w)| format!("{}({:.2})", p.name, w))
        .collect();

    Synthesis {
        protocol,
        notes: vec![
            format!("Fused {} cultures by weighted average", protocols.len()),
            format!("Weight allocation: {}", allocation.join(", ")),
            "Stable synthesis built on numeric averages of each element".to_string(),
        ],
    }
}

// ============================================================================
// DOMINANT_MERGE
// ============================================================================

fn dominant_merge(protocols: &[CultureProtocol], weights: &[f64]) -> Synthesis {
    // First index holding the largest weight.
    let mut dominant_idx = 0;
    for (i, w) in weights.iter().enumerate() {
        if *w > weights[dominant_idx] {
            dominant_idx = i;
        }
    }
    let dominant = &protocols[dominant_idx];

    let mut value_tokens = dominant.value_tokens.clone();
    let mut memes = dominant.memes.clone();

    for (i, (protocol, &w)) in protocols.iter().zip(weights).enumerate() {
        if i == dominant_idx || !meets(w, SELECTION_THRESHOLD) {
            continue;
        }
        // Source-list order, not score order.
        for token in protocol.value_tokens.iter().take(2) {
            if !value_tokens.iter().any(|t| t.name == token.name) {
                value_tokens.push(ValueToken::new(
                    token.name.clone(),
                    token.value * w,
                    token.influence * w,
                    token.category,
                ));
            }
        }
        if let Some(meme) = protocol.memes.first() {
            memes.push(meme.clone());
        }
    }

    let mut protocol = CultureProtocol::builder(
        new_id(BlendStrategy::DominantMerge),
        format!("{} Extended Protocol", dominant.name),
    )
    .description(format!("Multi-culture protocol built on {}", dominant.name))
    .origin(CultureOrigin::Evolved)
    .tags(["dominant_merge".to_string(), dominant.name.to_lowercase()])
    .tags(protocols.iter().filter_map(|p| p.tags.first().cloned()))
    .build();
    protocol.value_tokens = value_tokens;
    protocol.memes = memes;
    protocol.practices = dominant.practices.clone();
    protocol.myths = dominant.myths.clone();

    Synthesis {
        protocol,
        notes: vec![
            format!("Adopted {} as the dominant base", dominant.name),
            format!(
                "Base structure kept at weight {:.2}",
                weights[dominant_idx]
            ),
            "Reinforcing elements merged selectively from the other protocols".to_string(),
            "Incremental extension favouring stability and consistency".to_string(),
        ],
    }
}

// ============================================================================
// SELECTIVE_COMBINE
// ============================================================================

const TOP_TOKENS: usize = 5;
const TOP_MEMES: usize = 3;
const TOP_PRACTICES: usize = 4;
const TOP_MYTHS: usize = 2;

fn selective_combine(protocols: &[CultureProtocol], weights: &[f64]) -> Synthesis {
    let mut tokens = weighted(protocols, weights, |p| p.value_tokens.as_slice());
    sort_desc(&mut tokens, |(t, w)| t.value * w);
    let mut value_tokens: Vec<ValueToken> = Vec::new();
    for (token, _) in tokens {
        if value_tokens.len() == TOP_TOKENS {
            break;
        }
        if !value_tokens.iter().any(|t| t.name == token.name) {
            value_tokens.push(token.clone());
        }
    }

    let mut memes = weighted(protocols, weights, |p| p.memes.as_slice());
    sort_desc(&mut memes, |(m, w)| m.resonance * w);

    let mut practices = weighted(protocols, weights, |p| p.practices.as_slice());
    sort_desc(&mut practices, |(p, w)| p.frequency * w);

    let mut myths = weighted(protocols, weights, |p| p.myths.as_slice());
    sort_desc(&mut myths, |(m, w)| m.influence * w);

    let mut protocol = CultureProtocol::builder(
        new_id(BlendStrategy::SelectiveCombine),
        format!("Selective Protocol: {} cultures curated", protocols.len()),
    )
    .description("Efficient cognitive style assembled from the best elements of each culture")
    .origin(CultureOrigin::Synthetic)
    .tags(["selective", "optimized", "curated"])
    .tags(
        protocols
            .iter()
            .map(|p| p.name.to_lowercase().chars().take(4).collect::<String>()),
    )
    .build();
    protocol.value_tokens = value_tokens;
    protocol.memes = memes.into_iter().take(TOP_MEMES).map(|(m, _)| m.clone()).collect();
    protocol.practices = practices
        .into_iter()
        .take(TOP_PRACTICES)
        .map(|(p, _)| p.clone())
        .collect();
    protocol.myths = myths.into_iter().take(TOP_MYTHS).map(|(m, _)| m.clone()).collect();

    let notes = vec![
        "Selected the best elements of each culture by weighted score".to_string(),
        format!(
            "Integrated {} values, {} memes, {} practices, {} myths",
            protocol.value_tokens.len(),
            protocol.memes.len(),
            protocol.practices.len(),
            protocol.myths.len()
        ),
        "Curated for efficiency and quality without redundancy".to_string(),
    ];

    Synthesis { protocol, notes }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Meme, Myth, Practice, PracticeContext, PresetProtocol};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn source(id: &str, tag: &str) -> CultureProtocol {
        CultureProtocol::builder(id, id.to_uppercase())
            .value(ValueToken::new(format!("{} value", id), 0.8, 0.6, ValueCategory::Social))
            .meme(Meme::new(format!("{} meme", id), 0.5, 0.5, "o"))
            .practice(Practice::new(
                format!("{} practice", id),
                "routine",
                0.5,
                PracticeContext::Learning,
            ))
            .myth(Myth::new(format!("{} myth", id), "n", "s", vec![], 0.6))
            .tag(tag)
            .build()
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("creative_fusion".parse::<BlendStrategy>().unwrap(), BlendStrategy::CreativeFusion);
        assert_eq!("SELECTIVE_COMBINE".parse::<BlendStrategy>().unwrap(), BlendStrategy::SelectiveCombine);
        assert!(matches!(
            "median".parse::<BlendStrategy>(),
            Err(CultureError::UnsupportedStrategy(s)) if s == "median"
        ));
        for s in BlendStrategy::ALL {
            assert_eq!(s.to_string().parse::<BlendStrategy>().unwrap(), s);
        }
    }

    #[test]
    fn test_weighted_average_threshold_is_inclusive() {
        let inputs = vec![source("a", "x"), source("b", "y"), source("c", "z")];
        let result = weighted_average(&inputs, &[0.5, 0.3, 0.2]);
        let memes: Vec<&str> = result.protocol.memes.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(memes, vec!["a meme", "b meme"]);
        assert_eq!(result.protocol.practices.len(), 2);
        assert_eq!(result.protocol.myths.len(), 2);
        // All three feed the numeric average.
        assert_eq!(result.protocol.value_tokens.len(), 1);
        assert_eq!(result.protocol.value_tokens[0].name, "blended social");
        assert!((result.protocol.value_tokens[0].value - 0.8).abs() < 1e-9);
        assert_eq!(result.protocol.tags, vec!["fusion", "weighted_average", "x", "y", "z"]);
        assert!(result.protocol.id.starts_with("blend-"));
    }

    #[test]
    fn test_weighted_average_categories_in_first_appearance_order() {
        let g = PresetProtocol::Gravity.protocol();
        let d = PresetProtocol::Delta.protocol();
        let result = weighted_average(&[g, d], &[0.5, 0.5]);
        let names: Vec<&str> = result.protocol.value_tokens.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["blended cognitive", "blended temporal", "blended aesthetic"]);
        // Temporal: (0.99 + 0.95) / 2
        assert!((result.protocol.value_tokens[1].value - 0.97).abs() < 1e-9);
        assert!(result.protocol.value_tokens.iter().all(|t| t.influence == 0.7));
    }

    #[test]
    fn test_dominant_merge_extends_base() {
        let g = PresetProtocol::Gravity.protocol();
        let d = PresetProtocol::Delta.protocol();
        let result = dominant_merge(&[g.clone(), d.clone()], &[0.6, 0.4]);
        let p = &result.protocol;
        assert_eq!(p.name, "Iona Gravita Protocol Extended Protocol");
        // 3 base tokens + first two of Delta, scaled by 0.4
        assert_eq!(p.value_tokens.len(), 5);
        assert_eq!(p.value_tokens[3].name, "Future Orientation");
        assert!((p.value_tokens[3].value - 0.95 * 0.4).abs() < 1e-9);
        assert_eq!(p.memes.len(), 3);
        assert_eq!(p.memes[2].content, d.memes[0].content);
        assert_eq!(p.practices, g.practices);
        assert_eq!(p.tags, vec!["dominant_merge", "iona gravita protocol", "gravity", "future"]);
        assert_eq!(p.origin, CultureOrigin::Evolved);
    }

    #[test]
    fn test_dominant_merge_tie_picks_first() {
        let a = source("a", "x");
        let b = source("b", "y");
        let result = dominant_merge(&[a, b], &[0.5, 0.5]);
        assert_eq!(result.protocol.name, "A Extended Protocol");
        assert_eq!(result.protocol.value_tokens.len(), 2);
    }

    #[test]
    fn test_dominant_merge_skips_light_sources() {
        let inputs = vec![source("a", "x"), source("b", "y"), source("c", "z")];
        let result = dominant_merge(&inputs, &[0.6, 0.25, 0.15]);
        assert_eq!(result.protocol.value_tokens.len(), 1);
        assert_eq!(result.protocol.memes.len(), 1);
    }

    #[test]
    fn test_selective_combine_orders_by_weighted_value() {
        let g = PresetProtocol::Gravity.protocol();
        let d = PresetProtocol::Delta.protocol();
        let result = selective_combine(&[g, d], &[0.6, 0.4]);
        let names: Vec<&str> = result.protocol.value_tokens.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Turning Point Detection",
                "Intuition First",
                "Causal Sensing",
                "Future Orientation",
                "Backward Reasoning",
            ]
        );
        assert_eq!(result.protocol.memes.len(), 3);
        assert_eq!(result.protocol.practices.len(), 2);
        assert_eq!(result.protocol.myths.len(), 2);
        assert_eq!(result.protocol.name, "Selective Protocol: 2 cultures curated");
        assert_eq!(
            result.protocol.tags,
            vec!["selective", "optimized", "curated", "iona", "rua "]
        );
    }

    #[test]
    fn test_selective_combine_deduplicates_names() {
        let a = source("a", "x");
        let mut b = source("b", "y");
        b.value_tokens[0].name = "a value".to_string();
        let result = selective_combine(&[a, b], &[0.5, 0.5]);
        assert_eq!(result.protocol.value_tokens.len(), 1);
    }

    #[test]
    fn test_apply_dispatches_every_strategy() {
        let inputs = PresetProtocol::all_protocols();
        let weights = [0.4, 0.3, 0.3];
        let mut rng = StdRng::seed_from_u64(7);
        for strategy in BlendStrategy::ALL {
            let out = strategy.apply(&inputs, &weights, &mut rng);
            assert!(out.protocol.id.starts_with(strategy.id_prefix()));
            assert!(!out.notes.is_empty());
        }
    }

    #[test]
    fn test_ordered_union() {
        let a = vec!["x".to_string(), "y".to_string()];
        let b = vec!["y".to_string(), "z".to_string()];
        assert_eq!(ordered_union(&a, &b), vec!["x", "y", "z"]);
    }
}
