//! Creative fusion.
//!
//! Unlike the other strategies this one invents content: fused value
//! tokens, memes, practices and myths, and a new protocol name.  Template
//! and name choice draw from the caller's random source.

use rand::seq::SliceRandom;
use rand::RngCore;

use super::strategy::{
    meets, new_id, ordered_union, pair_mean, sort_desc, weighted, BlendStrategy, Synthesis,
    SELECTION_THRESHOLD,
};
use crate::protocol::{CultureOrigin, CultureProtocol, Meme, Myth, Practice, ValueToken};

/// Value threshold for tokens taking part in fusion.
const HIGH_VALUE: f64 = 0.8;
/// Influence threshold for myths taking part in fusion.
const HIGH_INFLUENCE: f64 = 0.7;
/// Weight at or above which top practices are retained.
const PRACTICE_RETENTION: f64 = 0.25;
const RETAINED_TOKENS: usize = 3;
const RETAINED_PRACTICES: usize = 3;

fn and_then(a: &str, b: &str) -> String {
    format!("{}, and then {}", a, b)
}

fn by_way_of(a: &str, b: &str) -> String {
    format!("{} by way of {}", a, b)
}

fn from_to(a: &str, b: &str) -> String {
    format!("from {} to {}", a, b)
}

fn harmony_of(a: &str, b: &str) -> String {
    format!("the harmony of {} and {}", a, b)
}

fn heart_and_body(a: &str, b: &str) -> String {
    format!("{} with the heart, {} with the body", a, b)
}

/// Meme join templates.
const MEME_TEMPLATES: [fn(&str, &str) -> String; 5] =
    [and_then, by_way_of, from_to, harmony_of, heart_and_body];

/// Concept words contributed by protocol names.
const NAME_CONCEPTS: [(&[&str], [&str; 3]); 3] = [
    (&["gravit"], ["gravity", "attraction", "core"]),
    (&["delta"], ["change", "difference", "shift"]),
    (&["cadmion", "resonan"], ["resonance", "vibration", "harmony"]),
];

/// Concept words contributed by value token names.
const TOKEN_CONCEPTS: [(&[&str], [&str; 3]); 2] = [
    (&["intuit"], ["intuition", "sensing", "perception"]),
    (&["causal"], ["causality", "chain", "consequence"]),
];

pub(crate) fn creative_fusion(
    protocols: &[CultureProtocol],
    weights: &[f64],
    rng: &mut dyn RngCore,
) -> Synthesis {
    let concepts = fusion_concepts(protocols);
    let name = concepts
        .choose(&mut *rng)
        .cloned()
        .unwrap_or_else(|| "Fusion Protocol".to_string());

    let source_names: Vec<&str> = protocols.iter().map(|p| p.name.as_str()).collect();
    let mut protocol = CultureProtocol::builder(new_id(BlendStrategy::CreativeFusion), name.clone())
        .description(format!(
            "New cognitive style born from the creative fusion of {}",
            source_names.join(", ")
        ))
        .origin(CultureOrigin::Evolved)
        .tags(["creative_fusion", "emergent", "innovative"])
        .tags(protocols.iter().flat_map(|p| p.tags.iter().take(2).cloned()))
        .build();
    protocol.value_tokens = fuse_tokens(protocols, weights);
    protocol.memes = fuse_memes(protocols, weights, rng);
    protocol.practices = fuse_practices(protocols, weights);
    protocol.myths = fuse_myths(protocols, weights);

    let shown: Vec<&str> = concepts.iter().take(3).map(String::as_str).collect();
    Synthesis {
        protocol,
        notes: vec![
            format!("Created the new cognitive style '{}' by creative fusion", name),
            "Combined elements beyond the frame of the source protocols".to_string(),
            "Unexpected synergies open new cultural possibilities".to_string(),
            format!("Fusion concepts: {}", shown.join(", ")),
        ],
    }
}

fn fuse_tokens(protocols: &[CultureProtocol], weights: &[f64]) -> Vec<ValueToken> {
    let high: Vec<(&ValueToken, f64)> = weighted(protocols, weights, |p| p.value_tokens.as_slice())
        .into_iter()
        .filter(|(t, _)| t.value >= HIGH_VALUE)
        .collect();

    let mut out = Vec::new();
    if let [(t1, w1), (t2, w2), ..] = high.as_slice() {
        out.push(ValueToken::new(
            format!("{}×{} fusion", t1.name, t2.name),
            pair_mean(t1.value, *w1, t2.value, *w2),
            pair_mean(t1.influence, *w1, t2.influence, *w2),
            t1.category,
        ));
    }
    for (token, w) in high.iter().take(RETAINED_TOKENS) {
        out.push(ValueToken::new(
            token.name.clone(),
            token.value * 0.9,
            token.influence * w,
            token.category,
        ));
    }
    out
}

fn fuse_memes(protocols: &[CultureProtocol], weights: &[f64], rng: &mut dyn RngCore) -> Vec<Meme> {
    let mut out = Vec::new();

    let mut all = weighted(protocols, weights, |p| p.memes.as_slice());
    sort_desc(&mut all, |(m, _)| m.resonance);
    if let [(m1, w1), (m2, w2), ..] = all.as_slice() {
        let template = MEME_TEMPLATES
            .choose(rng)
            .copied()
            .unwrap_or(and_then);
        out.push(Meme::new(
            template(&m1.content, &m2.content),
            pair_mean(m1.virality, *w1, m2.virality, *w2),
            pair_mean(m1.resonance, *w1, m2.resonance, *w2),
            format!("{} × {} fusion", m1.origin, m2.origin),
        ));
    }

    // Each heavy source keeps its most resonant meme (first on ties).
    for (protocol, &w) in protocols.iter().zip(weights) {
        if !meets(w, SELECTION_THRESHOLD) {
            continue;
        }
        let mut best: Option<&Meme> = None;
        for meme in &protocol.memes {
            if best.map_or(true, |b| meme.resonance > b.resonance) {
                best = Some(meme);
            }
        }
        if let Some(meme) = best {
            out.push(meme.clone());
        }
    }
    out
}

fn fuse_practices(protocols: &[CultureProtocol], weights: &[f64]) -> Vec<Practice> {
    let mut all = weighted(protocols, weights, |p| p.practices.as_slice());
    sort_desc(&mut all, |(p, w)| p.frequency * w);

    let mut out = Vec::new();
    if let [(p1, w1), (p2, w2), ..] = all.as_slice() {
        let mut fused = Practice::new(
            format!("{}+{} integration", p1.name, p2.name),
            format!("{} combined with {}", p1.description, p2.description),
            pair_mean(p1.frequency, *w1, p2.frequency, *w2),
            p1.context,
        );
        fused.triggers = ordered_union(&p1.triggers, &p2.triggers);
        fused.outcomes = ordered_union(&p1.outcomes, &p2.outcomes);
        out.push(fused);
    }
    out.extend(
        all.iter()
            .take(RETAINED_PRACTICES)
            .filter(|(_, w)| meets(*w, PRACTICE_RETENTION))
            .map(|(p, _)| (*p).clone()),
    );
    out
}

fn fuse_myths(protocols: &[CultureProtocol], weights: &[f64]) -> Vec<Myth> {
    let mut high: Vec<(&Myth, f64)> = weighted(protocols, weights, |p| p.myths.as_slice())
        .into_iter()
        .filter(|(m, _)| m.influence >= HIGH_INFLUENCE)
        .collect();
    sort_desc(&mut high, |(m, _)| m.influence);

    match high.as_slice() {
        [(m1, w1), (m2, w2), ..] => vec![Myth::new(
            format!("Symphony of {} and {}", m1.name, m2.name),
            format!(
                "{}. And {}. Where the two stories meet, a new legend is born.",
                m1.narrative, m2.narrative
            ),
            format!("Wholeness through {} and {}", m1.symbolism, m2.symbolism),
            ordered_union(&m1.archetypes, &m2.archetypes),
            pair_mean(m1.influence, *w1, m2.influence, *w2),
        )],
        _ => Vec::new(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Five candidate names built from concept words found in the inputs.
pub fn fusion_concepts(protocols: &[CultureProtocol]) -> Vec<String> {
    let mut words: Vec<&str> = Vec::new();
    for protocol in protocols {
        let name = protocol.name.to_lowercase();
        for (stems, concepts) in NAME_CONCEPTS.iter() {
            if stems.iter().any(|s| name.contains(s)) {
                words.extend(concepts.iter());
            }
        }
        for token in &protocol.value_tokens {
            let token_name = token.name.to_lowercase();
            for (stems, concepts) in TOKEN_CONCEPTS.iter() {
                if stems.iter().any(|s| token_name.contains(s)) {
                    words.extend(concepts.iter());
                }
            }
        }
    }

    match words.as_slice() {
        [] => vec![
            "Fusion Protocol".to_string(),
            "Integrated System".to_string(),
            "Next-Generation Cognition".to_string(),
            "Hybrid".to_string(),
            "Evolved Mode".to_string(),
        ],
        [only] => {
            let c0 = capitalize(only);
            vec![
                "Fusion Protocol".to_string(),
                format!("Integrated {} System", c0),
                format!("Next-Generation {} Cognition", c0),
                format!("{} Hybrid", c0),
                format!("Evolved {} Mode", c0),
            ]
        }
        [first, second, ..] => {
            let c0 = capitalize(first);
            let c1 = capitalize(second);
            vec![
                format!("{}×{} Protocol", c0, c1),
                format!("Integrated {} System", c0),
                format!("Next-Generation {} Cognition", c0),
                format!("{} Hybrid", c0),
                format!("Evolved {} Mode", c0),
            ]
        }
    }
}
