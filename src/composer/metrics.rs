//! Set-overlap metrics used by blends and recommendations.

use std::collections::HashSet;
use std::hash::Hash;

use crate::protocol::{CultureProtocol, PracticeContext, ValueCategory};

/// `|a ∩ b| / |a ∪ b|`, or 0 when both sets are empty.
fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        a.intersection(b).count() as f64 / union as f64
    }
}

/// Mean of category, practice-context and tag overlap between two protocols.
pub fn pair_compatibility(a: &CultureProtocol, b: &CultureProtocol) -> f64 {
    let categories = jaccard::<ValueCategory>(
        &a.value_tokens.iter().map(|t| t.category).collect(),
        &b.value_tokens.iter().map(|t| t.category).collect(),
    );
    let contexts = jaccard::<PracticeContext>(
        &a.practices.iter().map(|p| p.context).collect(),
        &b.practices.iter().map(|p| p.context).collect(),
    );
    let tags = jaccard::<&str>(
        &a.tags.iter().map(String::as_str).collect(),
        &b.tags.iter().map(String::as_str).collect(),
    );
    (categories + contexts + tags) / 3.0
}

/// Mean pair compatibility over every unordered pair of inputs.
pub fn set_compatibility(protocols: &[CultureProtocol]) -> f64 {
    if protocols.len() < 2 {
        return 1.0;
    }
    let mut total = 0.0;
    let mut pairs = 0usize;
    for (i, a) in protocols.iter().enumerate() {
        for b in &protocols[i + 1..] {
            total += pair_compatibility(a, b);
            pairs += 1;
        }
    }
    total / pairs as f64
}

/// Share of `items` absent from `known`, or 0 for an empty result.
fn fresh_share(items: &HashSet<&str>, known: &HashSet<&str>) -> f64 {
    if items.is_empty() {
        0.0
    } else {
        items.difference(known).count() as f64 / items.len() as f64
    }
}

/// How much of `result` is absent from `sources`.
///
/// Mean of the fresh value-token-name share, the fresh meme-content share
/// and `min(element_count / 10, 1)`.
pub fn novelty(result: &CultureProtocol, sources: &[CultureProtocol]) -> f64 {
    let result_tokens: HashSet<&str> = result.value_tokens.iter().map(|t| t.name.as_str()).collect();
    let source_tokens: HashSet<&str> = sources
        .iter()
        .flat_map(|p| p.value_tokens.iter().map(|t| t.name.as_str()))
        .collect();

    let result_memes: HashSet<&str> = result.memes.iter().map(|m| m.content.as_str()).collect();
    let source_memes: HashSet<&str> = sources
        .iter()
        .flat_map(|p| p.memes.iter().map(|m| m.content.as_str()))
        .collect();

    let size = (result.element_count() as f64 / 10.0).min(1.0);

    (fresh_share(&result_tokens, &source_tokens) + fresh_share(&result_memes, &source_memes) + size)
        / 3.0
}
