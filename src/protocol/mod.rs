//! Culture protocol data model.
//!
//! A [`CultureProtocol`] bundles four kinds of cultural elements:
//!
//! ```text
//! CultureProtocol
//!   ├─ ValueToken  (named scalar belief + influence + category)
//!   ├─ Meme        (textual assertion, owned mutation tree)
//!   ├─ Practice    (behavioral routine in a usage context)
//!   └─ Myth        (symbolic narrative)
//! ```
//!
//! Records are plain values.  Every bounded field is clamped into its
//! declared range on construction and again by [`CultureProtocol::clamped`].

pub mod presets;
pub mod prompt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CultureError, Result};

pub use presets::PresetProtocol;

/// Maximum nesting depth of a meme mutation tree.
pub const MAX_MUTATION_DEPTH: usize = 16;

/// Clamp into `[0, 1]`, mapping NaN to 0.
pub(crate) fn unit(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Clamp into `[-1, 1]`, mapping NaN to 0.
pub(crate) fn bipolar(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(-1.0, 1.0)
    }
}

// ============================================================================
// Enumerations
// ============================================================================

/// Category tag of a value token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueCategory {
    /// Logic vs. intuition.
    Cognitive,
    /// Individual vs. collective.
    Social,
    /// Short vs. long horizon.
    Temporal,
    /// Harmony vs. novelty.
    Aesthetic,
    /// Expression vs. restraint.
    Emotional,
}

impl ValueCategory {
    /// All categories in canonical order.
    pub const ALL: [ValueCategory; 5] = [
        Self::Cognitive,
        Self::Social,
        Self::Temporal,
        Self::Aesthetic,
        Self::Emotional,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cognitive => "cognitive",
            Self::Social => "social",
            Self::Temporal => "temporal",
            Self::Aesthetic => "aesthetic",
            Self::Emotional => "emotional",
        }
    }
}

impl std::fmt::Display for ValueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Usage context of a practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PracticeContext {
    DecisionMaking,
    Communication,
    ProblemSolving,
    Relationship,
    Learning,
}

impl PracticeContext {
    pub const ALL: [PracticeContext; 5] = [
        Self::DecisionMaking,
        Self::Communication,
        Self::ProblemSolving,
        Self::Relationship,
        Self::Learning,
    ];
}

/// Where a protocol came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CultureOrigin {
    /// Extracted from a real-world culture.
    Historical,
    /// Synthesized artificially.
    Synthetic,
    /// Derived from existing protocols.
    Evolved,
    /// Created for experimentation.
    Experimental,
}

// ============================================================================
// Elements
// ============================================================================

/// A named scalar belief or preference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueToken {
    pub name: String,
    /// Strength in `[0, 1]`.
    pub value: f64,
    /// Effect on other elements in `[0, 1]`.
    pub influence: f64,
    pub category: ValueCategory,
}

impl ValueToken {
    pub fn new(name: impl Into<String>, value: f64, influence: f64, category: ValueCategory) -> Self {
        Self {
            name: name.into(),
            value: unit(value),
            influence: unit(influence),
            category,
        }
    }
}

/// A short textual assertion that spreads through a culture.
///
/// Mutations form an owned tree: each meme owns its derived variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meme {
    pub content: String,
    /// Spread power in `[0, 1]`.
    pub virality: f64,
    /// Resonance within the culture in `[0, 1]`.
    pub resonance: f64,
    pub origin: String,
    #[serde(default)]
    pub mutations: Vec<Meme>,
}

impl Meme {
    pub fn new(content: impl Into<String>, virality: f64, resonance: f64, origin: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            virality: unit(virality),
            resonance: unit(resonance),
            origin: origin.into(),
            mutations: Vec::new(),
        }
    }

    /// Attach a mutation subtree, refusing trees deeper than [`MAX_MUTATION_DEPTH`].
    pub fn with_mutation(mut self, mutation: Meme) -> Result<Self> {
        if mutation.depth() + 1 > MAX_MUTATION_DEPTH {
            return Err(CultureError::MutationDepthExceeded {
                max: MAX_MUTATION_DEPTH,
            });
        }
        self.mutations.push(mutation);
        Ok(self)
    }

    /// Derive a child variant below the mutation at `path`, with new content
    /// and its parent's scores.
    ///
    /// `path` indexes `mutations` level by level starting at this meme; an
    /// empty path mutates this meme directly. Only the depth of the new
    /// branch is checked, so a deep sibling branch does not block a shallow
    /// mutation.
    pub fn mutate(&mut self, path: &[usize], content: impl Into<String>) -> Result<&Meme> {
        if path.len() + 2 > MAX_MUTATION_DEPTH {
            return Err(CultureError::MutationDepthExceeded {
                max: MAX_MUTATION_DEPTH,
            });
        }
        let mut parent = self;
        for &index in path {
            parent = parent
                .mutations
                .get_mut(index)
                .ok_or_else(|| CultureError::UnknownMutation(path.to_vec()))?;
        }
        let child = Meme::new(content, parent.virality, parent.resonance, parent.content.clone());
        parent.mutations.push(child);
        Ok(&parent.mutations[parent.mutations.len() - 1])
    }

    /// Reject trees deeper than [`MAX_MUTATION_DEPTH`], however they were built.
    pub fn validate(&self) -> Result<()> {
        if self.depth() > MAX_MUTATION_DEPTH {
            return Err(CultureError::MutationDepthExceeded {
                max: MAX_MUTATION_DEPTH,
            });
        }
        Ok(())
    }

    /// Number of levels in the tree (a meme without mutations has depth 1).
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack: Vec<(&Meme, usize)> = vec![(self, 1)];
        while let Some((meme, level)) = stack.pop() {
            max = max.max(level);
            for child in &meme.mutations {
                stack.push((child, level + 1));
            }
        }
        max
    }

    /// Pre-order walk over this meme and every mutation below it.
    pub fn walk(&self) -> Vec<&Meme> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(meme) = stack.pop() {
            out.push(meme);
            for child in meme.mutations.iter().rev() {
                stack.push(child);
            }
        }
        out
    }
}

/// A named behavioral routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Practice {
    pub name: String,
    pub description: String,
    /// Execution frequency in `[0, 1]`.
    pub frequency: f64,
    pub context: PracticeContext,
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub outcomes: Vec<String>,
}

impl Practice {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        frequency: f64,
        context: PracticeContext,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            frequency: unit(frequency),
            context,
            triggers: Vec::new(),
            outcomes: Vec::new(),
        }
    }

    pub fn with_triggers<I, S>(mut self, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.triggers = triggers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_outcomes<I, S>(mut self, outcomes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outcomes = outcomes.into_iter().map(Into::into).collect();
        self
    }
}

/// A symbolic narrative expressing a culture's norms or origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Myth {
    pub name: String,
    pub narrative: String,
    pub symbolism: String,
    #[serde(default)]
    pub archetypes: Vec<String>,
    /// Influence on the culture in `[0, 1]`.
    pub influence: f64,
}

impl Myth {
    pub fn new(
        name: impl Into<String>,
        narrative: impl Into<String>,
        symbolism: impl Into<String>,
        archetypes: Vec<String>,
        influence: f64,
    ) -> Self {
        Self {
            name: name.into(),
            narrative: narrative.into(),
            symbolism: symbolism.into(),
            archetypes,
            influence: unit(influence),
        }
    }
}

// ============================================================================
// Protocol
// ============================================================================

/// A named bundle of value tokens, memes, practices and myths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CultureProtocol {
    /// Unique within a session.
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub value_tokens: Vec<ValueToken>,
    #[serde(default)]
    pub memes: Vec<Meme>,
    #[serde(default)]
    pub practices: Vec<Practice>,
    #[serde(default)]
    pub myths: Vec<Myth>,
    pub origin: CultureOrigin,
    pub version: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CultureProtocol {
    /// Start building a protocol with the given id and name.
    pub fn builder(id: impl Into<String>, name: impl Into<String>) -> CultureProtocolBuilder {
        CultureProtocolBuilder::new(id, name)
    }

    /// Total number of value tokens, memes, practices and myths.
    pub fn element_count(&self) -> usize {
        self.value_tokens.len() + self.memes.len() + self.practices.len() + self.myths.len()
    }

    /// Check structural bounds that the public fields cannot enforce.
    pub fn validate(&self) -> Result<()> {
        for meme in &self.memes {
            meme.validate()?;
        }
        Ok(())
    }

    /// Parse a protocol from JSON, validate it and clamp bounded fields.
    pub fn from_json(json: &str) -> Result<Self> {
        let protocol: CultureProtocol = serde_json::from_str(json)?;
        protocol.validate()?;
        Ok(protocol.clamped())
    }

    /// Return a copy with every bounded field clamped into range.
    ///
    /// Useful for protocols deserialized from external data.
    pub fn clamped(&self) -> Self {
        let mut out = self.clone();
        for t in &mut out.value_tokens {
            t.value = unit(t.value);
            t.influence = unit(t.influence);
        }
        for m in &mut out.memes {
            let mut stack = vec![m];
            while let Some(meme) = stack.pop() {
                meme.virality = unit(meme.virality);
                meme.resonance = unit(meme.resonance);
                stack.extend(meme.mutations.iter_mut());
            }
        }
        for p in &mut out.practices {
            p.frequency = unit(p.frequency);
        }
        for m in &mut out.myths {
            m.influence = unit(m.influence);
        }
        out
    }
}

/// Builder for [`CultureProtocol`].
#[derive(Debug, Clone)]
pub struct CultureProtocolBuilder {
    inner: CultureProtocol,
}

impl CultureProtocolBuilder {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            inner: CultureProtocol {
                id: id.into(),
                name: name.into(),
                description: String::new(),
                value_tokens: Vec::new(),
                memes: Vec::new(),
                practices: Vec::new(),
                myths: Vec::new(),
                origin: CultureOrigin::Synthetic,
                version: "1.0.0".to_string(),
                created_at: Utc::now(),
                tags: Vec::new(),
            },
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.inner.description = description.into();
        self
    }

    pub fn value(mut self, token: ValueToken) -> Self {
        self.inner.value_tokens.push(token);
        self
    }

    pub fn meme(mut self, meme: Meme) -> Self {
        self.inner.memes.push(meme);
        self
    }

    pub fn practice(mut self, practice: Practice) -> Self {
        self.inner.practices.push(practice);
        self
    }

    pub fn myth(mut self, myth: Myth) -> Self {
        self.inner.myths.push(myth);
        self
    }

    pub fn origin(mut self, origin: CultureOrigin) -> Self {
        self.inner.origin = origin;
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.inner.version = version.into();
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.inner.tags.push(tag.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Finish without structural checks; sessions and composers validate
    /// on entry.
    pub fn build(self) -> CultureProtocol {
        self.inner.clamped()
    }

    /// Finish, rejecting meme trees deeper than [`MAX_MUTATION_DEPTH`].
    pub fn try_build(self) -> Result<CultureProtocol> {
        self.inner.validate()?;
        Ok(self.inner.clamped())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_clamp() {
        let t = ValueToken::new("x", 1.7, -0.2, ValueCategory::Social);
        assert_eq!(t.value, 1.0);
        assert_eq!(t.influence, 0.0);

        let p = Practice::new("p", "d", f64::NAN, PracticeContext::Learning);
        assert_eq!(p.frequency, 0.0);
    }

    #[test]
    fn test_clamped_reaches_nested_mutations() {
        let mut protocol = CultureProtocol::builder("c", "C")
            .meme(Meme::new("root", 0.5, 0.5, "o"))
            .build();
        let mut child = Meme::new("child", 0.5, 0.5, "o");
        child.resonance = 3.0;
        protocol.memes[0].mutations.push(child);

        let fixed = protocol.clamped();
        assert_eq!(fixed.memes[0].mutations[0].resonance, 1.0);
        // Source untouched.
        assert_eq!(protocol.memes[0].mutations[0].resonance, 3.0);
    }

    #[test]
    fn test_meme_depth_and_walk() {
        let mut root = Meme::new("root", 0.6, 0.7, "origin");
        root.mutate(&[], "a").unwrap();
        root.mutate(&[], "b").unwrap();
        root.mutate(&[0], "a1").unwrap();

        assert_eq!(root.depth(), 3);
        let order: Vec<&str> = root.walk().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(order, vec!["root", "a", "a1", "b"]);
        assert_eq!(root.mutations[1].origin, "root");
    }

    #[test]
    fn test_mutation_depth_is_bounded() {
        let mut chain = Meme::new("leaf", 0.1, 0.1, "o");
        let mut result = Ok(());
        for i in 0..MAX_MUTATION_DEPTH {
            match Meme::new(format!("level {}", i), 0.1, 0.1, "o").with_mutation(chain.clone()) {
                Ok(m) => chain = m,
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }
        assert!(matches!(
            result,
            Err(CultureError::MutationDepthExceeded { .. })
        ));
        assert_eq!(chain.depth(), MAX_MUTATION_DEPTH);
    }

    fn chain(levels: usize) -> Meme {
        let mut meme = Meme::new("leaf", 0.1, 0.1, "o");
        for i in 1..levels {
            let mut parent = Meme::new(format!("level {}", i), 0.1, 0.1, "o");
            parent.mutations.push(meme);
            meme = parent;
        }
        meme
    }

    #[test]
    fn test_mutate_checks_only_the_new_branch() {
        let mut root = Meme::new("root", 0.5, 0.5, "o");
        root.mutations.push(chain(MAX_MUTATION_DEPTH - 1));
        assert_eq!(root.depth(), MAX_MUTATION_DEPTH);

        // A shallow sibling is fine even though another branch is at the cap.
        let child = root.mutate(&[], "shallow").unwrap();
        assert_eq!(child.origin, "root");
        assert_eq!(root.mutations.len(), 2);

        // Extending the deep branch is not.
        let deepest: Vec<usize> = vec![0; MAX_MUTATION_DEPTH - 1];
        assert!(matches!(
            root.mutate(&deepest, "too far"),
            Err(CultureError::MutationDepthExceeded { .. })
        ));
        assert!(matches!(
            root.mutate(&[5], "nowhere"),
            Err(CultureError::UnknownMutation(path)) if path == vec![5]
        ));
        assert!(root.validate().is_ok());
    }

    #[test]
    fn test_descendant_mutations_are_caught_by_validate() {
        let mut root = chain(MAX_MUTATION_DEPTH);
        assert!(root.validate().is_ok());

        // Mutating through the public field sidesteps the path check.
        let mut node = &mut root;
        while !node.mutations.is_empty() {
            node = &mut node.mutations[0];
        }
        node.mutate(&[], "one more").unwrap();
        assert_eq!(root.depth(), MAX_MUTATION_DEPTH + 1);
        assert!(matches!(
            root.validate(),
            Err(CultureError::MutationDepthExceeded { .. })
        ));

        let builder = CultureProtocol::builder("deep-v1", "Deep").meme(root);
        assert!(matches!(
            builder.clone().try_build(),
            Err(CultureError::MutationDepthExceeded { .. })
        ));
        assert!(builder.build().validate().is_err());
    }

    #[test]
    fn test_from_json_validates_and_clamps() {
        let mut protocol = CultureProtocol::builder("json-v1", "Json")
            .meme(chain(MAX_MUTATION_DEPTH))
            .build();
        protocol.memes[0].resonance = 4.0;
        let json = serde_json::to_string(&protocol).unwrap();
        let back = CultureProtocol::from_json(&json).unwrap();
        assert_eq!(back.memes[0].resonance, 1.0);
        assert_eq!(back.memes[0].depth(), MAX_MUTATION_DEPTH);

        protocol.memes[0] = chain(MAX_MUTATION_DEPTH + 1);
        let json = serde_json::to_string(&protocol).unwrap();
        assert!(matches!(
            CultureProtocol::from_json(&json),
            Err(CultureError::MutationDepthExceeded { .. })
        ));
        assert!(matches!(
            CultureProtocol::from_json("{\"id\": 3}"),
            Err(CultureError::Json(_))
        ));
    }

    #[test]
    fn test_builder_and_element_count() {
        let p = CultureProtocol::builder("b-v1", "Builder")
            .description("built")
            .value(ValueToken::new("Focus", 0.8, 0.6, ValueCategory::Cognitive))
            .meme(Meme::new("say it", 0.4, 0.5, "o"))
            .practice(Practice::new("Review", "look back", 0.5, PracticeContext::Learning))
            .tags(["a", "b"])
            .build();
        assert_eq!(p.element_count(), 3);
        assert_eq!(p.tags, vec!["a", "b"]);
        assert_eq!(p.origin, CultureOrigin::Synthetic);
    }

    #[test]
    fn test_protocol_json_roundtrip() {
        let p = PresetProtocol::Gravity.protocol();
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"cognitive\""));
        let back: CultureProtocol = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, p.id);
        assert_eq!(back.value_tokens.len(), p.value_tokens.len());
        assert_eq!(back.practices[0].context, p.practices[0].context);
        assert_eq!(back.created_at, p.created_at);
    }
}
