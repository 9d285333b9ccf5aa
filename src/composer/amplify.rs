//! Targeted amplification of a single protocol.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CultureError, Result};
use crate::protocol::{unit, CultureOrigin, CultureProtocol};

/// Aspect of a protocol that can be amplified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmplificationTarget {
    Intuition,
    Logic,
    Creativity,
    Efficiency,
    Empathy,
    Harmony,
    Innovation,
}

impl AmplificationTarget {
    pub const ALL: [AmplificationTarget; 7] = [
        Self::Intuition,
        Self::Logic,
        Self::Creativity,
        Self::Efficiency,
        Self::Empathy,
        Self::Harmony,
        Self::Innovation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Intuition => "intuition",
            Self::Logic => "logic",
            Self::Creativity => "creativity",
            Self::Efficiency => "efficiency",
            Self::Empathy => "empathy",
            Self::Harmony => "harmony",
            Self::Innovation => "innovation",
        }
    }

    /// Stems a value token name must contain to be amplified.
    pub fn stems(&self) -> &'static [&'static str] {
        match self {
            Self::Intuition => &["intuiti", "sensing"],
            Self::Logic => &["logic", "analy"],
            Self::Creativity => &["creativ", "ideation"],
            Self::Efficiency => &["efficien", "optimi"],
            Self::Empathy => &["empath", "compassion"],
            Self::Harmony => &["harmony", "resonan"],
            Self::Innovation => &["innovat", "novel"],
        }
    }

    fn matches(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.stems().iter().any(|stem| lower.contains(stem))
    }
}

impl fmt::Display for AmplificationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// History entry appended for each amplification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmplificationRecord {
    pub source_id: String,
    pub result_id: String,
    pub target: AmplificationTarget,
    pub intensity: f64,
    pub tokens_amplified: usize,
    pub timestamp: DateTime<Utc>,
}

/// Return an amplified copy of `protocol` and the number of tokens scaled.
///
/// Matching value tokens get value and influence multiplied by `intensity`
/// and clamped to `[0, 1]`.  The source is left untouched.
pub fn amplify(
    protocol: &CultureProtocol,
    target: AmplificationTarget,
    intensity: f64,
) -> Result<(CultureProtocol, usize)> {
    if !intensity.is_finite() || intensity < 0.0 {
        return Err(CultureError::InvalidIntensity(intensity));
    }

    let mut amplified = protocol.clone();
    amplified.id = format!("{}-amplified-{}", protocol.id, target);
    amplified.name = format!("{} ({} amplified)", protocol.name, target);
    amplified.description = format!(
        "{} - {} amplified {}x",
        protocol.description, target, intensity
    );
    amplified.origin = CultureOrigin::Evolved;
    amplified.version = format!("{}+{}", protocol.version, target);
    amplified.created_at = Utc::now();
    amplified.tags.push(format!("amplified_{}", target));

    let mut count = 0;
    for token in amplified.value_tokens.iter_mut().filter(|t| target.matches(&t.name)) {
        token.value = unit(token.value * intensity);
        token.influence = unit(token.influence * intensity);
        count += 1;
    }

    Ok((amplified, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PresetProtocol;

    #[test]
    fn test_amplify_intuition() {
        let source = PresetProtocol::Gravity.protocol();
        let (out, count) = amplify(&source, AmplificationTarget::Intuition, 1.5).unwrap();

        // "Intuition First" and "Causal Sensing"
        assert_eq!(count, 2);
        assert_eq!(out.id, "iona-gravita-v1-amplified-intuition");
        assert_eq!(out.version, "1.0.0+intuition");
        assert_eq!(out.origin, CultureOrigin::Evolved);
        assert_eq!(out.tags.last().map(String::as_str), Some("amplified_intuition"));
        assert_eq!(out.value_tokens[0].value, 1.0);
        // 0.7 * 1.5 clamps
        assert_eq!(out.value_tokens[2].influence, 1.0);
        // Untouched token.
        assert_eq!(out.value_tokens[1], source.value_tokens[1]);
        assert_eq!(out.memes, source.memes);
    }

    #[test]
    fn test_source_is_not_mutated() {
        let source = PresetProtocol::Resonance.protocol();
        let before = source.clone();
        let _ = amplify(&source, AmplificationTarget::Harmony, 3.0).unwrap();
        assert_eq!(source, before);
    }

    #[test]
    fn test_unmatched_target_changes_no_tokens() {
        let source = PresetProtocol::Delta.protocol();
        let (out, count) = amplify(&source, AmplificationTarget::Empathy, 0.5).unwrap();
        assert_eq!(count, 0);
        assert_eq!(out.value_tokens, source.value_tokens);

        let (out, count) = amplify(&source, AmplificationTarget::Efficiency, 0.0).unwrap();
        assert_eq!(count, 0);
        assert_eq!(out.value_tokens, source.value_tokens);
    }

    #[test]
    fn test_invalid_intensity() {
        let source = PresetProtocol::Delta.protocol();
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                amplify(&source, AmplificationTarget::Logic, bad),
                Err(CultureError::InvalidIntensity(_))
            ));
        }
    }
}
