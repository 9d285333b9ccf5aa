//! Built-in sample protocols.
//!
//! Three small, contrasting cultures used by the demo binary and the test
//! suites.  They are ordinary protocols and carry no special behavior.

use serde::{Deserialize, Serialize};

use super::{
    CultureOrigin, CultureProtocol, Meme, Myth, Practice, PracticeContext, ValueCategory,
    ValueToken,
};

/// Preset protocol identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetProtocol {
    /// Importance sensing and turning-point detection.
    Gravity,
    /// Reverse causality and long-horizon optimisation.
    Delta,
    /// Collective resonance and harmony recording.
    Resonance,
}

impl PresetProtocol {
    /// All presets.
    pub const ALL: [PresetProtocol; 3] = [Self::Gravity, Self::Delta, Self::Resonance];

    /// Build the protocol for this preset.
    pub fn protocol(&self) -> CultureProtocol {
        match self {
            Self::Gravity => CultureProtocol::builder("iona-gravita-v1", "Iona Gravita Protocol")
                .description("Cognitive style specialised in sensing situational gravity and detecting turning points")
                .value(ValueToken::new("Intuition First", 0.95, 0.8, ValueCategory::Cognitive))
                .value(ValueToken::new("Turning Point Detection", 0.99, 0.9, ValueCategory::Temporal))
                .value(ValueToken::new("Causal Sensing", 0.9, 0.7, ValueCategory::Cognitive))
                .meme(Meme::new(
                    "Only by knowing the weight do you learn the meaning",
                    0.8,
                    0.9,
                    "Teaching of the gravity oracle",
                ))
                .meme(Meme::new("Listen with the ear of the heart", 0.7, 0.85, "Expression of intuitive awareness"))
                .practice(
                    Practice::new(
                        "Situation Weight Measurement",
                        "Intuitively measure the importance of causal links in every situation",
                        0.9,
                        PracticeContext::DecisionMaking,
                    )
                    .with_triggers(["new information", "signs of change"])
                    .with_outcomes(["appropriate prioritisation"]),
                )
                .myth(Myth::new(
                    "Legend of the Gravity Oracle",
                    "In ancient times an oracle felt the gravity of the cosmos and read the fate of the stars",
                    "The value of deep understanding through intuitive wisdom",
                    vec!["sage".into(), "prophet".into()],
                    0.85,
                ))
                .origin(CultureOrigin::Experimental)
                .tags(["gravity", "intuition", "prediction"])
                .build(),

            Self::Delta => CultureProtocol::builder("rua-delta-v1", "Rua Delta Cross Protocol")
                .description("Long-horizon optimisation by reasoning backward from the future")
                .value(ValueToken::new("Future Orientation", 0.95, 0.85, ValueCategory::Temporal))
                .value(ValueToken::new("Backward Reasoning", 0.9, 0.8, ValueCategory::Cognitive))
                .value(ValueToken::new("Long-term Value", 0.85, 0.75, ValueCategory::Aesthetic))
                .meme(Meme::new("Begin from the end", 0.75, 0.8, "Core of reverse causal thinking"))
                .meme(Meme::new("Failure is a staircase to success", 0.7, 0.75, "Expression of long-term values"))
                .practice(
                    Practice::new(
                        "Future Back-casting",
                        "Reason backward from an ideal future to the best path from the present",
                        0.85,
                        PracticeContext::DecisionMaking,
                    )
                    .with_triggers(["important choice", "long-term planning"])
                    .with_outcomes(["optimal strategy"]),
                )
                .myth(Myth::new(
                    "The Time Weaver",
                    "A sage who sees through the future and reweaves the threads of fate",
                    "Wisdom and agency beyond time",
                    vec!["time mage".into()],
                    0.8,
                ))
                .origin(CultureOrigin::Experimental)
                .tags(["future", "logic", "optimization"])
                .build(),

            Self::Resonance => CultureProtocol::builder("mily-cadmion-v1", "Mily Cadmion Protocol")
                .description("Collective intelligence through resonance, recording and harmony")
                .value(ValueToken::new("Harmony Focus", 0.9, 0.85, ValueCategory::Social))
                .value(ValueToken::new("Resonance Sensing", 0.88, 0.8, ValueCategory::Emotional))
                .value(ValueToken::new("Record Keeping", 0.85, 0.7, ValueCategory::Cognitive))
                .meme(Meme::new("The moment every heart becomes one", 0.85, 0.9, "Experience of resonance"))
                .meme(Meme::new("Memory is a gift to the future", 0.8, 0.85, "Value of records"))
                .practice(
                    Practice::new(
                        "Resonance Recording",
                        "Sense the harmony of the team and record the best balance",
                        0.9,
                        PracticeContext::Relationship,
                    )
                    .with_triggers(["team activity", "collaboration"])
                    .with_outcomes(["sustained harmony"]),
                )
                .myth(Myth::new(
                    "The Recorder of Harmony",
                    "A being that has recorded every moment of human harmony since antiquity",
                    "The value of collective wisdom and harmony",
                    vec!["recorder".into(), "harmonizer".into()],
                    0.82,
                ))
                .origin(CultureOrigin::Experimental)
                .tags(["harmony", "empathy", "memory"])
                .build(),
        }
    }

    /// Build every preset, in [`PresetProtocol::ALL`] order.
    pub fn all_protocols() -> Vec<CultureProtocol> {
        Self::ALL.iter().map(|p| p.protocol()).collect()
    }
}
