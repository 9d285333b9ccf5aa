//! Six-profile evaluation axis.
//!
//! Each profile starts from neutral defaults, sums keyword-triggered deltas
//! over the relevant value tokens and practices, and clamps every field once
//! at the end.  Categorical fields are decided by summed evidence per variant
//! (ties go to the variant declared first), so element order never changes
//! the result.

use std::collections::BTreeMap;
use std::ops::{AddAssign, SubAssign};

use serde::{Deserialize, Serialize};

use super::keywords::{self, KeywordTable};
use super::ordered_sum;
use crate::protocol::{bipolar, unit, CultureProtocol, PracticeContext, ValueCategory};

// ============================================================================
// Categorical profile values
// ============================================================================

/// Temporal range of a culture's thinking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeHorizon {
    Immediate,
    ShortTerm,
    MediumTerm,
    LongTerm,
    Generational,
    Eternal,
}

/// How trust is established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustBuildingStyle {
    Institutional,
    Relational,
    Performance,
    Reciprocal,
    Intuitive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListeningStyle {
    ActiveProbing,
    Empathetic,
    Analytical,
    Patient,
    Intuitive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStyle {
    DirectImmediate,
    ConstructiveDelayed,
    IndirectSuggestive,
    PositiveFocused,
    GrowthOriented,
}

/// Coarse cognitive label derived from a [`CognitionStyleProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CognitiveStyle {
    Intuitive,
    Analytical,
    Holistic,
    Sequential,
}

/// Coarse social label derived from a [`RelationshipModelProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialOrientation {
    Individualistic,
    Collectivistic,
    Balanced,
}

/// Coarse communication label derived from a [`CommunicationStyleProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationStyle {
    Direct,
    Indirect,
    Contextual,
    Expressive,
}

/// Threshold past which a bipolar field counts as leaning one way.
const LEAN: f64 = 0.2;

// ============================================================================
// Profiles
// ============================================================================

/// Time horizon and priority perception. Scalars in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePerceptionProfile {
    pub time_horizon: TimeHorizon,
    pub urgency_bias: f64,
    pub planning_depth: f64,
    pub adaptive_speed: f64,
    pub cyclical_thinking: f64,
    pub moment_awareness: f64,
}

/// Individual/collective and hierarchy/equality leanings.
///
/// Bipolar fields in `[-1, 1]`; positive means collectivist, equal,
/// interdependent, cooperative and informal respectively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipModelProfile {
    pub individualism_collectivism: f64,
    pub hierarchy_equality: f64,
    pub autonomy_interdependence: f64,
    pub competition_cooperation: f64,
    pub formality_informality: f64,
    pub trust_building: TrustBuildingStyle,
}

impl RelationshipModelProfile {
    pub fn orientation(&self) -> SocialOrientation {
        if self.individualism_collectivism > LEAN {
            SocialOrientation::Collectivistic
        } else if self.individualism_collectivism < -LEAN {
            SocialOrientation::Individualistic
        } else {
            SocialOrientation::Balanced
        }
    }
}

/// Thinking, learning and problem-solving patterns.
///
/// Bipolar fields in `[-1, 1]`: positive `intuition_logic` leans intuitive,
/// negative `analytical_holistic` leans analytical, positive
/// `abstract_concrete` leans concrete, positive `exploration_exploitation`
/// leans exploratory.  Tolerances in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CognitionStyleProfile {
    pub analytical_holistic: f64,
    pub abstract_concrete: f64,
    pub intuition_logic: f64,
    pub exploration_exploitation: f64,
    pub risk_tolerance: f64,
    pub ambiguity_tolerance: f64,
}

impl CognitionStyleProfile {
    pub fn dominant_style(&self) -> CognitiveStyle {
        if self.intuition_logic > LEAN {
            CognitiveStyle::Intuitive
        } else if self.intuition_logic < -LEAN {
            CognitiveStyle::Analytical
        } else if self.analytical_holistic < -LEAN {
            CognitiveStyle::Sequential
        } else {
            CognitiveStyle::Holistic
        }
    }
}

/// Communication preferences.  Positive directness leans indirect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunicationStyleProfile {
    pub directness_indirectness: f64,
    pub context_dependency: f64,
    pub emotional_expression: f64,
    pub listening_style: ListeningStyle,
    pub feedback_style: FeedbackStyle,
}

impl CommunicationStyleProfile {
    pub fn dominant_style(&self) -> CommunicationStyle {
        if self.directness_indirectness < -LEAN {
            CommunicationStyle::Direct
        } else if self.directness_indirectness > LEAN {
            CommunicationStyle::Indirect
        } else if self.emotional_expression > 0.7 {
            CommunicationStyle::Expressive
        } else {
            CommunicationStyle::Contextual
        }
    }
}

/// Decision-making leanings.  Positive values mean consensus, intuition,
/// speed and commitment; stakeholder consideration in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionMakingProfile {
    pub consensus_autocracy: f64,
    pub data_intuition: f64,
    pub speed_accuracy: f64,
    pub reversibility_commitment: f64,
    pub stakeholder_consideration: f64,
}

/// Openness to change.  All fields in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptabilityProfile {
    pub learning_agility: f64,
    pub change_resilience: f64,
    pub innovation_openness: f64,
    pub tradition_respect: f64,
    pub experiment_comfort: f64,
}

/// Multi-dimensional evaluation of one protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CultureEvaluationAxis {
    pub time_perception: TimePerceptionProfile,
    pub relationship_model: RelationshipModelProfile,
    pub cognition_style: CognitionStyleProfile,
    pub communication_style: CommunicationStyleProfile,
    pub decision_making: DecisionMakingProfile,
    pub adaptability: AdaptabilityProfile,
}

// ============================================================================
// Evidence helpers
// ============================================================================

/// Order-independent running total.
///
/// Terms are kept and summed in sorted order, so any permutation of the
/// same contributions yields a bit-identical result.
#[derive(Debug, Default)]
struct Sum(Vec<f64>);

impl Sum {
    fn total(&self) -> f64 {
        ordered_sum(self.0.iter().copied())
    }
}

impl AddAssign<f64> for Sum {
    fn add_assign(&mut self, term: f64) {
        self.0.push(term);
    }
}

impl SubAssign<f64> for Sum {
    fn sub_assign(&mut self, term: f64) {
        self.0.push(-term);
    }
}

/// Totals closer than this are a tie.
const TIE_EPSILON: f64 = 1e-9;

/// Summed evidence per categorical variant.
struct Votes<T: Ord> {
    tally: BTreeMap<T, Sum>,
}

impl<T: Ord + Copy> Votes<T> {
    fn new() -> Self {
        Self {
            tally: BTreeMap::new(),
        }
    }

    fn add(&mut self, variant: T, weight: f64) {
        *self.tally.entry(variant).or_default() += weight;
    }

    /// Variant with the largest positive total, first-declared on ties.
    fn winner_or(&self, default: T) -> T {
        let mut best: Option<(T, f64)> = None;
        for (variant, sum) in &self.tally {
            let weight = sum.total();
            if weight <= 0.0 {
                continue;
            }
            match best {
                Some((_, w)) if weight <= w + TIE_EPSILON => {}
                _ => best = Some((*variant, weight)),
            }
        }
        best.map(|(v, _)| v).unwrap_or(default)
    }
}

fn tokens_in(protocol: &CultureProtocol, category: ValueCategory) -> impl Iterator<Item = (&str, f64)> {
    protocol
        .value_tokens
        .iter()
        .filter(move |t| t.category == category)
        .map(|t| (t.name.as_str(), t.value))
}

fn hit(table: KeywordTable, text: &str) -> bool {
    table.matches(text)
}

// ============================================================================
// Analysis
// ============================================================================

/// Compute all six profiles for `protocol`.
pub fn analyze(protocol: &CultureProtocol) -> CultureEvaluationAxis {
    CultureEvaluationAxis {
        time_perception: time_perception(protocol),
        relationship_model: relationship_model(protocol),
        cognition_style: cognition_style(protocol),
        communication_style: communication_style(protocol),
        decision_making: decision_making(protocol),
        adaptability: adaptability(protocol),
    }
}

pub fn time_perception(protocol: &CultureProtocol) -> TimePerceptionProfile {
    let (mut urgency, mut planning, mut speed, mut moment) =
        (Sum::default(), Sum::default(), Sum::default(), Sum::default());
    let mut horizon = Votes::new();

    for (name, v) in tokens_in(protocol, ValueCategory::Temporal) {
        if hit(keywords::TURNING_POINT, name) {
            urgency += v * 0.3;
            speed += v * 0.2;
            horizon.add(TimeHorizon::ShortTerm, v);
        }
        if hit(keywords::FUTURE, name) {
            planning += v * 0.4;
            urgency -= v * 0.2;
            horizon.add(TimeHorizon::LongTerm, v);
        }
        if hit(keywords::PRESENT, name) {
            moment += v * 0.3;
            horizon.add(TimeHorizon::Immediate, v);
        }
    }

    for practice in &protocol.practices {
        let f = practice.frequency;
        if hit(keywords::MEASURE, &practice.name) {
            planning += f * 0.2;
        }
        if hit(keywords::SPEED, &practice.description) {
            urgency += f * 0.2;
        }
    }

    TimePerceptionProfile {
        time_horizon: horizon.winner_or(TimeHorizon::MediumTerm),
        urgency_bias: unit(0.5 + urgency.total()),
        planning_depth: unit(0.5 + planning.total()),
        adaptive_speed: unit(0.5 + speed.total()),
        cyclical_thinking: 0.5,
        moment_awareness: unit(0.5 + moment.total()),
    }
}

pub fn relationship_model(protocol: &CultureProtocol) -> RelationshipModelProfile {
    let mut collective = Sum::default();
    let mut equality = Sum::default();
    let mut interdependence = Sum::default();
    let mut cooperation = Sum::default();
    let mut informality = Sum::default();
    let mut trust = Votes::new();

    for (name, v) in tokens_in(protocol, ValueCategory::Social) {
        if hit(keywords::HARMONY, name) {
            collective += v * 0.5;
            cooperation += v * 0.4;
        }
        if hit(keywords::INDIVIDUAL, name) {
            collective -= v * 0.5;
            interdependence -= v * 0.3;
        }
        if hit(keywords::HIERARCHY, name) {
            equality -= v * 0.4;
        }
        if hit(keywords::EQUALITY, name) {
            equality += v * 0.4;
        }
    }

    for practice in &protocol.practices {
        let f = practice.frequency;
        match practice.context {
            PracticeContext::Relationship if hit(keywords::RESONANCE, &practice.name) => {
                collective += f * 0.3;
                cooperation += f * 0.3;
            }
            PracticeContext::Communication => {
                if hit(keywords::INDIRECT, &practice.description) {
                    informality += f * 0.2;
                } else if hit(keywords::DIRECT, &practice.description) {
                    informality -= f * 0.2;
                }
            }
            _ => {}
        }
    }

    for meme in &protocol.memes {
        if hit(keywords::HEART, &meme.content) {
            trust.add(TrustBuildingStyle::Intuitive, meme.resonance);
        } else if hit(keywords::ACHIEVEMENT, &meme.content) {
            trust.add(TrustBuildingStyle::Performance, meme.resonance);
        }
    }

    RelationshipModelProfile {
        individualism_collectivism: bipolar(collective.total()),
        hierarchy_equality: bipolar(equality.total()),
        autonomy_interdependence: bipolar(interdependence.total()),
        competition_cooperation: bipolar(cooperation.total()),
        formality_informality: bipolar(informality.total()),
        trust_building: trust.winner_or(TrustBuildingStyle::Relational),
    }
}

pub fn cognition_style(protocol: &CultureProtocol) -> CognitionStyleProfile {
    let (mut holistic, mut concrete, mut intuitive, mut exploration) =
        (Sum::default(), Sum::default(), Sum::default(), Sum::default());
    let (mut risk, mut ambiguity) = (Sum::default(), Sum::default());

    for (name, v) in tokens_in(protocol, ValueCategory::Cognitive) {
        if hit(keywords::INTUITION, name) {
            intuitive += v * 0.6;
            ambiguity += v * 0.3;
        }
        if hit(keywords::LOGIC, name) {
            intuitive -= v * 0.6;
            holistic -= v * 0.4;
        }
        if hit(keywords::CAUSAL, name) {
            holistic -= v * 0.3;
        }
        if hit(keywords::CREATIVE, name) {
            exploration += v * 0.4;
            risk += v * 0.3;
        }
    }

    for practice in &protocol.practices {
        let f = practice.frequency;
        if hit(keywords::MEASURE, &practice.name) {
            holistic -= f * 0.2;
        }
        if hit(keywords::OBSERVE, &practice.name) {
            intuitive += f * 0.2;
            concrete += f * 0.1;
        }
    }

    CognitionStyleProfile {
        analytical_holistic: bipolar(holistic.total()),
        abstract_concrete: bipolar(concrete.total()),
        intuition_logic: bipolar(intuitive.total()),
        exploration_exploitation: bipolar(exploration.total()),
        risk_tolerance: unit(0.5 + risk.total()),
        ambiguity_tolerance: unit(0.5 + ambiguity.total()),
    }
}

pub fn communication_style(protocol: &CultureProtocol) -> CommunicationStyleProfile {
    let (mut indirectness, mut context, mut emotion) = (Sum::default(), Sum::default(), Sum::default());
    let mut listening = Votes::new();
    let mut feedback = Votes::new();

    for (name, v) in tokens_in(protocol, ValueCategory::Emotional) {
        if hit(keywords::EXPRESSION, name) {
            emotion += v * 0.3;
            indirectness -= v * 0.2;
        }
    }

    for practice in protocol
        .practices
        .iter()
        .filter(|p| p.context == PracticeContext::Communication)
    {
        let f = practice.frequency;
        let description = practice.description.as_str();
        if hit(keywords::INDIRECT, description) {
            indirectness += f * 0.3;
            feedback.add(FeedbackStyle::IndirectSuggestive, f);
        } else if hit(keywords::DIRECT, description) {
            indirectness -= f * 0.3;
            feedback.add(FeedbackStyle::DirectImmediate, f);
        }
        if hit(keywords::PERCEPTION, description) {
            context += f * 0.2;
            listening.add(ListeningStyle::Intuitive, f);
        }
    }

    for meme in &protocol.memes {
        if hit(keywords::HEART, &meme.content) {
            emotion += meme.resonance * 0.2;
        }
    }

    CommunicationStyleProfile {
        directness_indirectness: bipolar(indirectness.total()),
        context_dependency: unit(0.5 + context.total()),
        emotional_expression: unit(0.5 + emotion.total()),
        listening_style: listening.winner_or(ListeningStyle::Empathetic),
        feedback_style: feedback.winner_or(FeedbackStyle::ConstructiveDelayed),
    }
}

pub fn decision_making(protocol: &CultureProtocol) -> DecisionMakingProfile {
    let (mut consensus, mut intuition, mut speed, mut commitment) =
        (Sum::default(), Sum::default(), Sum::default(), Sum::default());
    let mut stakeholders = Sum::default();

    for practice in protocol
        .practices
        .iter()
        .filter(|p| p.context == PracticeContext::DecisionMaking)
    {
        let f = practice.frequency;
        let description = practice.description.as_str();
        if hit(keywords::INTUITION, description) {
            intuition += f * 0.4;
        }
        if hit(keywords::MEASURE, &practice.name) {
            intuition -= f * 0.3;
            speed -= f * 0.2;
        }
        if hit(keywords::SPEED, description) {
            speed += f * 0.3;
        }
        if hit(keywords::COMMITMENT, description) {
            commitment += f * 0.2;
        }
        if hit(keywords::REVERSIBLE, description) {
            commitment -= f * 0.2;
        }
    }

    for (name, v) in tokens_in(protocol, ValueCategory::Social) {
        if hit(keywords::HARMONY, name) {
            consensus += v * 0.3;
            stakeholders += v * 0.2;
        }
    }

    DecisionMakingProfile {
        consensus_autocracy: bipolar(consensus.total()),
        data_intuition: bipolar(intuition.total()),
        speed_accuracy: bipolar(speed.total()),
        reversibility_commitment: bipolar(commitment.total()),
        stakeholder_consideration: unit(0.5 + stakeholders.total()),
    }
}

pub fn adaptability(protocol: &CultureProtocol) -> AdaptabilityProfile {
    let mut learning = Sum::default();
    let mut resilience = Sum::default();
    let mut innovation = Sum::default();
    let mut tradition = Sum::default();
    let mut experiment = Sum::default();

    for token in &protocol.value_tokens {
        let (name, v) = (token.name.as_str(), token.value);
        if hit(keywords::ADAPT, name) {
            learning += v * 0.3;
            resilience += v * 0.3;
        }
        if hit(keywords::CREATIVE, name) {
            innovation += v * 0.4;
            experiment += v * 0.3;
        }
        if hit(keywords::TRADITION, name) {
            tradition += v * 0.3;
            innovation -= v * 0.2;
        }
    }

    for practice in protocol
        .practices
        .iter()
        .filter(|p| p.context == PracticeContext::Learning)
    {
        learning += practice.frequency * 0.2;
    }

    AdaptabilityProfile {
        learning_agility: unit(0.5 + learning.total()),
        change_resilience: unit(0.5 + resilience.total()),
        innovation_openness: unit(0.5 + innovation.total()),
        tradition_respect: unit(0.5 + tradition.total()),
        experiment_comfort: unit(0.5 + experiment.total()),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::fixtures::{adversarial, out_of_range, reorderings};
    use crate::protocol::{Meme, Practice, PresetProtocol, ValueToken};

    fn empty() -> CultureProtocol {
        CultureProtocol::builder("empty", "Empty").build()
    }

    #[test]
    fn test_empty_protocol_yields_neutral_defaults() {
        let axis = analyze(&empty());
        assert_eq!(axis.time_perception.time_horizon, TimeHorizon::MediumTerm);
        assert_eq!(axis.time_perception.urgency_bias, 0.5);
        assert_eq!(axis.relationship_model.individualism_collectivism, 0.0);
        assert_eq!(axis.relationship_model.trust_building, TrustBuildingStyle::Relational);
        assert_eq!(axis.cognition_style.risk_tolerance, 0.5);
        assert_eq!(axis.communication_style.listening_style, ListeningStyle::Empathetic);
        assert_eq!(
            axis.communication_style.feedback_style,
            FeedbackStyle::ConstructiveDelayed
        );
        assert_eq!(axis.decision_making.stakeholder_consideration, 0.5);
        assert_eq!(axis.adaptability.learning_agility, 0.5);
    }

    #[test]
    fn test_gravity_time_perception() {
        let tp = time_perception(&PresetProtocol::Gravity.protocol());
        // Turning Point Detection (0.99): urgency +0.297, speed +0.198
        assert_eq!(tp.time_horizon, TimeHorizon::ShortTerm);
        assert!((tp.urgency_bias - 0.797).abs() < 1e-9);
        assert!((tp.adaptive_speed - 0.698).abs() < 1e-9);
        // Situation Weight Measurement (0.9): planning +0.18
        assert!((tp.planning_depth - 0.68).abs() < 1e-9);
    }

    #[test]
    fn test_gravity_cognition_leans_intuitive() {
        let cs = cognition_style(&PresetProtocol::Gravity.protocol());
        // Intuition First 0.57 + Causal Sensing 0.54, clamped once
        assert_eq!(cs.intuition_logic, 1.0);
        // Causal Sensing -0.27, Situation Weight Measurement -0.18
        assert!((cs.analytical_holistic + 0.45).abs() < 1e-9);
        assert_eq!(cs.dominant_style(), CognitiveStyle::Intuitive);
    }

    #[test]
    fn test_resonance_relationship_is_collective() {
        let rm = relationship_model(&PresetProtocol::Resonance.protocol());
        // Harmony Focus 0.9*0.5 + Resonance Recording 0.9*0.3
        assert!((rm.individualism_collectivism - 0.72).abs() < 1e-9);
        assert_eq!(rm.orientation(), SocialOrientation::Collectivistic);
        // "The moment every heart becomes one"
        assert_eq!(rm.trust_building, TrustBuildingStyle::Intuitive);
    }

    #[test]
    fn test_fields_are_clamped() {
        let mut builder = CultureProtocol::builder("loud", "Loud");
        for i in 0..10 {
            builder = builder
                .value(ValueToken::new(format!("Harmony {}", i), 1.0, 1.0, ValueCategory::Social))
                .value(ValueToken::new(format!("Intuition {}", i), 1.0, 1.0, ValueCategory::Cognitive));
        }
        let axis = analyze(&builder.build());
        assert_eq!(axis.relationship_model.individualism_collectivism, 1.0);
        assert_eq!(axis.cognition_style.intuition_logic, 1.0);
        assert_eq!(axis.cognition_style.ambiguity_tolerance, 1.0);
        assert_eq!(axis.decision_making.stakeholder_consideration, 1.0);
    }

    #[test]
    fn test_accumulation_is_order_independent() {
        // Incremental clamping would give a different answer here: the
        // tradition token pulls innovation down before the creative tokens
        // push it up past the ceiling.
        let tokens = vec![
            ValueToken::new("Tradition", 1.0, 0.5, ValueCategory::Aesthetic),
            ValueToken::new("Creative Spark", 1.0, 0.5, ValueCategory::Cognitive),
            ValueToken::new("Innovation Drive", 1.0, 0.5, ValueCategory::Cognitive),
            ValueToken::new("Future Sight", 0.6, 0.5, ValueCategory::Temporal),
            ValueToken::new("Present Moment", 0.6, 0.5, ValueCategory::Temporal),
        ];
        let forward = CultureProtocol {
            value_tokens: tokens.clone(),
            ..empty()
        };
        let mut reversed_tokens = tokens;
        reversed_tokens.reverse();
        let reversed = CultureProtocol {
            value_tokens: reversed_tokens,
            ..empty()
        };

        let a = analyze(&forward);
        let b = analyze(&reversed);
        assert!((a.adaptability.innovation_openness - b.adaptability.innovation_openness).abs() < 1e-12);
        assert_eq!(a.time_perception.time_horizon, b.time_perception.time_horizon);
        // Equal evidence goes to the first-declared horizon.
        assert_eq!(a.time_perception.time_horizon, TimeHorizon::Immediate);
    }

    #[test]
    fn test_near_tied_votes_do_not_depend_on_order() {
        // 0.1 + 0.2 + 0.3 lands one ulp away from 0.6.
        let tokens = vec![
            ValueToken::new("Turning A", 0.1, 0.5, ValueCategory::Temporal),
            ValueToken::new("Turning B", 0.2, 0.5, ValueCategory::Temporal),
            ValueToken::new("Turning C", 0.3, 0.5, ValueCategory::Temporal),
            ValueToken::new("Present Moment", 0.6, 0.5, ValueCategory::Temporal),
        ];
        let forward = CultureProtocol {
            value_tokens: tokens.clone(),
            ..empty()
        };
        let reversed = CultureProtocol {
            value_tokens: tokens.into_iter().rev().collect(),
            ..empty()
        };

        let a = time_perception(&forward);
        let b = time_perception(&reversed);
        assert_eq!(a, b);
        assert_eq!(a.time_horizon, TimeHorizon::Immediate);
    }

    #[test]
    fn test_reordered_elements_give_identical_axes() {
        let mut protocols = PresetProtocol::all_protocols();
        protocols.push(adversarial());
        for protocol in &protocols {
            let expected = analyze(protocol);
            for variant in reorderings(protocol) {
                assert_eq!(analyze(&variant), expected, "{}", protocol.id);
            }
        }
    }

    fn bounded_fields(axis: &CultureEvaluationAxis) -> Vec<(f64, f64, f64)> {
        let (tp, rm, cs) = (&axis.time_perception, &axis.relationship_model, &axis.cognition_style);
        let (cm, dm, ad) = (&axis.communication_style, &axis.decision_making, &axis.adaptability);
        let in_unit = |x: f64| (x, 0.0, 1.0);
        let in_bipolar = |x: f64| (x, -1.0, 1.0);
        vec![
            in_unit(tp.urgency_bias),
            in_unit(tp.planning_depth),
            in_unit(tp.adaptive_speed),
            in_unit(tp.cyclical_thinking),
            in_unit(tp.moment_awareness),
            in_bipolar(rm.individualism_collectivism),
            in_bipolar(rm.hierarchy_equality),
            in_bipolar(rm.autonomy_interdependence),
            in_bipolar(rm.competition_cooperation),
            in_bipolar(rm.formality_informality),
            in_bipolar(cs.analytical_holistic),
            in_bipolar(cs.abstract_concrete),
            in_bipolar(cs.intuition_logic),
            in_bipolar(cs.exploration_exploitation),
            in_unit(cs.risk_tolerance),
            in_unit(cs.ambiguity_tolerance),
            in_bipolar(cm.directness_indirectness),
            in_unit(cm.context_dependency),
            in_unit(cm.emotional_expression),
            in_bipolar(dm.consensus_autocracy),
            in_bipolar(dm.data_intuition),
            in_bipolar(dm.speed_accuracy),
            in_bipolar(dm.reversibility_commitment),
            in_unit(dm.stakeholder_consideration),
            in_unit(ad.learning_agility),
            in_unit(ad.change_resilience),
            in_unit(ad.innovation_openness),
            in_unit(ad.tradition_respect),
            in_unit(ad.experiment_comfort),
        ]
    }

    #[test]
    fn test_out_of_range_inputs_stay_in_bounds() {
        let mut protocols = PresetProtocol::all_protocols();
        protocols.push(adversarial());
        protocols.push(out_of_range());
        protocols.push(empty());
        for protocol in &protocols {
            for (value, lo, hi) in bounded_fields(&analyze(protocol)) {
                assert!(value >= lo && value <= hi, "{}: {} outside [{}, {}]", protocol.id, value, lo, hi);
            }
        }
    }

    #[test]
    fn test_hierarchy_and_commitment_rules() {
        let p = CultureProtocol::builder("h", "H")
            .value(ValueToken::new("Strict Hierarchy", 1.0, 0.5, ValueCategory::Social))
            .practice(Practice::new(
                "Vow",
                "commit to the plan",
                1.0,
                PracticeContext::DecisionMaking,
            ))
            .build();
        let axis = analyze(&p);
        assert!((axis.relationship_model.hierarchy_equality + 0.4).abs() < 1e-9);
        assert!((axis.decision_making.reversibility_commitment - 0.2).abs() < 1e-9);

        let flat = CultureProtocol::builder("f", "F")
            .value(ValueToken::new("Equal Voice", 1.0, 0.5, ValueCategory::Social))
            .practice(Practice::new("Loop", "iterate often", 1.0, PracticeContext::DecisionMaking))
            .build();
        let axis = analyze(&flat);
        assert!((axis.relationship_model.hierarchy_equality - 0.4).abs() < 1e-9);
        assert!((axis.decision_making.reversibility_commitment + 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_communication_direct_vs_indirect() {
        let direct = CultureProtocol::builder("d", "D")
            .practice(Practice::new(
                "Open Talk",
                "Say what you mean directly",
                1.0,
                PracticeContext::Communication,
            ))
            .build();
        let indirect = CultureProtocol::builder("i", "I")
            .practice(Practice::new(
                "Hinting",
                "Convey concerns through indirect suggestion",
                1.0,
                PracticeContext::Communication,
            ))
            .build();

        let d = communication_style(&direct);
        let i = communication_style(&indirect);
        assert!((d.directness_indirectness + 0.3).abs() < 1e-9);
        assert_eq!(d.feedback_style, FeedbackStyle::DirectImmediate);
        assert_eq!(d.dominant_style(), CommunicationStyle::Direct);
        assert!((i.directness_indirectness - 0.3).abs() < 1e-9);
        assert_eq!(i.feedback_style, FeedbackStyle::IndirectSuggestive);
    }

    #[test]
    fn test_meme_votes_pick_strongest_evidence() {
        let p = CultureProtocol::builder("m", "M")
            .meme(Meme::new("Results speak louder", 0.5, 0.9, "o"))
            .meme(Meme::new("Trust what you feel", 0.5, 0.4, "o"))
            .build();
        assert_eq!(
            relationship_model(&p).trust_building,
            TrustBuildingStyle::Performance
        );
    }
}
