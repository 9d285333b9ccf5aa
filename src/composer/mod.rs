//! Protocol composer.
//!
//! Blends two or more protocols into a new one, amplifies single aspects
//! of a protocol, and recommends promising pairings.
//!
//! ```text
//! blend(protocols, weights, strategy)
//!   ├─ validate: arity → input count → weights → meme depth
//!   ├─ normalize weights
//!   ├─ strategy.apply(...)          (strategy.rs / fusion.rs)
//!   ├─ set_compatibility + novelty  (metrics.rs)
//!   └─ append BlendingResult to history
//! ```
//!
//! The only source of non-determinism is the random source used by
//! creative fusion; [`Composer::with_seed`] pins it.

pub mod amplify;
pub mod fusion;
pub mod metrics;
pub mod recommend;
pub mod strategy;

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{CultureError, Result};
use crate::protocol::CultureProtocol;

pub use amplify::{AmplificationRecord, AmplificationTarget};
pub use recommend::BlendRecommendation;
pub use strategy::BlendStrategy;

/// Outcome of one blend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendingResult {
    pub new_protocol: CultureProtocol,
    /// Normalized weight per source protocol id.
    pub blend_ratio: BTreeMap<String, f64>,
    pub strategy_used: BlendStrategy,
    pub synthesis_notes: Vec<String>,
    pub compatibility_score: f64,
    pub novelty_score: f64,
    pub timestamp: DateTime<Utc>,
}

/// Check inputs and return weights divided by their sum.
fn normalize_weights(protocols: &[CultureProtocol], weights: &[f64]) -> Result<Vec<f64>> {
    if protocols.len() != weights.len() {
        return Err(CultureError::ArityMismatch {
            protocols: protocols.len(),
            weights: weights.len(),
        });
    }
    if protocols.len() < 2 {
        return Err(CultureError::InsufficientInputs {
            got: protocols.len(),
        });
    }
    if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(CultureError::InvalidWeights(format!(
            "weights must be finite and non-negative, got {}",
            bad
        )));
    }
    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return Err(CultureError::InvalidWeights(format!(
            "weights must sum to a positive finite value, got {}",
            total
        )));
    }
    Ok(weights.iter().map(|w| w / total).collect())
}

fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Composer context object.
///
/// Blend and amplification histories are append-only and guarded by locks,
/// so one composer can be shared across threads.
pub struct Composer {
    history: RwLock<Vec<BlendingResult>>,
    amplifications: RwLock<Vec<AmplificationRecord>>,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl Composer {
    /// Composer with an entropy-seeded random source.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Composer whose random choices are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng<R: RngCore + Send + 'static>(rng: R) -> Self {
        Self {
            history: RwLock::new(Vec::new()),
            amplifications: RwLock::new(Vec::new()),
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// Blend `protocols` under `strategy`.
    ///
    /// Fails before any computation on mismatched lengths, fewer than two
    /// inputs, weights that are negative or do not sum to a positive finite
    /// value, or an input whose meme trees are too deep.
    /// A `custom_name` replaces the generated name and id.
    pub fn blend(
        &self,
        protocols: &[CultureProtocol],
        weights: &[f64],
        strategy: BlendStrategy,
        custom_name: Option<&str>,
    ) -> Result<BlendingResult> {
        let normalized = normalize_weights(protocols, weights)?;
        for protocol in protocols {
            protocol.validate()?;
        }

        log::info!(
            "Blending {} protocols with strategy {}",
            protocols.len(),
            strategy
        );

        let mut synthesis = {
            let mut rng = self.rng.lock();
            strategy.apply(protocols, &normalized, &mut **rng)
        };

        if let Some(name) = custom_name {
            synthesis.protocol.name = name.to_string();
            synthesis.protocol.id = format!("custom-{}-v1", slug(name));
        }
        let new_protocol = synthesis.protocol.clamped();

        let mut blend_ratio = BTreeMap::new();
        for (protocol, w) in protocols.iter().zip(&normalized) {
            *blend_ratio.entry(protocol.id.clone()).or_insert(0.0) += w;
        }

        let result = BlendingResult {
            compatibility_score: metrics::set_compatibility(protocols),
            novelty_score: metrics::novelty(&new_protocol, protocols),
            new_protocol,
            blend_ratio,
            strategy_used: strategy,
            synthesis_notes: synthesis.notes,
            timestamp: Utc::now(),
        };

        log::info!(
            "Blend produced '{}' (compatibility {:.3}, novelty {:.3})",
            result.new_protocol.id,
            result.compatibility_score,
            result.novelty_score
        );

        self.history.write().push(result.clone());
        Ok(result)
    }

    /// Amplified copy of `protocol`; the source is not modified.
    pub fn amplify(
        &self,
        protocol: &CultureProtocol,
        target: AmplificationTarget,
        intensity: f64,
    ) -> Result<CultureProtocol> {
        protocol.validate()?;
        let (amplified, tokens_amplified) = amplify::amplify(protocol, target, intensity)?;

        log::info!(
            "Amplified {} in '{}' by {}x ({} tokens)",
            target,
            protocol.id,
            intensity,
            tokens_amplified
        );
        if tokens_amplified == 0 {
            log::debug!("No value token of '{}' matched target {}", protocol.id, target);
        }

        self.amplifications.write().push(AmplificationRecord {
            source_id: protocol.id.clone(),
            result_id: amplified.id.clone(),
            target,
            intensity,
            tokens_amplified,
            timestamp: Utc::now(),
        });
        Ok(amplified)
    }

    pub fn get_blend_recommendations(&self, protocols: &[CultureProtocol]) -> Vec<BlendRecommendation> {
        let recommendations = recommend::get_blend_recommendations(protocols);
        log::debug!(
            "{} blend recommendations from {} protocols",
            recommendations.len(),
            protocols.len()
        );
        recommendations
    }

    /// Snapshot of the blend history, oldest first.
    pub fn history(&self) -> Vec<BlendingResult> {
        self.history.read().clone()
    }

    pub fn amplification_history(&self) -> Vec<AmplificationRecord> {
        self.amplifications.read().clone()
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Composer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composer")
            .field("blends", &self.history.read().len())
            .field("amplifications", &self.amplifications.read().len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
