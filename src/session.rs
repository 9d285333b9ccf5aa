//! Explicit session context.
//!
//! A [`CultureSession`] owns one evaluation engine, one composer and a
//! registry of protocols keyed by id.  Callers construct a session per
//! process (or per request) and pass it around; nothing here is global.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::composer::{AmplificationTarget, BlendRecommendation, BlendStrategy, BlendingResult, Composer};
use crate::config::CultureConfig;
use crate::error::{CultureError, Result};
use crate::evaluation::{CultureCompatibilityMatrix, EvaluationEngine, ProtocolEvaluation};
use crate::protocol::CultureProtocol;

#[derive(Debug)]
pub struct CultureSession {
    engine: EvaluationEngine,
    composer: Composer,
    config: CultureConfig,
    registry: RwLock<HashMap<String, CultureProtocol>>,
}

impl CultureSession {
    pub fn new() -> Self {
        Self::from_config(&CultureConfig::default())
    }

    pub fn from_config(config: &CultureConfig) -> Self {
        let composer = match config.seed {
            Some(seed) => Composer::with_seed(seed),
            None => Composer::new(),
        };
        Self {
            engine: EvaluationEngine::new(),
            composer,
            config: config.clone(),
            registry: RwLock::new(HashMap::new()),
        }
    }

    pub fn engine(&self) -> &EvaluationEngine {
        &self.engine
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn config(&self) -> &CultureConfig {
        &self.config
    }

    /// Register `protocol` under its id, returning any protocol it replaced.
    ///
    /// Protocols failing [`CultureProtocol::validate`] are refused and the
    /// registry is left unchanged.
    pub fn register(&self, protocol: CultureProtocol) -> Result<Option<CultureProtocol>> {
        if let Err(e) = protocol.validate() {
            log::warn!("Refusing to register '{}': {}", protocol.id, e);
            return Err(e);
        }
        let id = protocol.id.clone();
        let previous = self.registry.write().insert(id.clone(), protocol);
        if previous.is_some() {
            log::debug!("Replaced registered protocol '{}'", id);
        }
        Ok(previous)
    }

    pub fn get(&self, id: &str) -> Result<CultureProtocol> {
        self.registry.read().get(id).cloned().ok_or_else(|| {
            log::warn!("Protocol '{}' is not registered", id);
            CultureError::UnknownIdentifier(id.to_string())
        })
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.registry.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn evaluate_registered(&self, id: &str) -> Result<ProtocolEvaluation> {
        let protocol = self.get(id)?;
        Ok(self.engine.evaluate(&protocol))
    }

    pub fn compatibility_between(&self, a: &str, b: &str) -> Result<CultureCompatibilityMatrix> {
        let a = self.get(a)?;
        let b = self.get(b)?;
        Ok(self.engine.compatibility(&a, &b))
    }

    /// Blend registered protocols and register the result.
    ///
    /// `strategy` falls back to the configured default.
    pub fn blend_registered(
        &self,
        ids: &[&str],
        weights: &[f64],
        strategy: Option<BlendStrategy>,
        custom_name: Option<&str>,
    ) -> Result<BlendingResult> {
        let protocols = ids
            .iter()
            .map(|id| self.get(id))
            .collect::<Result<Vec<_>>>()?;
        let strategy = strategy.unwrap_or(self.config.default_strategy);

        let result = self.composer.blend(&protocols, weights, strategy, custom_name)?;
        self.register(result.new_protocol.clone())?;
        Ok(result)
    }

    /// Amplify a registered protocol and register the result.
    ///
    /// `intensity` falls back to the configured default.
    pub fn amplify_registered(
        &self,
        id: &str,
        target: AmplificationTarget,
        intensity: Option<f64>,
    ) -> Result<CultureProtocol> {
        let protocol = self.get(id)?;
        let intensity = intensity.unwrap_or(self.config.default_intensity);

        let amplified = self.composer.amplify(&protocol, target, intensity)?;
        self.register(amplified.clone())?;
        Ok(amplified)
    }

    /// Recommendations over every registered protocol, in sorted id order.
    pub fn recommend_registered(&self) -> Vec<BlendRecommendation> {
        let protocols: Vec<CultureProtocol> = {
            let registry = self.registry.read();
            let mut protocols: Vec<CultureProtocol> = registry.values().cloned().collect();
            protocols.sort_by(|a, b| a.id.cmp(&b.id));
            protocols
        };
        self.composer.get_blend_recommendations(&protocols)
    }
}

impl Default for CultureSession {
    fn default() -> Self {
        Self::new()
    }
}
