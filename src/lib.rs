//! # culture-protocol
//!
//! Cognitive culture protocols: structured bundles of value tokens, memes,
//! practices and myths that describe how a group thinks and decides.
//!
//! The crate evaluates protocols along six behavioural axes, scores their
//! quality and pairwise compatibility, and composes new protocols by
//! blending or amplifying existing ones.
//!
//! ```no_run
//! use culture_protocol::{BlendStrategy, CultureSession, PresetProtocol};
//!
//! let session = CultureSession::new();
//! for protocol in PresetProtocol::all_protocols() {
//!     session.register(protocol).unwrap();
//! }
//! let result = session
//!     .blend_registered(
//!         &["iona-gravita-v1", "mily-cadmion-v1"],
//!         &[0.6, 0.4],
//!         Some(BlendStrategy::CreativeFusion),
//!         None,
//!     )
//!     .unwrap();
//! println!("{}", result.new_protocol.summary());
//! ```

pub mod composer;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod protocol;
pub mod session;

pub use composer::{
    AmplificationRecord, AmplificationTarget, BlendRecommendation, BlendStrategy, BlendingResult,
    Composer,
};
pub use config::CultureConfig;
pub use error::{CultureError, Result};
pub use evaluation::{
    CultureCompatibilityMatrix, CultureEvaluationAxis, CultureQualityMetrics, EvaluationEngine,
    EvaluationRecord, ProtocolEvaluation,
};
pub use protocol::{
    CultureOrigin, CultureProtocol, Meme, Myth, Practice, PracticeContext, PresetProtocol,
    ValueCategory, ValueToken,
};
pub use session::CultureSession;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
