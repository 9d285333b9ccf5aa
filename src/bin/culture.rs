//! culture demo binary.
//!
//! Registers the built-in presets, evaluates them, compares every pair,
//! blends them once per strategy and prints recommendations, all as
//! pretty JSON on stdout.
//!
//! # Environment Variables
//!
//! - `CULTURE_SEED`: pins the composer's random source
//! - `CULTURE_STRATEGY`: default blend strategy
//! - `CULTURE_INTENSITY`: default amplification intensity
//! - `CULTURE_VERBOSE`: include full axis profiles in the output
//! - `RUST_LOG`: Tracing filter (default: "info,culture_protocol=debug")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin culture -- --config culture.yaml
//! ```

use anyhow::{bail, Context};
use serde_json::json;

use culture_protocol::composer::{AmplificationTarget, BlendStrategy};
use culture_protocol::protocol::PresetProtocol;
use culture_protocol::{CultureConfig, CultureSession};

fn config_path() -> anyhow::Result<Option<String>> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        None => Ok(None),
        Some("--config") => match args.next() {
            Some(path) => Ok(Some(path)),
            None => bail!("--config requires a path"),
        },
        Some(other) => bail!("unexpected argument '{}'; usage: culture [--config path]", other),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,culture_protocol=debug".into()),
        )
        .init();

    let mut config = match config_path()? {
        Some(path) => CultureConfig::from_file(&path)
            .with_context(|| format!("loading config from {}", path))?,
        None => CultureConfig::default(),
    };
    config.apply_env().context("reading CULTURE_* overrides")?;
    tracing::info!(
        "culture-protocol {} (strategy {}, seed {:?})",
        culture_protocol::VERSION,
        config.default_strategy,
        config.seed
    );

    let session = CultureSession::from_config(&config);
    let mut ids = Vec::new();
    for protocol in PresetProtocol::all_protocols() {
        ids.push(protocol.id.clone());
        session.register(protocol)?;
    }

    let mut evaluations = Vec::new();
    for id in &ids {
        let evaluation = session.evaluate_registered(id)?;
        if config.verbose {
            evaluations.push(serde_json::to_value(&evaluation)?);
        } else {
            evaluations.push(json!({
                "protocol_id": evaluation.protocol_id,
                "quality": evaluation.quality,
            }));
        }
    }

    let mut compatibility = Vec::new();
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            compatibility.push(session.compatibility_between(a, b)?);
        }
    }

    let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    let weights = vec![1.0; refs.len()];
    let mut blends = Vec::new();
    for strategy in BlendStrategy::ALL {
        blends.push(session.blend_registered(&refs, &weights, Some(strategy), None)?);
    }

    let amplified = session.amplify_registered(&ids[0], AmplificationTarget::Intuition, None)?;

    let report = json!({
        "version": culture_protocol::VERSION,
        "evaluations": evaluations,
        "compatibility": compatibility,
        "blends": blends,
        "amplified": amplified.summary(),
        "recommendations": session.recommend_registered(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
