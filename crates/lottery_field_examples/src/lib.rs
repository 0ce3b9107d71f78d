#![forbid(unsafe_code)]

use lottery_field::prelude::*;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEMO_CATALOG: &str = include_str!("../assets/prizes.ron");

/// Installs a stdout subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init();
}

/// The catalog bundled with the examples.
pub fn demo_catalog() -> anyhow::Result<PrizeCatalog> {
    Ok(PrizeCatalog::from_ron_str(DEMO_CATALOG)?)
}

/// Renders `share` (0..=1) as a fixed-width bar.
pub fn bar(share: f32, width: usize) -> String {
    let filled = (share.clamp(0.0, 1.0) * width as f32).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(width - filled))
}
