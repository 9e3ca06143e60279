pub mod config;
pub mod ranges;
pub mod run;
pub mod sample;
pub mod snap;

use std::time::Instant;

use anyhow::Result;
use takana_core::{site, AppConfig, ScrollEngine, SectionHandle, Viewport};

/// Terminal-independent engine with the whole page mounted and the snap rule installed
pub(crate) fn headless(config: &AppConfig, viewport: Viewport) -> Result<(ScrollEngine, Vec<SectionHandle>)> {
    let mut engine = ScrollEngine::from_config(config, viewport);
    let handles = engine.mount_all(&site::page(&config.engine)?, Instant::now())?;
    engine.install_snap();
    Ok((engine, handles))
}
