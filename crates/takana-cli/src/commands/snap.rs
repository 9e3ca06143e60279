use anyhow::{bail, Result};
use takana_core::{AppConfig, Viewport};

use super::headless;

/// Print where each gesture-end fraction would settle
pub fn run(config: &AppConfig, viewport: Viewport, fractions: &[f64]) -> Result<()> {
    if let Some(bad) = fractions.iter().find(|f| !(0.0..=1.0).contains(*f)) {
        bail!("Scroll fraction must be within [0, 1], got {}", bad);
    }

    let (engine, _handles) = headless(config, viewport)?;
    let Some(rule) = engine.coordinator().rule(engine.registry()) else {
        println!("No snap rule installed; every fraction is left as is.");
        return Ok(());
    };

    for &fraction in fractions {
        let target = rule.snap(fraction);
        if target == fraction {
            println!("{:.4} -> {:.4} (outside pinned ranges)", fraction, target);
        } else {
            println!("{:.4} -> {:.4}", fraction, target);
        }
    }

    Ok(())
}
