use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use serde::Serialize;
use takana_core::{site, AppConfig, EngineConfig, Error, SectionId, Transform, Viewport};

use super::headless;

/// Long enough for every intro on the page to finish
const SETTLE: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct SampleReport {
    section: String,
    progress: f64,
    scroll: f64,
    elements: Vec<ElementSample>,
}

#[derive(Debug, Serialize)]
struct ElementSample {
    id: String,
    #[serde(flatten)]
    transform: Transform,
}

/// Print every element of `section` as it stands at `progress`
///
/// Pinned sections are sampled along their pin span; inline sections along
/// the scroll range in which they are on screen. Scrub smoothing is turned
/// off so the result does not depend on timing.
pub fn run(config: &AppConfig, viewport: Viewport, section: &str, progress: f64, json: bool) -> Result<()> {
    if !(0.0..=1.0).contains(&progress) {
        bail!("Progress must be within [0, 1], got {}", progress);
    }

    let mut config = config.clone();
    config.engine = EngineConfig {
        pin_scrub_ms: 0,
        reveal_scrub_ms: 0,
        ..config.engine
    };

    let id = SectionId::from(section);
    let descriptor = site::page(&config.engine)?
        .into_iter()
        .find(|d| d.id == id)
        .ok_or_else(|| Error::SectionNotFound(section.to_string()))?;

    let (mut engine, _handles) = headless(&config, viewport)?;
    let geometry = engine
        .layout()
        .section(&id)
        .cloned()
        .ok_or_else(|| Error::SectionNotFound(section.to_string()))?;
    let (from, to) = match geometry.pin_span() {
        Some(span) => (span.start, span.end),
        None => (geometry.top - viewport.height, geometry.top + geometry.height),
    };
    let scroll = from + (to - from) * progress;

    let start = Instant::now();
    engine.tick(start);
    engine.scroll_to(scroll);
    engine.tick(start + SETTLE);

    let elements: Vec<ElementSample> = descriptor
        .element_ids()
        .into_iter()
        .filter_map(|element| {
            engine.stage().get(&element).map(|transform| ElementSample {
                id: element.to_string(),
                transform,
            })
        })
        .collect();

    let report = SampleReport {
        section: section.to_string(),
        progress,
        scroll: engine.scroll(),
        elements,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} at progress {:.3} (scroll {:.1}):\n",
        report.section, report.progress, report.scroll
    );
    for sample in &report.elements {
        let t = &sample.transform;
        println!(
            "  {:<20} x {:>8.2}  y {:>8.2}  scale {:.3}  rotate {:>7.2}  opacity {:.3}",
            sample.id, t.x, t.y, t.scale, t.rotate, t.opacity
        );
    }

    Ok(())
}
