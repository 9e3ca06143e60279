use anyhow::Result;
use takana_core::{AppConfig, Viewport};

use super::headless;

pub fn run(config: &AppConfig, viewport: Viewport) -> Result<()> {
    let (engine, _handles) = headless(config, viewport)?;
    let layout = engine.layout();

    println!(
        "Viewport {}x{}, document {:.1}, max scroll {:.1}\n",
        viewport.width,
        viewport.height,
        layout.document_height(),
        layout.max_scroll()
    );

    let ranges = engine.snap_ranges();
    if ranges.is_empty() {
        println!("No pinned sections; snapping is disabled.");
        return Ok(());
    }

    println!("Pinned ranges ({}):\n", ranges.len());
    let pinned = layout.sections().iter().filter(|s| s.is_pinned());
    for (section, range) in pinned.zip(&ranges) {
        println!(
            "  {:<8} start {:.4}  end {:.4}  center {:.4}",
            section.id.as_str(),
            range.start(),
            range.end(),
            range.center()
        );
        if let Some(span) = section.pin_span() {
            println!("           scroll {:.1} .. {:.1}", span.start, span.end);
        }
    }
    println!("\nTolerance: {}", config.snap.tolerance);

    Ok(())
}
