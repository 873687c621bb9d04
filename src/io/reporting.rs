// src/io/reporting.rs

use crate::error::PricingError;
use crate::model::timeline::DemandTimeline;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Writes one CSV row per hour of the timeline.
pub fn write_timeline<W: Write>(writer: W, timeline: &DemandTimeline) -> Result<(), PricingError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in timeline.iter() {
        wtr.serialize(record)?;
    }
    // Flush the buffer to ensure all rows are written
    wtr.flush()?;
    Ok(())
}

/// Exports the timeline to `path`, e.g. `results/run_1.csv`.
pub fn write_timeline_to_path(
    path: impl AsRef<Path>,
    timeline: &DemandTimeline,
) -> Result<(), PricingError> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)?;
    write_timeline(file, timeline)?;
    info!(rows = timeline.len(), path = %path.display(), "exported timeline");
    Ok(())
}
