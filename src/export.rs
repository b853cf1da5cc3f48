use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::data::chart::ChartSpec;

/// Write chart specifications as a pretty-printed JSON array.
pub fn write_chart_specs(path: &Path, charts: &[ChartSpec]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, charts)
        .with_context(|| format!("writing chart specs to {}", path.display()))?;
    writer.flush().context("flushing chart specs")?;
    for chart in charts {
        log::debug!("exported {} ({})", chart.id(), chart.title());
    }
    log::info!("Exported {} charts to {}", charts.len(), path.display());
    Ok(())
}
