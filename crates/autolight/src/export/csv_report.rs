use csv::Writer;

use super::table::{ExportTable, COLUMNS};
use crate::error::ExportError;

/// Renders the header row followed by every table row, total last.
pub fn render(table: &ExportTable) -> Result<Vec<u8>, ExportError> {
    let _span = tracing::info_span!("export.csv", rows = table.rows.len()).entered();

    let mut buffer = Vec::new();
    {
        let mut writer = Writer::from_writer(&mut buffer);
        writer.write_record(COLUMNS)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush().map_err(csv::Error::from)?;
    }

    log::debug!("Rendered CSV report ({} bytes)", buffer.len());
    Ok(buffer)
}
