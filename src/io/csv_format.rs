//! CSV export of projected client views
//!
//! One row per record with columns:
//! `client_id, client_name, current_balance, transactions, data_source`.
//! Rows are written in file order; an absent `current_balance` is an empty
//! cell.

use crate::types::{ClientView, RecordError};
use std::io::Write;

/// Header row of the export
pub const EXPORT_HEADER: [&str; 5] = [
    "client_id",
    "client_name",
    "current_balance",
    "transactions",
    "data_source",
];

/// Write client summaries to CSV format
///
/// # Arguments
///
/// * `views` - Projected views, in the order they should appear
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(RecordError::Io)` if a write error occurred
pub fn write_views_csv(views: &[ClientView], output: &mut dyn Write) -> Result<(), RecordError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(EXPORT_HEADER)?;

    for view in views {
        writer.write_record([
            view.client_id.clone(),
            view.client_name.clone(),
            view.current_balance
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            view.transactions.len().to_string(),
            view.data_source.clone(),
        ])?;
    }

    writer
        .flush()
        .map_err(|e| RecordError::io("flush CSV output", e))?;

    Ok(())
}
