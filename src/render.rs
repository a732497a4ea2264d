//! Turns a [`TimesheetDocument`] into downloadable bytes.

use csv::WriterBuilder;

use crate::engine::timesheet::TimesheetDocument;
use crate::error::{AppError, AppResult};

pub trait DocumentRenderer: Send + Sync {
    fn render(&self, document: &TimesheetDocument) -> AppResult<Vec<u8>>;

    fn content_type(&self) -> &'static str;

    fn extension(&self) -> &'static str;

    fn file_name(&self, document: &TimesheetDocument) -> String {
        format!("{}.{}", document.file_stem, self.extension())
    }
}

/// Title and header pairs, a blank line, the table, a blank line, the totals.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvRenderer;

impl DocumentRenderer for CsvRenderer {
    fn render(&self, document: &TimesheetDocument) -> AppResult<Vec<u8>> {
        let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());
        let render_err = |e: csv::Error| AppError::Render(e.to_string());

        writer.write_record([document.title.as_str()]).map_err(render_err)?;
        for (label, value) in &document.header {
            writer.write_record([label, value]).map_err(render_err)?;
        }
        writer.write_record([""]).map_err(render_err)?;

        writer.write_record(&document.columns).map_err(render_err)?;
        for row in &document.rows {
            writer.write_record(row).map_err(render_err)?;
        }

        if !document.footer.is_empty() {
            writer.write_record([""]).map_err(render_err)?;
            for (label, value) in &document.footer {
                writer.write_record([label, value]).map_err(render_err)?;
            }
        }

        writer
            .into_inner()
            .map_err(|e| AppError::Render(e.to_string()))
    }

    fn content_type(&self) -> &'static str {
        "text/csv; charset=utf-8"
    }

    fn extension(&self) -> &'static str {
        "csv"
    }
}
