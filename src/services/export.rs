use chrono::{DateTime, Utc};
use serde_json::Value;
use rust_xlsxwriter::{Workbook, XlsxError};
use tracing::{error, info};

use crate::db::repository::Catalog;
use crate::error::AppError;
use crate::models::{FileType, PanelParams, Record, keyed};

pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

/// Export the classes panel, in its default ordering, as a file.
pub async fn export_dsd(catalog: &dyn Catalog, file_type: FileType) -> Result<ExportFile, AppError> {
    let statement = PanelParams::default().classes_statement()?;
    let records = catalog.fetch(&statement).await?;
    let body = render(&records, file_type)?;
    let filename = filename(file_type, Utc::now());

    info!("exported {} row(s) to {}", records.len(), filename);
    Ok(ExportFile {
        filename,
        content_type: file_type.content_type(),
        body,
    })
}

pub fn filename(file_type: FileType, at: DateTime<Utc>) -> String {
    format!("dsd_{}.{}", at.format("%Y%m%dT%H%M%SZ"), file_type.extension())
}

pub fn render(records: &[Record], file_type: FileType) -> Result<Vec<u8>, AppError> {
    match file_type {
        FileType::Json => serde_json::to_vec_pretty(&keyed("data", records.to_vec())).map_err(export_failed),
        FileType::Csv => render_csv(records).map_err(export_failed),
        FileType::Xls => render_xlsx(records).map_err(export_failed),
    }
}

fn export_failed(e: impl std::fmt::Display) -> AppError {
    error!("failed to render export: {}", e);
    AppError::InternalServerError
}

/// Column names in order of first appearance.
fn columns(records: &[Record]) -> Vec<&str> {
    let mut columns: Vec<&str> = Vec::new();
    for key in records.iter().flat_map(|r| r.keys()) {
        if !columns.contains(&key.as_str()) {
            columns.push(key.as_str());
        }
    }
    columns
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn render_csv(records: &[Record]) -> Result<Vec<u8>, csv::Error> {
    let columns = columns(records);
    if columns.is_empty() {
        return Ok(Vec::new());
    }

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());
    writer.write_record(&columns)?;
    for record in records {
        writer.write_record(columns.iter().map(|c| cell_text(record.get(*c))))?;
    }
    writer.into_inner().map_err(|e| e.into_error().into())
}

/// One worksheet, header row first. Nulls leave the cell blank.
fn render_xlsx(records: &[Record]) -> Result<Vec<u8>, XlsxError> {
    let columns = columns(records);
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("DSD")?;

    for (col, name) in columns.iter().enumerate() {
        sheet.write_string(0, col_index(col)?, *name)?;
    }

    for (row, record) in records.iter().enumerate() {
        let row = u32::try_from(row + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (col, name) in columns.iter().enumerate() {
            let col = col_index(col)?;
            match record.get(*name) {
                None | Some(Value::Null) => {}
                Some(Value::Bool(b)) => {
                    sheet.write_boolean(row, col, *b)?;
                }
                Some(Value::Number(n)) => match n.as_f64() {
                    Some(f) => {
                        sheet.write_number(row, col, f)?;
                    }
                    None => {
                        sheet.write_string(row, col, n.to_string())?;
                    }
                },
                Some(other) => {
                    sheet.write_string(row, col, cell_text(Some(other)))?;
                }
            }
        }
    }

    workbook.save_to_buffer()
}

fn col_index(col: usize) -> Result<u16, XlsxError> {
    u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)
}
