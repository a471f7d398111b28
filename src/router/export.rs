//! Bulk exports of teacher data.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use rust_xlsxwriter::Workbook;

use crate::AppState;
use crate::error::Result;
use crate::teacher::TeacherRepository;

const EXCEL_CONTENT_TYPE: &str = "application/vnd.ms-excel";
const EXCEL_FILENAME: &str = "teachers.xlsx";
const EXCEL_SHEET: &str = "teachers";
const EXCEL_COLUMNS: [&str; 5] =
    ["name", "detail", "good count", "bad count", "subject"];

const PDF_CONTENT_TYPE: &str = "application/pdf";
const PDF_FALLBACK_FILENAME: &str = "brochure.pdf";

/// Handler building the teachers workbook.
pub async fn excel(
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let teachers = TeacherRepository::new(state.db.postgres.clone())
        .all_with_subject()
        .await?;

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(EXCEL_SHEET)?;

    for (col, title) in EXCEL_COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *title)?;
    }
    for (row, teacher) in teachers.iter().enumerate() {
        let row = row as u32 + 1;
        sheet.write_string(row, 0, &teacher.name)?;
        sheet.write_string(row, 1, &teacher.detail)?;
        sheet.write_number(row, 2, f64::from(teacher.good_count))?;
        sheet.write_number(row, 3, f64::from(teacher.bad_count))?;
        sheet.write_string(row, 4, &teacher.subject)?;
    }

    let bytes = workbook.save_to_buffer()?;

    Ok((
        [
            (header::CONTENT_TYPE, EXCEL_CONTENT_TYPE.to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXCEL_FILENAME}\""),
            ),
        ],
        bytes,
    ))
}

/// Handler streaming the configured brochure.
///
/// The bytes are never authored here; a prebuilt document is streamed
/// from disk.
pub async fn pdf(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let export = &state.config.export;
    let bytes = tokio::fs::read(&export.pdf_path).await?;

    let filename = export
        .pdf_filename
        .clone()
        .or_else(|| {
            export
                .pdf_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| PDF_FALLBACK_FILENAME.to_owned());

    Ok((
        [
            (header::CONTENT_TYPE, PDF_CONTENT_TYPE.to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}
