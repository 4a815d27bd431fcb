use rust_xlsxwriter::{Format, Workbook, XlsxError};

use super::suggestions::SuggestionView;

const HEADERS: [&str; 5] = ["User", "Name", "Suggestions", "Department", "Year"];

/// Renders the suggestion list as a single-sheet XLSX workbook.
pub fn suggestions_workbook(views: &[SuggestionView]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Suggestions")?;

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (idx, view) in views.iter().enumerate() {
        let row = (idx + 1) as u32;
        let cells = [
            view.submitter.as_str(),
            view.subject_name.as_str(),
            view.suggestion.as_deref().unwrap_or(""),
            view.department.as_deref().unwrap_or(""),
            view.year.as_deref().unwrap_or(""),
        ];
        for (col, value) in cells.iter().enumerate() {
            worksheet.write_string(row, col as u16, *value)?;
        }
    }

    workbook.save_to_buffer()
}
