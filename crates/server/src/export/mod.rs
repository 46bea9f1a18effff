//! Spreadsheet exports.
//!
//! Reports are first laid out as a [`WorkbookLayout`] (plain cells, styles,
//! merges and widths) and only then rendered to `.xlsx` bytes, so the layout
//! rules can be checked without parsing a workbook.

mod form_report;
mod roster;

pub use form_report::{form_report_filename, form_report_layout};
pub use roster::{roster_filename, roster_layout};

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, XlsxError};
use std::collections::HashSet;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Most characters a single xlsx cell accepts.
pub const MAX_CELL_CHARS: usize = 32_767;

const ACCENT: u32 = 0x6366F1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    Plain,
    /// Large indigo sheet title.
    Title,
    /// Bold label.
    Label,
    /// Bold white on indigo, bordered and centered.
    Header,
    Bordered,
    BorderedBold,
    /// Bordered, wrapped and top aligned for long free text.
    BorderedWrapped,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub row: u32,
    pub col: u16,
    pub value: CellValue,
    pub style: CellStyle,
}

/// A vertical merge in one column. The top cell supplies the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerticalMerge {
    pub col: u16,
    pub first_row: u32,
    pub last_row: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub name: String,
    pub cells: Vec<Cell>,
    pub merges: Vec<VerticalMerge>,
    pub column_widths: Vec<(u16, f64)>,
}

impl SheetLayout {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cells: Vec::new(),
            merges: Vec::new(),
            column_widths: Vec::new(),
        }
    }

    /// Writes a text cell, cut to [`MAX_CELL_CHARS`].
    pub fn text(&mut self, row: u32, col: u16, value: impl Into<String>, style: CellStyle) {
        let mut value = value.into();
        if let Some((cut, _)) = value.char_indices().nth(MAX_CELL_CHARS) {
            value.truncate(cut);
        }

        self.cells.push(Cell {
            row,
            col,
            value: CellValue::Text(value),
            style,
        });
    }

    pub fn number(&mut self, row: u32, col: u16, value: f64, style: CellStyle) {
        self.cells.push(Cell {
            row,
            col,
            value: CellValue::Number(value),
            style,
        });
    }

    /// Writes a header row at `row`, one column per title.
    pub fn header_row(&mut self, row: u32, titles: &[&str]) {
        for (col, title) in (0u16..).zip(titles) {
            self.text(row, col, *title, CellStyle::Header);
        }
    }

    pub fn widths(&mut self, widths: &[f64]) {
        self.column_widths = (0u16..).zip(widths.iter().copied()).collect();
    }

    pub fn cell(&self, row: u32, col: u16) -> Option<&Cell> {
        self.cells.iter().find(|c| c.row == row && c.col == col)
    }

    /// Highest written row, or `None` for an empty sheet.
    pub fn last_row(&self) -> Option<u32> {
        self.cells.iter().map(|c| c.row).max()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkbookLayout {
    pub sheets: Vec<SheetLayout>,
}

impl WorkbookLayout {
    pub fn sheet(&self, name: &str) -> Option<&SheetLayout> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

fn format_for(style: CellStyle) -> Format {
    match style {
        CellStyle::Plain => Format::new(),
        CellStyle::Title => Format::new()
            .set_bold()
            .set_font_size(16)
            .set_font_color(Color::RGB(ACCENT)),
        CellStyle::Label => Format::new().set_bold(),
        CellStyle::Header => Format::new()
            .set_bold()
            .set_font_size(12)
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(ACCENT))
            .set_border(FormatBorder::Thin)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter),
        CellStyle::Bordered => Format::new().set_border(FormatBorder::Thin),
        CellStyle::BorderedBold => Format::new().set_bold().set_border(FormatBorder::Thin),
        CellStyle::BorderedWrapped => Format::new()
            .set_border(FormatBorder::Thin)
            .set_text_wrap()
            .set_align(FormatAlign::Top),
    }
}

/// Renders the layout into an in-memory `.xlsx` file.
pub fn render(layout: &WorkbookLayout) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();

    for sheet in &layout.sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        let anchors: HashSet<(u32, u16)> = sheet
            .merges
            .iter()
            .map(|m| (m.first_row, m.col))
            .collect();

        for cell in &sheet.cells {
            if anchors.contains(&(cell.row, cell.col)) {
                continue;
            }
            let format = format_for(cell.style);
            match &cell.value {
                CellValue::Text(text) => {
                    worksheet.write_string_with_format(cell.row, cell.col, text, &format)?;
                }
                CellValue::Number(number) => {
                    worksheet.write_number_with_format(cell.row, cell.col, *number, &format)?;
                }
            }
        }

        for merge in &sheet.merges {
            let anchor = sheet.cell(merge.first_row, merge.col);
            let text = match anchor.map(|c| &c.value) {
                Some(CellValue::Text(text)) => text.clone(),
                Some(CellValue::Number(number)) => number.to_string(),
                None => String::new(),
            };
            let format = format_for(anchor.map_or(CellStyle::Plain, |c| c.style));
            worksheet.merge_range(
                merge.first_row,
                merge.col,
                merge.last_row,
                merge.col,
                &text,
                &format,
            )?;
        }

        for (col, width) in &sheet.column_widths {
            worksheet.set_column_width(*col, *width)?;
        }
    }

    workbook.save_to_buffer()
}
