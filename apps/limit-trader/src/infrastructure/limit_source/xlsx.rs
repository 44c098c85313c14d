//! xlsx limit template reader.
//!
//! A template row holds up to two limit blocks side by side. A block counts
//! only when its ticker cell carries the marker fill; unmarked blocks are
//! notes and skipped.

use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use umya_spreadsheet::Worksheet;

use crate::application::ports::{LimitSourceError, LimitSourcePort};
use crate::domain::shared::Ticker;
use crate::domain::trading::Limit;

/// One cell of the extracted grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetCell {
    /// Cell text.
    pub value: String,
    /// Fill color as ARGB hex, when filled.
    pub fill: Option<String>,
}

impl SheetCell {
    /// Unfilled cell.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            fill: None,
        }
    }

    /// Filled cell.
    #[must_use]
    pub fn filled(value: impl Into<String>, argb: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            fill: Some(argb.into()),
        }
    }
}

/// Cell grid of a single worksheet, 0-based.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LimitSheet {
    rows: Vec<Vec<SheetCell>>,
}

impl LimitSheet {
    /// Sheet from rows of cells.
    #[must_use]
    pub const fn new(rows: Vec<Vec<SheetCell>>) -> Self {
        Self { rows }
    }

    /// Copy values and fills out of a worksheet.
    #[must_use]
    pub fn from_worksheet(worksheet: &Worksheet) -> Self {
        let max_row = worksheet.get_highest_row();
        let max_col = worksheet.get_highest_column();

        let rows = (1..=max_row)
            .map(|row| {
                (1..=max_col)
                    .map(|col| {
                        worksheet
                            .get_cell((col, row))
                            .map(|cell| SheetCell {
                                value: cell.get_value().to_string(),
                                fill: cell
                                    .get_style()
                                    .get_background_color()
                                    .map(|color| color.get_argb().to_string())
                                    .filter(|argb| !argb.is_empty()),
                            })
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        Self { rows }
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn cell(&self, row: usize, col: usize) -> Option<&SheetCell> {
        self.rows.get(row).and_then(|cells| cells.get(col))
    }
}

/// Where blocks and their fields sit in a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitSheetLayout {
    /// Fill that marks a ticker cell as a live limit.
    pub marker_fill: String,
    /// Columns per block.
    pub block_width: usize,
    /// Blocks per row.
    pub blocks_per_row: usize,
    /// Ticker column within a block.
    pub ticker_offset: usize,
    /// Price column within a block.
    pub price_offset: usize,
    /// Lots column within a block.
    pub lots_offset: usize,
}

impl Default for LimitSheetLayout {
    fn default() -> Self {
        Self {
            marker_fill: "FF00FFFF".to_string(),
            block_width: 8,
            blocks_per_row: 2,
            ticker_offset: 1,
            price_offset: 4,
            lots_offset: 5,
        }
    }
}

/// Pull-style reader over a [`LimitSheet`].
#[derive(Debug, Clone)]
pub struct XlsxLimitSource {
    sheet: LimitSheet,
    layout: LimitSheetLayout,
    row: usize,
    block: usize,
}

impl XlsxLimitSource {
    /// Open a workbook. It must contain exactly one sheet.
    pub fn open(path: &Path) -> Result<Self, LimitSourceError> {
        let book = umya_spreadsheet::reader::xlsx::read(path).map_err(|e| LimitSourceError::Open {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let sheets = book.get_sheet_collection();
        let worksheet = match (sheets.len(), sheets.first()) {
            (1, Some(worksheet)) => worksheet,
            (found, _) => return Err(LimitSourceError::SheetCount { found }),
        };

        let sheet = LimitSheet::from_worksheet(worksheet);
        tracing::debug!(path = %path.display(), rows = sheet.row_count(), "Opened limit template");
        Ok(Self::from_sheet(sheet))
    }

    /// Reader over an already extracted sheet.
    #[must_use]
    pub fn from_sheet(sheet: LimitSheet) -> Self {
        Self {
            sheet,
            layout: LimitSheetLayout::default(),
            row: 0,
            block: 0,
        }
    }

    /// Use a non-default layout.
    #[must_use]
    pub fn with_layout(mut self, layout: LimitSheetLayout) -> Self {
        self.layout = layout;
        self
    }

    fn is_marked(&self, cell: &SheetCell) -> bool {
        cell.fill
            .as_deref()
            .is_some_and(|fill| fill.eq_ignore_ascii_case(&self.layout.marker_fill))
    }

    fn value_at(&self, row: usize, col: usize) -> &str {
        self.sheet
            .cell(row, col)
            .map_or("", |cell| cell.value.trim())
    }

    fn read_limit(&self, row: usize, start: usize, ticker: &str) -> Result<Limit, LimitSourceError> {
        let row_number = row_number(row);

        let price_text = self.value_at(row, start + self.layout.price_offset);
        let price = parse_price(price_text).ok_or_else(|| LimitSourceError::InvalidPrice {
            row: row_number,
            value: price_text.to_string(),
        })?;

        let lots_text = self.value_at(row, start + self.layout.lots_offset);
        let lots = parse_lots(lots_text).ok_or_else(|| LimitSourceError::InvalidLots {
            row: row_number,
            value: lots_text.to_string(),
        })?;

        Limit::new(Ticker::new(ticker), price, lots).map_err(|source| {
            LimitSourceError::InvalidLimit {
                row: row_number,
                source,
            }
        })
    }
}

impl LimitSourcePort for XlsxLimitSource {
    fn next_limit(&mut self) -> Result<Option<Limit>, LimitSourceError> {
        while self.row < self.sheet.row_count() {
            while self.block < self.layout.blocks_per_row {
                let start = self.block * self.layout.block_width;
                let marked = self
                    .sheet
                    .cell(self.row, start + self.layout.ticker_offset)
                    .filter(|cell| self.is_marked(cell))
                    .map(|cell| cell.value.trim().to_string());

                if let Some(ticker) = marked {
                    let limit = self.read_limit(self.row, start, &ticker)?;
                    self.block += 1;
                    if self.block >= self.layout.blocks_per_row {
                        self.row += 1;
                        self.block = 0;
                    }
                    return Ok(Some(limit));
                }
                self.block += 1;
            }
            self.row += 1;
            self.block = 0;
        }
        Ok(None)
    }

    fn rewind(&mut self) {
        self.row = 0;
        self.block = 0;
    }
}

fn row_number(row: usize) -> u32 {
    u32::try_from(row + 1).unwrap_or(u32::MAX)
}

fn parse_price(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Whole lot count. Excel may store `3` as `3.0`.
fn parse_lots(text: &str) -> Option<u32> {
    text.parse::<u32>().ok().or_else(|| {
        let value = parse_price(text)?;
        if value.fract().is_zero() {
            value.to_u32()
        } else {
            None
        }
    })
}
