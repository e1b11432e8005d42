//! Export of (filtered) roster tables to dated CSV or spreadsheet files

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use rust_xlsxwriter::{Workbook, XlsxError};
use tracing::{debug, info};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::MemberRecord;
use crate::infrastructure::store::{encode_csv, CSV_HEADER};
use crate::infrastructure::traits::{Clock, FileSystem};

pub const EXPORT_FILE_PREFIX: &str = "data_organisasi_masjid";

/// Worksheet name used for spreadsheet exports.
pub const EXPORT_SHEET_NAME: &str = "Organisasi";

/// File format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Export file name for `date`, e.g. `data_organisasi_masjid_20240131.csv`.
pub fn export_file_name(date: NaiveDate, format: ExportFormat) -> String {
    format!(
        "{}_{}.{}",
        EXPORT_FILE_PREFIX,
        date.format("%Y%m%d"),
        format.extension()
    )
}

fn xlsx_err(context: &'static str) -> impl FnOnce(XlsxError) -> ApplicationError {
    move |source| ApplicationError::Xlsx {
        context: context.to_string(),
        source,
    }
}

/// Single-sheet workbook with the data file's header row and one row per member.
fn encode_xlsx(table: &[MemberRecord]) -> ApplicationResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet
        .set_name(EXPORT_SHEET_NAME)
        .map_err(xlsx_err("name worksheet"))?;

    for (col, title) in (0u16..).zip(CSV_HEADER) {
        sheet
            .write_string(0, col, title)
            .map_err(xlsx_err("write header"))?;
    }

    for (row, member) in (1u32..).zip(table) {
        sheet
            .write_number(row, 0, member.id as f64)
            .and_then(|s| s.write_string(row, 1, &member.name))
            .and_then(|s| s.write_string(row, 2, &member.role))
            .and_then(|s| s.write_string(row, 3, &member.division))
            .and_then(|s| s.write_number(row, 4, member.amount as f64))
            .and_then(|s| s.write_string(row, 5, &member.phone))
            .and_then(|s| s.write_string(row, 6, &member.join_date))
            .map_err(xlsx_err("write member row"))?;
    }

    workbook
        .save_to_buffer()
        .map_err(xlsx_err("serialize workbook"))
}

pub struct ExportService {
    fs: Arc<dyn FileSystem>,
    clock: Arc<dyn Clock>,
}

impl ExportService {
    pub fn new(fs: Arc<dyn FileSystem>, clock: Arc<dyn Clock>) -> Self {
        Self { fs, clock }
    }

    /// Write `table` into `dir` in `format`, named after today's date.
    ///
    /// An existing export from the same day is overwritten. Returns the path
    /// written.
    pub fn export(
        &self,
        table: &[MemberRecord],
        dir: &Path,
        format: ExportFormat,
    ) -> ApplicationResult<PathBuf> {
        match format {
            ExportFormat::Csv => self.export_csv(table, dir),
            ExportFormat::Xlsx => self.export_xlsx(table, dir),
        }
    }

    /// Write `table` as CSV, using the same column layout as the data file.
    pub fn export_csv(&self, table: &[MemberRecord], dir: &Path) -> ApplicationResult<PathBuf> {
        let content = encode_csv(table)?;
        self.write_export(table.len(), dir, ExportFormat::Csv, content.as_bytes())
    }

    /// Write `table` as a single-sheet workbook named `Organisasi`.
    ///
    /// ID and amount are numeric cells, everything else is text.
    pub fn export_xlsx(&self, table: &[MemberRecord], dir: &Path) -> ApplicationResult<PathBuf> {
        let content = encode_xlsx(table)?;
        self.write_export(table.len(), dir, ExportFormat::Xlsx, &content)
    }

    fn write_export(
        &self,
        members: usize,
        dir: &Path,
        format: ExportFormat,
        content: &[u8],
    ) -> ApplicationResult<PathBuf> {
        let target = dir.join(export_file_name(self.clock.today(), format));

        self.fs
            .create_dir_all(dir)
            .with_path_context("create export directory", dir)?;
        self.fs
            .write_bytes(&target, content)
            .with_path_context("write export", &target)?;

        debug!("export: wrote {} bytes", content.len());
        info!("exported {members} members to {}", target.display());
        Ok(target)
    }
}
