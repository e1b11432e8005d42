//! Record store: persistence of the roster table
//!
//! The table lives in a single CSV file with a fixed header. Every save
//! rewrites the whole file; there is no append or partial write.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::MemberRecord;
use crate::infrastructure::traits::FileSystem;

/// Column names of the persisted table, in file order.
pub const CSV_HEADER: [&str; 7] = [
    "ID",
    "Nama",
    "Jabatan",
    "Divisi",
    "Gaji",
    "Telepon",
    "Tanggal_Bergabung",
];

/// Persistent storage for the full roster table.
pub trait RecordStore: Send + Sync {
    /// Read the whole table. A store with nothing saved yields an empty table.
    fn load(&self) -> ApplicationResult<Vec<MemberRecord>>;

    /// Replace the stored table with `table`.
    fn save(&self, table: &[MemberRecord]) -> ApplicationResult<()>;

    /// Human-readable location, for logs and messages.
    fn location(&self) -> String;
}

/// One CSV row, mapped to the on-disk column names.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(rename = "ID")]
    id: u64,
    #[serde(rename = "Nama")]
    name: String,
    #[serde(rename = "Jabatan")]
    role: String,
    #[serde(rename = "Divisi")]
    division: String,
    #[serde(rename = "Gaji")]
    amount: u64,
    #[serde(rename = "Telepon")]
    phone: String,
    #[serde(rename = "Tanggal_Bergabung")]
    join_date: String,
}

impl From<CsvRow> for MemberRecord {
    fn from(row: CsvRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            role: row.role,
            division: row.division,
            amount: row.amount,
            phone: row.phone,
            join_date: row.join_date,
        }
    }
}

impl From<&MemberRecord> for CsvRow {
    fn from(member: &MemberRecord) -> Self {
        Self {
            id: member.id,
            name: member.name.clone(),
            role: member.role.clone(),
            division: member.division.clone(),
            amount: member.amount,
            phone: member.phone.clone(),
            join_date: member.join_date.clone(),
        }
    }
}

/// Serialize a table to CSV text, header first.
///
/// The header is written even when `table` is empty.
pub fn encode_csv(table: &[MemberRecord]) -> ApplicationResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER).map_err(|e| csv_err("write header", e))?;
    for member in table {
        writer
            .serialize(CsvRow::from(member))
            .map_err(|e| csv_err(format!("write member {}", member.id), e))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ApplicationError::OperationFailed {
            context: "flush csv writer".to_string(),
            source: Box::new(e.into_error()),
        })?;
    String::from_utf8(bytes).map_err(|e| ApplicationError::OperationFailed {
        context: "encode csv as utf-8".to_string(),
        source: Box::new(e),
    })
}

/// Parse CSV text into a table. Rows are kept in file order.
pub fn decode_csv(content: &str, origin: &Path) -> ApplicationResult<Vec<MemberRecord>> {
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    reader
        .deserialize::<CsvRow>()
        .map(|row| {
            row.map(MemberRecord::from)
                .map_err(|e| csv_err(format!("read {}", origin.display()), e))
        })
        .collect()
}

fn csv_err(context: impl Into<String>, source: csv::Error) -> ApplicationError {
    ApplicationError::Csv {
        context: context.into(),
        source,
    }
}

/// CSV file store backed by a [`FileSystem`].
pub struct CsvRecordStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl CsvRecordStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for CsvRecordStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> ApplicationResult<Vec<MemberRecord>> {
        if !self.fs.exists(&self.path) {
            debug!("load: no data file, starting with empty table");
            return Ok(Vec::new());
        }
        let content = self
            .fs
            .read_to_string(&self.path)
            .with_path_context("read data file", &self.path)?;
        let table = decode_csv(&content, &self.path)?;
        debug!("load: {} members", table.len());
        Ok(table)
    }

    #[instrument(skip(self, table), fields(path = %self.path.display(), members = table.len()))]
    fn save(&self, table: &[MemberRecord]) -> ApplicationResult<()> {
        let content = encode_csv(table)?;
        self.fs
            .ensure_parent(&self.path)
            .with_path_context("create data directory", &self.path)?;
        self.fs
            .write(&self.path, &content)
            .with_path_context("write data file", &self.path)?;
        debug!("save: wrote {} bytes", content.len());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Store keeping the table in memory. Counts saves so callers can tell
/// whether an operation persisted.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    table: Mutex<Vec<MemberRecord>>,
    saves: Mutex<usize>,
}

impl MemoryRecordStore {
    pub fn new(table: Vec<MemberRecord>) -> Self {
        Self {
            table: Mutex::new(table),
            saves: Mutex::new(0),
        }
    }

    /// Snapshot of the stored table.
    pub fn snapshot(&self) -> Vec<MemberRecord> {
        self.table.lock().map(|t| t.clone()).unwrap_or_default()
    }

    /// Number of completed saves.
    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|s| *s).unwrap_or_default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn load(&self) -> ApplicationResult<Vec<MemberRecord>> {
        Ok(self.snapshot())
    }

    fn save(&self, table: &[MemberRecord]) -> ApplicationResult<()> {
        let mut stored = self.table.lock().map_err(|_| poisoned())?;
        *stored = table.to_vec();
        let mut saves = self.saves.lock().map_err(|_| poisoned())?;
        *saves += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

fn poisoned() -> ApplicationError {
    ApplicationError::OperationFailed {
        context: "memory store lock".to_string(),
        source: "lock poisoned".into(),
    }
}
