//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (RecordStore, FileSystem, Clock)
//! but are themselves concrete structs, not traits.

mod export;
mod roster;

pub use export::{
    export_file_name, ExportFormat, ExportService, EXPORT_FILE_PREFIX, EXPORT_SHEET_NAME,
};
pub use roster::RosterService;
