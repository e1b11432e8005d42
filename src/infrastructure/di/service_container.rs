//! Service container for dependency injection
//!
//! Built once per process and handed to command handlers explicitly.

use std::sync::Arc;

use crate::application::services::{ExportService, RosterService};
use crate::config::Settings;
use crate::infrastructure::store::{CsvRecordStore, RecordStore};
use crate::infrastructure::traits::{Clock, FileSystem, RealFileSystem, SystemClock};
use crate::infrastructure::InfraResult;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Member table, loaded from `settings.data_file`
    pub roster: RosterService,

    pub export: ExportService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        Self::with_deps(settings, Arc::new(RealFileSystem), Arc::new(SystemClock))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        clock: Arc<dyn Clock>,
    ) -> InfraResult<Self> {
        let store: Arc<dyn RecordStore> =
            Arc::new(CsvRecordStore::new(fs.clone(), settings.data_file.clone()));
        Self::with_store(settings, fs, clock, store)
    }

    /// Create a service container over an arbitrary record store.
    pub fn with_store(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        clock: Arc<dyn Clock>,
        store: Arc<dyn RecordStore>,
    ) -> InfraResult<Self> {
        let settings = Arc::new(settings);
        let roster = RosterService::new(store, clock.clone())?;
        let export = ExportService::new(fs, clock);

        Ok(Self {
            settings,
            roster,
            export,
        })
    }
}
