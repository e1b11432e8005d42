//! Error conversion helpers for filesystem calls

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait attaching an action and a path to `io::Result` failures.
pub trait IoResultExt<T> {
    /// ```ignore
    /// fs.write(&path, &content)
    ///     .with_path_context("write data file", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::Io {
            context: format!("{action}: {}", path.display()),
            source: e,
        })
    }
}
