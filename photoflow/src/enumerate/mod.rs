//! Work enumeration.
//!
//! A [`WorkSource`] turns a root (a directory or a catalog) into the ordered,
//! deduplicated list of items for one run. An inaccessible root is a
//! precondition failure and aborts the run before any item is processed.

mod catalog;
mod directory;

pub use catalog::{thumbnail_path, CatalogReader, CatalogRow, CatalogScan, SqliteCatalog};
pub use directory::{
    distinct_output_path_for, is_processed, output_path_for, DirectoryScan, DEFAULT_EXTENSIONS,
    DEFAULT_MARKER,
};

use crate::core::WorkItem;
use crate::errors::PhotoflowError;

/// Produces the work list for a run.
pub trait WorkSource {
    /// Describes the source for log messages.
    fn describe(&self) -> String;

    /// Enumerates the items in processing order.
    fn enumerate(&self) -> Result<Vec<WorkItem>, PhotoflowError>;
}

impl WorkSource for Vec<WorkItem> {
    fn describe(&self) -> String {
        format!("{} prepared items", self.len())
    }

    fn enumerate(&self) -> Result<Vec<WorkItem>, PhotoflowError> {
        Ok(self.clone())
    }
}
