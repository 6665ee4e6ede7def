//! Thumbnail work from a photo catalog database.
//!
//! The catalog is a photo manager's SQLite database with a `PhotoTable`
//! holding one row per photo. Every (row, thumbnail size) pair becomes one
//! work item, newest photos first.

use rusqlite::{Connection, OpenFlags};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::WorkSource;
use crate::core::WorkItem;
use crate::errors::{CatalogError, PhotoflowError, PreconditionError};

const PHOTO_QUERY: &str =
    "SELECT id, filename, exposure_time FROM PhotoTable ORDER BY exposure_time DESC, id DESC";

/// One photo row from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    /// The row id, also used to name thumbnails.
    pub id: i64,
    /// The photo file.
    pub filename: PathBuf,
    /// Exposure time as a unix timestamp (0 when unknown).
    pub exposure_time: i64,
}

impl CatalogRow {
    /// Creates a row.
    pub fn new(id: i64, filename: impl Into<PathBuf>, exposure_time: i64) -> Self {
        Self {
            id,
            filename: filename.into(),
            exposure_time,
        }
    }
}

/// Reads photo rows from a catalog.
pub trait CatalogReader {
    /// Returns the catalog location, for error messages.
    fn location(&self) -> &Path;

    /// Reads all photo rows.
    fn read_rows(&self) -> Result<Vec<CatalogRow>, CatalogError>;
}

/// A catalog stored in an SQLite database file, opened read-only.
#[derive(Debug, Clone)]
pub struct SqliteCatalog {
    path: PathBuf,
}

impl SqliteCatalog {
    /// Creates a reader for the database at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogReader for SqliteCatalog {
    fn location(&self) -> &Path {
        &self.path
    }

    fn read_rows(&self) -> Result<Vec<CatalogRow>, CatalogError> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(CatalogError::Open)?;

        let mut stmt = conn.prepare(PHOTO_QUERY).map_err(CatalogError::Query)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(CatalogRow {
                    id: row.get(0)?,
                    filename: PathBuf::from(row.get::<_, String>(1)?),
                    exposure_time: row.get::<_, Option<i64>>(2)?.unwrap_or_default(),
                })
            })
            .map_err(CatalogError::Query)?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(CatalogError::Query)
    }
}

/// Returns `<root>/thumbs<size>/thumb<id as 16 hex digits>.jpg`.
#[must_use]
pub fn thumbnail_path(root: &Path, size: u32, id: i64) -> PathBuf {
    root.join(format!("thumbs{size}"))
        .join(format!("thumb{id:016x}.jpg"))
}

/// Expands catalog rows into per-size thumbnail items.
#[derive(Debug, Clone)]
pub struct CatalogScan<R> {
    reader: R,
    thumb_root: PathBuf,
    sizes: Vec<u32>,
}

impl<R: CatalogReader> CatalogScan<R> {
    /// Creates a scan writing thumbnails under `thumb_root`.
    pub fn new(reader: R, thumb_root: impl Into<PathBuf>, sizes: Vec<u32>) -> Self {
        Self {
            reader,
            thumb_root: thumb_root.into(),
            sizes,
        }
    }
}

impl<R: CatalogReader> WorkSource for CatalogScan<R> {
    fn describe(&self) -> String {
        format!("catalog {}", self.reader.location().display())
    }

    fn enumerate(&self) -> Result<Vec<WorkItem>, PhotoflowError> {
        let location = self.reader.location();
        if !location.exists() {
            return Err(PreconditionError::missing(location).into());
        }

        let mut rows = self
            .reader
            .read_rows()
            .map_err(|e| PreconditionError::unreadable(location, e))?;

        // Newest first regardless of what order the reader returned.
        rows.sort_by(|a, b| {
            b.exposure_time
                .cmp(&a.exposure_time)
                .then_with(|| b.id.cmp(&a.id))
        });

        let mut seen = HashSet::new();
        rows.retain(|row| seen.insert(row.id));

        debug!(
            catalog = %location.display(),
            rows = rows.len(),
            sizes = ?self.sizes,
            "Catalog read"
        );

        Ok(rows
            .iter()
            .flat_map(|row| {
                self.sizes.iter().map(move |&size| {
                    WorkItem::from_catalog_row(
                        row.id,
                        row.filename.clone(),
                        size,
                        thumbnail_path(&self.thumb_root, size, row.id),
                    )
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ItemId;
    use pretty_assertions::assert_eq;

    fn create_catalog(path: &Path, rows: &[(i64, &str, Option<i64>)]) {
        let conn = Connection::open(path).unwrap();
        conn.execute(
            "CREATE TABLE PhotoTable \
             (id INTEGER PRIMARY KEY, filename TEXT NOT NULL, exposure_time INTEGER)",
            [],
        )
        .unwrap();
        for (id, filename, exposure) in rows {
            conn.execute(
                "INSERT INTO PhotoTable (id, filename, exposure_time) VALUES (?1, ?2, ?3)",
                rusqlite::params![id, filename, exposure],
            )
            .unwrap();
        }
    }

    #[test]
    fn test_thumbnail_path() {
        assert_eq!(
            thumbnail_path(Path::new("/t"), 360, 0x2a),
            PathBuf::from("/t/thumbs360/thumb000000000000002a.jpg")
        );
    }

    #[test]
    fn test_sqlite_rows_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("photo.db");
        create_catalog(
            &db,
            &[
                (1, "/p/old.jpg", Some(100)),
                (2, "/p/new.jpg", Some(300)),
                (3, "/p/undated.jpg", None),
            ],
        );

        let rows = SqliteCatalog::new(&db).read_rows().unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(rows[2].exposure_time, 0);
    }

    #[test]
    fn test_scan_expands_sizes() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("photo.db");
        create_catalog(&db, &[(7, "/p/a.jpg", Some(10)), (9, "/p/b.jpg", Some(20))]);

        let scan = CatalogScan::new(SqliteCatalog::new(&db), "/thumbs", vec![128, 360]);
        let items = scan.enumerate().unwrap();

        let ids: Vec<ItemId> = items.iter().map(|i| i.id().clone()).collect();
        assert_eq!(
            ids,
            vec![
                ItemId::CatalogRow { id: 9, filename: "/p/b.jpg".into(), size: 128 },
                ItemId::CatalogRow { id: 9, filename: "/p/b.jpg".into(), size: 360 },
                ItemId::CatalogRow { id: 7, filename: "/p/a.jpg".into(), size: 128 },
                ItemId::CatalogRow { id: 7, filename: "/p/a.jpg".into(), size: 360 },
            ]
        );
        assert_eq!(
            items[1].output(),
            Path::new("/thumbs/thumbs360/thumb0000000000000009.jpg")
        );
    }

    #[test]
    fn test_missing_catalog_is_precondition() {
        let scan = CatalogScan::new(SqliteCatalog::new("/no/such/photo.db"), "/thumbs", vec![128]);
        let err = scan.enumerate().unwrap_err();
        assert!(matches!(err, PhotoflowError::Precondition(_)));
    }

    #[test]
    fn test_malformed_catalog_is_precondition() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("photo.db");
        std::fs::write(&db, b"this is not a database").unwrap();

        let scan = CatalogScan::new(SqliteCatalog::new(&db), "/thumbs", vec![128]);
        let err = scan.enumerate().unwrap_err();
        assert!(matches!(err, PhotoflowError::Precondition(_)));
    }
}
