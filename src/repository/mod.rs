// src/repository/mod.rs

//! Durable storage for the shipment collection
//!
//! The whole collection lives in one JSON file. Every command does a full
//! load, mutates in memory, and does a full save; there is no partial update.
//! Saves go through a temporary file in the same directory that is renamed
//! over the target, so readers see either the old or the new state.

use crate::error::{Error, Result};
use crate::shipment::{Shipment, ShipmentCollection};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Shipment store at a fixed path
#[derive(Debug, Clone)]
pub struct Repository {
    path: PathBuf,
}

impl Repository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored collection
    ///
    /// A missing file is an empty collection. A file that is not a valid list
    /// of unique shipments is `CorruptState`.
    pub fn load(&self) -> Result<ShipmentCollection> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No store at {}, starting empty", self.path.display());
                return Ok(ShipmentCollection::new());
            }
            Err(source) => return Err(self.persistence_error(source)),
        };

        // An empty file is what a fresh `touch` leaves behind
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(ShipmentCollection::new());
        }

        // Undecodable bytes surface as a parse error like any other damage
        let records: Vec<Shipment> =
            serde_json::from_slice(&content).map_err(|e| self.corrupt(e.to_string()))?;

        let collection =
            ShipmentCollection::from_shipments(records).map_err(|e| self.corrupt(e.to_string()))?;

        debug!(
            "Loaded {} shipment(s) from {}",
            collection.len(),
            self.path.display()
        );
        Ok(collection)
    }

    /// Replace the stored collection with `shipments`
    pub fn save(&self, shipments: &ShipmentCollection) -> Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        fs::create_dir_all(&parent).map_err(|e| self.persistence_error(e))?;

        // Write to temporary file first
        let temp = NamedTempFile::new_in(&parent).map_err(|e| self.persistence_error(e))?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, shipments.as_slice())
                .map_err(|e| self.persistence_error(io::Error::other(e)))?;
            writer
                .write_all(b"\n")
                .and_then(|_| writer.flush())
                .map_err(|e| self.persistence_error(e))?;
        }
        temp.as_file()
            .sync_all()
            .map_err(|e| self.persistence_error(e))?;

        // Atomic rename from temp to final destination
        temp.persist(&self.path)
            .map_err(|e| self.persistence_error(e.error))?;

        info!(
            "Saved {} shipment(s) to {}",
            shipments.len(),
            self.path.display()
        );
        Ok(())
    }

    fn corrupt(&self, message: String) -> Error {
        Error::CorruptState {
            path: self.path.clone(),
            message,
        }
    }

    fn persistence_error(&self, source: io::Error) -> Error {
        Error::PersistenceError {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, Repository) {
        let temp_dir = tempfile::tempdir().unwrap();
        let repo = Repository::new(temp_dir.path().join("shipments.json"));
        (temp_dir, repo)
    }

    fn sample() -> ShipmentCollection {
        let mut delivered = Shipment::new("EA123456789US", "Books, \"signed\"");
        delivered.delivered = true;
        delivered.carrier_status = "Delivered, Front Door/Porch".to_string();

        ShipmentCollection::from_shipments(vec![
            Shipment::new("1Z999AA10123456784", "Widget"),
            delivered,
            Shipment::new("123456789012", ""),
        ])
        .unwrap()
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let (_temp, repo) = create_test_repo();
        let shipments = repo.load().unwrap();
        assert!(shipments.is_empty());
        assert!(!repo.path().exists());
    }

    #[test]
    fn test_round_trip() {
        let (_temp, repo) = create_test_repo();
        let shipments = sample();

        repo.save(&shipments).unwrap();
        let loaded = repo.load().unwrap();

        assert_eq!(loaded, shipments);
    }

    #[test]
    fn test_save_overwrites() {
        let (_temp, repo) = create_test_repo();
        repo.save(&sample()).unwrap();

        let mut shipments = repo.load().unwrap();
        shipments.remove_item("1").unwrap();
        repo.save(&shipments).unwrap();

        let loaded = repo.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.as_slice()[0].tracking_number, "EA123456789US");
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let repo = Repository::new(temp_dir.path().join("nested/dir/shipments.json"));

        repo.save(&sample()).unwrap();
        assert!(repo.path().exists());
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let (temp, repo) = create_test_repo();
        repo.save(&sample()).unwrap();
        repo.save(&ShipmentCollection::new()).unwrap();

        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_stored_field_names() {
        let (_temp, repo) = create_test_repo();
        repo.save(&sample()).unwrap();

        let content = fs::read_to_string(repo.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        let first = &value[0];

        assert_eq!(first["trackingNumber"], "1Z999AA10123456784");
        assert_eq!(first["description"], "Widget");
        assert_eq!(first["delivered"], false);
        assert_eq!(first["carrierStatus"], "");
    }

    #[test]
    fn test_load_defaults_missing_fields() {
        let (_temp, repo) = create_test_repo();
        fs::write(repo.path(), r#"[{"trackingNumber": "123456789012"}]"#).unwrap();

        let loaded = repo.load().unwrap();
        assert_eq!(loaded.as_slice()[0], Shipment::new("123456789012", ""));
    }

    #[test]
    fn test_load_corrupt_file() {
        let (_temp, repo) = create_test_repo();

        for content in [
            "not json",
            r#"{"trackingNumber": "123456789012"}"#,
            r#"[{"description": "no number"}]"#,
            r#"[{"trackingNumber": "A"}, {"trackingNumber": "A"}]"#,
            r#"[{"trackingNumber": ""}]"#,
        ] {
            fs::write(repo.path(), content).unwrap();
            let result = repo.load();
            assert!(
                matches!(result, Err(Error::CorruptState { .. })),
                "{content}"
            );
        }
    }

    #[test]
    fn test_load_non_utf8_file() {
        let (_temp, repo) = create_test_repo();
        fs::write(repo.path(), [0xff, 0xfe, b'[', b']']).unwrap();

        let result = repo.load();
        assert!(matches!(result, Err(Error::CorruptState { .. })));
    }

    #[test]
    fn test_load_empty_file() {
        let (_temp, repo) = create_test_repo();
        fs::write(repo.path(), "\n").unwrap();
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_into_unwritable_location() {
        let temp = tempfile::tempdir().unwrap();
        let blocker = temp.path().join("file");
        fs::write(&blocker, "").unwrap();

        // Parent "directory" is a regular file
        let repo = Repository::new(blocker.join("shipments.json"));
        let result = repo.save(&sample());
        assert!(matches!(result, Err(Error::PersistenceError { .. })));
    }
}
