//! User Profile Store
//! Writes the welcome form's name/contact pair to a local JSON file.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Failed to write profile {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize profile: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Details collected by the welcome form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub contact: String,
}

/// File-backed profile storage. Each save replaces the whole file.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[cfg(test)]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn save(&self, profile: &UserProfile) -> Result<(), ProfileError> {
        let io_err = |source| ProfileError::Io {
            path: self.path.clone(),
            source,
        };

        let file = File::create(&self.path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, profile)?;
        writer.flush().map_err(io_err)?;

        log::info!("Saved user profile to {:?}", self.path);
        Ok(())
    }

    /// Read back the last saved profile, if any.
    #[cfg(test)]
    pub fn load(&self) -> Option<UserProfile> {
        let text = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&text).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_writes_name_and_contact_object() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path().join("user.json"));
        let profile = UserProfile {
            name: "Ada Lovelace".to_string(),
            contact: "+44 1234".to_string(),
        };

        store.save(&profile).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["name"], "Ada Lovelace");
        assert_eq!(value["contact"], "+44 1234");
        assert_eq!(value.as_object().unwrap().len(), 2);
    }

    #[test]
    fn save_overwrites_previous_profile() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path().join("user.json"));

        store
            .save(&UserProfile {
                name: "first".into(),
                contact: "1".into(),
            })
            .unwrap();
        store
            .save(&UserProfile {
                name: "second".into(),
                contact: "2".into(),
            })
            .unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.name, "second");
        assert_eq!(loaded.contact, "2");
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path().join("nope").join("user.json"));
        let err = store
            .save(&UserProfile {
                name: "a".into(),
                contact: "b".into(),
            })
            .unwrap_err();
        assert!(matches!(err, ProfileError::Io { .. }));
    }
}
