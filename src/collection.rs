// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::env::current_dir;
use std::path::PathBuf;

use crate::config::Config;
use crate::db::Database;
use crate::error::ErrorReport;
use crate::error::Fallible;
use kelime_core::CardStore;

pub const DB_FILE: &str = "kelime.db";

/// An opened collection directory: its config and its card store.
pub struct Collection {
    pub config: Config,
    pub store: CardStore<Database>,
}

impl Collection {
    /// Open the collection in `directory`, or in the current working
    /// directory when none is given. The database is created on first use.
    pub fn new(directory: Option<String>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        if !directory.is_dir() {
            return Err(ErrorReport::not_found("directory does not exist."));
        }
        let directory = directory.canonicalize()?;
        let config = Config::load(&directory)?;
        let db = Database::new(&directory.join(DB_FILE))?;
        let store = CardStore::open_with_key(db, config.storage_key())?;
        log::debug!(
            "Opened collection at {} with {} cards",
            directory.display(),
            store.len()
        );
        Ok(Self { config, store })
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;
    use crate::config::CONFIG_FILE;
    use crate::error::ErrorKind;
    use kelime_core::CardContent;
    use kelime_core::Category;
    use kelime_core::Storage;
    use kelime_core::Timestamp;

    #[test]
    fn test_non_existent_directory() {
        let result = Collection::new(Some("./derpherp".to_string()));
        let err = result.err().unwrap();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "error: directory does not exist.");
    }

    #[test]
    fn test_empty_directory() -> Fallible<()> {
        let dir = tempdir()?;
        let collection = Collection::new(Some(dir.path().display().to_string()))?;
        assert!(collection.store.is_empty());
        assert!(dir.path().join(DB_FILE).exists());
        Ok(())
    }

    #[test]
    fn test_configured_storage_key() -> Fallible<()> {
        let dir = tempdir()?;
        write(dir.path().join(CONFIG_FILE), "storage_key = \"deste\"\n")?;
        let directory = Some(dir.path().display().to_string());
        {
            let mut collection = Collection::new(directory.clone())?;
            collection.store.add(
                CardContent::new("ev", "house"),
                Category::Vocabulary,
                Timestamp::now(),
            )?;
        }
        let collection = Collection::new(directory)?;
        assert_eq!(collection.store.len(), 1);
        assert!(collection.store.storage().get("deste")?.is_some());
        assert!(collection.store.storage().get("flashcards")?.is_none());
        Ok(())
    }
}
