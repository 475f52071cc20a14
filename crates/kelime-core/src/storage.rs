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

//! Key-value backends for the card store.

use std::collections::HashMap;

use crate::error::ErrorReport;
use crate::error::Fallible;

/// The key the card collection is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "flashcards";

/// A string key-value store. Implementations map their own failures to
/// [`ErrorKind::PersistenceFailure`](crate::error::ErrorKind::PersistenceFailure).
pub trait Storage {
    fn get(&self, key: &str) -> Fallible<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Fallible<()>;
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn get(&self, key: &str) -> Fallible<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Fallible<()> {
        (**self).set(key, value)
    }
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get(&self, key: &str) -> Fallible<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Fallible<()> {
        (**self).set(key, value)
    }
}

/// Storage that lives only as long as the process. Writes can be made to
/// fail, to exercise the error paths of the store and session.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail (or succeed again).
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Fallible<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Fallible<()> {
        if self.fail_writes {
            return Err(ErrorReport::persistence(format!(
                "write to '{key}' rejected"
            )));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_get_missing() -> Fallible<()> {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(DEFAULT_STORAGE_KEY)?, None);
        Ok(())
    }

    #[test]
    fn test_set_then_get() -> Fallible<()> {
        let mut storage = MemoryStorage::new();
        storage.set("k", "v1")?;
        storage.set("k", "v2")?;
        assert_eq!(storage.get("k")?, Some("v2".to_string()));
        Ok(())
    }

    #[test]
    fn test_failing_writes() -> Fallible<()> {
        let mut storage = MemoryStorage::new().with_entry("k", "old");
        storage.set_fail_writes(true);
        let err = storage.set("k", "new").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PersistenceFailure);
        assert_eq!(storage.get("k")?, Some("old".to_string()));
        Ok(())
    }
}
