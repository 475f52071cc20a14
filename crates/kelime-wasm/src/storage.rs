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

//! Browser localStorage as a card store backend.

use kelime_core::ErrorReport;
use kelime_core::Fallible;
use kelime_core::Storage;
use wasm_bindgen::JsValue;
use web_sys::Storage as WebStorage;

pub struct LocalStorage {
    inner: Option<WebStorage>,
}

impl LocalStorage {
    /// Without a window or with storage disabled, reads find nothing and
    /// writes are dropped.
    pub fn new() -> Self {
        let inner = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if inner.is_none() {
            log::warn!("localStorage is unavailable; cards will not be saved");
        }
        Self { inner }
    }
}

fn persistence_error(action: &str, key: &str, err: JsValue) -> ErrorReport {
    ErrorReport::persistence(format!("localStorage {action} of '{key}' failed: {err:?}"))
}

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Fallible<Option<String>> {
        match &self.inner {
            Some(storage) => storage
                .get_item(key)
                .map_err(|e| persistence_error("read", key, e)),
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Fallible<()> {
        match &self.inner {
            Some(storage) => storage
                .set_item(key, value)
                .map_err(|e| persistence_error("write", key, e)),
            None => Ok(()),
        }
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}
