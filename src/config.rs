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

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use kelime_core::DEFAULT_STORAGE_KEY;
use kelime_core::SessionLimits;

pub const CONFIG_FILE: &str = "kelime.toml";

/// Settings read from `kelime.toml` in the collection directory. Every key is
/// optional, and a missing file is the same as an empty one.
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The key the collection is stored under.
    pub storage_key: Option<String>,
    pub card_limit: Option<usize>,
    pub new_card_limit: Option<usize>,
}

impl Config {
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = read_to_string(&path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Fallible<Self> {
        toml::from_str(text)
            .map_err(|e| ErrorReport::invalid_input(format!("invalid {CONFIG_FILE}: {e}")))
    }

    pub fn storage_key(&self) -> &str {
        self.storage_key.as_deref().unwrap_or(DEFAULT_STORAGE_KEY)
    }

    /// Session limits, with command line values taking precedence.
    pub fn limits(&self, card_limit: Option<usize>, new_card_limit: Option<usize>) -> SessionLimits {
        SessionLimits {
            card_limit: card_limit.or(self.card_limit),
            new_card_limit: new_card_limit.or(self.new_card_limit),
        }
    }
}
