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
use std::io::Write;
use std::path::Path;

use crate::error::Fallible;
use crate::types::timestamp::Timestamp;
use kelime_core::CardStore;
use kelime_core::Reply;
use kelime_core::Storage;
use kelime_core::capture_phrase;
use kelime_core::capture_vocabulary;

/// Add cards from a saved conversation reply. Returns how many were added.
pub fn capture_reply<S: Storage>(
    store: &mut CardStore<S>,
    file: &Path,
    phrase: bool,
    now: Timestamp,
    out: &mut impl Write,
) -> Fallible<usize> {
    let reply = Reply::from_json(&read_to_string(file)?)?;
    if phrase {
        return match capture_phrase(store, &reply, now)? {
            Some(card) => {
                writeln!(out, "Added {}: {}", card.id(), card.content().turkish)?;
                Ok(1)
            }
            None => {
                writeln!(out, "That phrase is already in the collection.")?;
                Ok(0)
            }
        };
    }
    let summary = capture_vocabulary(store, &reply, now)?;
    for card in &summary.added {
        writeln!(
            out,
            "Added {}: {} = {}",
            card.id(),
            card.content().turkish,
            card.content().english
        )?;
    }
    if summary.skipped > 0 {
        writeln!(out, "Skipped {} known or incomplete words.", summary.skipped)?;
    }
    Ok(summary.added.len())
}
