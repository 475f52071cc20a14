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

//! Moving whole collections in and out as JSON, in the stored record format.

use std::fs::read_to_string;
use std::fs::write;
use std::io::Write;
use std::path::Path;

use crate::error::Fallible;
use kelime_core::CardStore;
use kelime_core::ImportSummary;
use kelime_core::Storage;
use kelime_core::parse_collection;

/// Write the collection to `output`, or to `out` when there is no output
/// path.
pub fn export_collection<S: Storage>(
    store: &CardStore<S>,
    output: Option<&Path>,
    out: &mut impl Write,
) -> Fallible<()> {
    let json = store.export_json()?;
    match output {
        Some(path) => {
            write(path, json + "\n")?;
            log::info!("Exported {} cards to {}", store.len(), path.display());
        }
        None => writeln!(out, "{json}")?,
    }
    Ok(())
}

/// Merge the cards in an export file into the collection. The whole file is
/// validated before anything is written.
pub fn import_collection<S: Storage>(
    store: &mut CardStore<S>,
    file: &Path,
    out: &mut impl Write,
) -> Fallible<ImportSummary> {
    let json = read_to_string(file)?;
    let cards = parse_collection(&json)?;
    let summary = store.import(cards)?;
    writeln!(
        out,
        "Imported {} new cards, replaced {}.",
        summary.added, summary.replaced
    )?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::error::ErrorKind;
    use crate::types::timestamp::Timestamp;
    use kelime_core::CardContent;
    use kelime_core::Category;
    use kelime_core::MemoryStorage;

    fn now() -> Timestamp {
        Timestamp::from_millis(1_704_067_200_000).unwrap()
    }

    #[test]
    fn test_export_then_import_elsewhere() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("cards.json");
        let mut source = CardStore::open(MemoryStorage::new())?;
        let card = source.add(
            CardContent::new("deniz", "sea").with_example("Deniz çok güzel."),
            Category::Vocabulary,
            now(),
        )?;
        export_collection(&source, Some(&path), &mut Vec::new())?;

        let mut target = CardStore::open(MemoryStorage::new())?;
        let mut out = Vec::new();
        let summary = import_collection(&mut target, &path, &mut out)?;
        assert_eq!((summary.added, summary.replaced), (1, 0));
        assert_eq!(target.list(), &[card]);
        assert_eq!(
            String::from_utf8_lossy(&out),
            "Imported 1 new cards, replaced 0.\n"
        );

        let summary = import_collection(&mut target, &path, &mut Vec::new())?;
        assert_eq!((summary.added, summary.replaced), (0, 1));
        assert_eq!(target.len(), 1);
        Ok(())
    }

    #[test]
    fn test_export_to_stdout() -> Fallible<()> {
        let store = CardStore::open(MemoryStorage::new())?;
        let mut out = Vec::new();
        export_collection(&store, None, &mut out)?;
        assert_eq!(String::from_utf8_lossy(&out), "[]\n");
        Ok(())
    }

    #[test]
    fn test_import_rejects_corrupt_file() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("cards.json");
        write(&path, r#"[{"id": "x", "turkish": "", "english": "y"}]"#)?;
        let mut store = CardStore::open(MemoryStorage::new())?;
        let err = import_collection(&mut store, &path, &mut Vec::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(store.is_empty());
        Ok(())
    }
}
