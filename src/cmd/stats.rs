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

use std::fmt::Display;
use std::fmt::Formatter;
use std::io::Write;

use clap::ValueEnum;

use crate::error::Fallible;
use crate::types::timestamp::Timestamp;
use kelime_core::CardStore;
use kelime_core::Stats;
use kelime_core::Storage;
use kelime_core::collection_stats;

#[derive(ValueEnum, Clone, Copy, PartialEq, Debug)]
pub enum StatsFormat {
    /// Human-readable summary.
    Text,
    /// A JSON object.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

pub fn print_stats<S: Storage>(
    store: &CardStore<S>,
    format: StatsFormat,
    now: Timestamp,
    out: &mut impl Write,
) -> Fallible<()> {
    let stats = collection_stats(store.list(), now);
    match format {
        StatsFormat::Text => write!(out, "{}", render_text(&stats))?,
        StatsFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?,
    }
    Ok(())
}

fn render_text(stats: &Stats) -> String {
    let mean = match stats.mean_easiness {
        Some(e) => format!("{e:.2}"),
        None => "-".to_string(),
    };
    format!(
        "Cards:       {}\n\
         Due now:     {}\n\
         New:         {}\n\
         Learning:    {}\n\
         Mature:      {}\n\
         Vocabulary:  {}\n\
         Grammar:     {}\n\
         Phrases:     {}\n\
         Mean ease:   {}\n",
        stats.total,
        stats.due,
        stats.new,
        stats.learning,
        stats.mature,
        stats.vocabulary,
        stats.grammar,
        stats.phrase,
        mean
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use kelime_core::CardContent;
    use kelime_core::Category;
    use kelime_core::MemoryStorage;

    fn now() -> Timestamp {
        Timestamp::from_millis(1_704_067_200_000).unwrap()
    }

    #[test]
    fn test_text() -> Fallible<()> {
        let mut store = CardStore::open(MemoryStorage::new())?;
        store.add(CardContent::new("merhaba", "hello"), Category::Phrase, now())?;
        let mut out = Vec::new();
        print_stats(&store, StatsFormat::Text, now(), &mut out)?;
        let text = String::from_utf8_lossy(&out);
        assert!(text.starts_with("Cards:       1\nDue now:     1\n"));
        assert!(text.contains("Phrases:     1\n"));
        assert!(text.ends_with("Mean ease:   -\n"));
        Ok(())
    }

    #[test]
    fn test_json() -> Fallible<()> {
        let store = CardStore::open(MemoryStorage::new())?;
        let mut out = Vec::new();
        print_stats(&store, StatsFormat::Json, now(), &mut out)?;
        let value: serde_json::Value = serde_json::from_slice(&out)?;
        assert_eq!(value["total"], 0);
        assert!(value["mean_easiness"].is_null());
        Ok(())
    }
}
