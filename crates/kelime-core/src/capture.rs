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

//! Turning conversation replies into cards.
//!
//! The conversation partner answers each turn with a Turkish text, its English
//! translation, and optionally the vocabulary it used. How that reply was
//! produced is not our concern.

use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::storage::Storage;
use crate::store::CardStore;
use crate::types::card::Card;
use crate::types::card::CardContent;
use crate::types::card::Category;
use crate::types::timestamp::Timestamp;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub word: String,
    pub translation: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub turkish: String,
    pub english: String,
    #[serde(default)]
    pub vocabulary: Option<Vec<VocabularyItem>>,
}

/// Cards created from a reply.
#[derive(Debug, Default)]
pub struct CaptureSummary {
    pub added: Vec<Card>,
    /// Entries that were already in the collection, repeated, or incomplete.
    pub skipped: usize,
}

impl Reply {
    pub fn from_json(json: &str) -> Fallible<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn vocabulary(&self) -> &[VocabularyItem] {
        self.vocabulary.as_deref().unwrap_or_default()
    }

    /// One card per vocabulary entry, with the reply's sentence as the
    /// example.
    pub fn vocabulary_content(&self) -> Vec<CardContent> {
        self.vocabulary()
            .iter()
            .map(|item| {
                CardContent::new(item.word.trim(), item.translation.trim())
                    .with_example(self.turkish.trim())
            })
            .collect()
    }

    /// The whole reply as a single card.
    pub fn phrase_content(&self) -> CardContent {
        CardContent::new(self.turkish.trim(), self.english.trim())
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

fn known_fronts<S: Storage>(store: &CardStore<S>) -> HashSet<String> {
    store
        .list()
        .iter()
        .map(|c| normalize(&c.content().turkish))
        .collect()
}

/// Add the reply's vocabulary as cards, skipping words that are already in
/// the collection (ignoring case) and entries missing either side.
pub fn capture_vocabulary<S: Storage>(
    store: &mut CardStore<S>,
    reply: &Reply,
    now: Timestamp,
) -> Fallible<CaptureSummary> {
    let mut known = known_fronts(store);
    let mut summary = CaptureSummary::default();
    for content in reply.vocabulary_content() {
        if content.validate().is_err() {
            log::warn!("Skipping incomplete vocabulary entry '{}'", content.turkish);
            summary.skipped += 1;
            continue;
        }
        if !known.insert(normalize(&content.turkish)) {
            summary.skipped += 1;
            continue;
        }
        let card = store.add(content, Category::Vocabulary, now)?;
        summary.added.push(card);
    }
    Ok(summary)
}

/// Add the whole reply as a phrase card, unless that phrase is already known.
pub fn capture_phrase<S: Storage>(
    store: &mut CardStore<S>,
    reply: &Reply,
    now: Timestamp,
) -> Fallible<Option<Card>> {
    let content = reply.phrase_content();
    if known_fronts(store).contains(&normalize(&content.turkish)) {
        return Ok(None);
    }
    store.add(content, Category::Phrase, now).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn now() -> Timestamp {
        Timestamp::from_millis(1_704_067_200_000).unwrap()
    }

    const REPLY: &str = r#"{
        "turkish": "Bu akşam çay içelim mi?",
        "english": "Shall we drink tea this evening?",
        "vocabulary": [
            {"word": "akşam", "translation": "evening"},
            {"word": "çay", "translation": "tea"},
            {"word": "Çay", "translation": "tea"},
            {"word": "içmek", "translation": ""}
        ]
    }"#;

    #[test]
    fn test_parse_without_vocabulary() -> Fallible<()> {
        let reply = Reply::from_json(r#"{"turkish": "Merhaba!", "english": "Hello!"}"#)?;
        assert!(reply.vocabulary().is_empty());
        let reply =
            Reply::from_json(r#"{"turkish": "Merhaba!", "english": "Hello!", "vocabulary": null}"#)?;
        assert!(reply.vocabulary().is_empty());
        Ok(())
    }

    #[test]
    fn test_vocabulary_content_uses_sentence_as_example() -> Fallible<()> {
        let reply = Reply::from_json(REPLY)?;
        let content = reply.vocabulary_content();
        assert_eq!(content.len(), 4);
        assert_eq!(content[0].turkish, "akşam");
        assert_eq!(content[0].english, "evening");
        assert_eq!(content[0].example_usage, "Bu akşam çay içelim mi?");
        Ok(())
    }

    #[test]
    fn test_capture_vocabulary() -> Fallible<()> {
        let mut store = CardStore::open(MemoryStorage::new())?;
        store.add(CardContent::new("akşam", "evening"), Category::Vocabulary, now())?;
        let reply = Reply::from_json(REPLY)?;
        let summary = capture_vocabulary(&mut store, &reply, now())?;
        assert_eq!(summary.added.len(), 1);
        assert_eq!(summary.added[0].content().turkish, "çay");
        assert_eq!(summary.added[0].category(), Category::Vocabulary);
        assert_eq!(summary.skipped, 3);
        assert_eq!(store.len(), 2);
        Ok(())
    }

    #[test]
    fn test_capture_phrase_once() -> Fallible<()> {
        let mut store = CardStore::open(MemoryStorage::new())?;
        let reply = Reply::from_json(REPLY)?;
        let card = capture_phrase(&mut store, &reply, now())?.unwrap();
        assert_eq!(card.category(), Category::Phrase);
        assert_eq!(card.content().english, "Shall we drink tea this evening?");
        assert!(capture_phrase(&mut store, &reply, now())?.is_none());
        assert_eq!(store.len(), 1);
        Ok(())
    }
}
