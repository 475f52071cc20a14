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

use crate::error::Fallible;
use crate::storage::DEFAULT_STORAGE_KEY;
use crate::storage::Storage;
use crate::types::card::Card;
use crate::types::card::CardContent;
use crate::types::card::CardId;
use crate::types::card::Category;
use crate::types::performance::Performance;
use crate::types::timestamp::Timestamp;

/// The durable collection of cards.
///
/// Every mutation writes the whole collection back to storage before
/// returning. If that write fails the error is returned but the in-memory
/// change is kept, so a later [`CardStore::save`] can retry it.
pub struct CardStore<S: Storage> {
    storage: S,
    key: String,
    cards: Vec<Card>,
}

/// What [`CardStore::import`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub added: usize,
    pub replaced: usize,
}

impl<S: Storage> CardStore<S> {
    /// Load the collection stored under the default key.
    pub fn open(storage: S) -> Fallible<Self> {
        Self::open_with_key(storage, DEFAULT_STORAGE_KEY)
    }

    pub fn open_with_key(storage: S, key: impl Into<String>) -> Fallible<Self> {
        let key = key.into();
        let cards: Vec<Card> = match storage.get(&key)? {
            Some(json) => parse_collection(&json)?,
            None => Vec::new(),
        };
        log::debug!("Loaded {} cards from '{key}'", cards.len());
        Ok(Self {
            storage,
            key,
            cards,
        })
    }

    /// Create a card with default scheduling state.
    pub fn add(
        &mut self,
        content: CardContent,
        category: Category,
        now: Timestamp,
    ) -> Fallible<Card> {
        let card = Card::new(CardId::generate(), content, category, now)?;
        self.cards.push(card.clone());
        log::debug!("Added card {}", card.id());
        self.save()?;
        Ok(card)
    }

    /// Replace the scheduling state of a card. Returns `false` and leaves the
    /// store untouched if there is no card with that id.
    pub fn update(&mut self, id: &CardId, performance: Performance) -> Fallible<bool> {
        let Some(card) = self.cards.iter_mut().find(|c| c.id() == id) else {
            log::debug!("Update of unknown card {id} ignored");
            return Ok(false);
        };
        card.set_performance(performance);
        self.save()?;
        Ok(true)
    }

    /// Put back a card's scheduling state in memory without writing. Undoes an
    /// `update` whose write failed.
    pub(crate) fn restore(&mut self, id: &CardId, performance: Performance) -> bool {
        match self.cards.iter_mut().find(|c| c.id() == id) {
            Some(card) => {
                card.set_performance(performance);
                true
            }
            None => false,
        }
    }

    /// Replace the content of a card, keeping its scheduling state.
    pub fn edit(&mut self, id: &CardId, content: CardContent) -> Fallible<bool> {
        let Some(card) = self.cards.iter_mut().find(|c| c.id() == id) else {
            return Ok(false);
        };
        card.set_content(content)?;
        self.save()?;
        Ok(true)
    }

    /// Delete a card. Removing an unknown id is not an error.
    pub fn remove(&mut self, id: &CardId) -> Fallible<bool> {
        let before = self.cards.len();
        self.cards.retain(|c| c.id() != id);
        if self.cards.len() == before {
            log::debug!("Removal of unknown card {id} ignored");
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// All cards, in insertion order.
    pub fn list(&self) -> &[Card] {
        &self.cards
    }

    pub fn get(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id() == id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Merge cards into the collection: known ids are replaced in place, the
    /// rest are appended. Writes once at the end.
    pub fn import(&mut self, cards: Vec<Card>) -> Fallible<ImportSummary> {
        let mut summary = ImportSummary::default();
        for card in cards {
            match self.cards.iter_mut().find(|c| c.id() == card.id()) {
                Some(existing) => {
                    *existing = card;
                    summary.replaced += 1;
                }
                None => {
                    self.cards.push(card);
                    summary.added += 1;
                }
            }
        }
        log::info!(
            "Imported {} new and {} replaced cards",
            summary.added,
            summary.replaced
        );
        self.save()?;
        Ok(summary)
    }

    /// Write the full collection to storage.
    pub fn save(&mut self) -> Fallible<()> {
        let json = serde_json::to_string(&self.cards)?;
        self.storage.set(&self.key, &json)
    }

    /// The collection as pretty-printed JSON, in the stored record format.
    pub fn export_json(&self) -> Fallible<String> {
        Ok(serde_json::to_string_pretty(&self.cards)?)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}

/// Parse a JSON array of card records.
pub fn parse_collection(json: &str) -> Fallible<Vec<Card>> {
    Ok(serde_json::from_str(json)?)
}
