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

//! WASM bindings for kelime - runs the flashcard scheduler in the browser.

use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::console;

use kelime_core::CardContent;
use kelime_core::CardId;
use kelime_core::CardStore;
use kelime_core::Category;
use kelime_core::ErrorReport;
use kelime_core::Quality;
use kelime_core::RateOutcome;
use kelime_core::Reply;
use kelime_core::Session;
use kelime_core::SessionLimits;
use kelime_core::Timestamp;
use kelime_core::capture_phrase;
use kelime_core::capture_vocabulary;
use kelime_core::collection_stats;
use kelime_core::due_cards;
use kelime_core::parse_collection;
use kelime_core::preview;

mod storage;

use storage::LocalStorage;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console::log_1(&"kelime WASM initialized".into());
}

fn js_error(context: &str, e: ErrorReport) -> JsValue {
    JsValue::from_str(&format!("{context}: {}", e.message()))
}

/// The browser clock, in epoch milliseconds.
fn now() -> Result<Timestamp, JsValue> {
    Timestamp::from_millis(js_sys::Date::now() as i64).map_err(|e| js_error("Invalid clock", e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize: {}", e)))
}

fn outcome_finished(outcome: RateOutcome) -> bool {
    matches!(outcome, RateOutcome::Completed { .. })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ButtonPreview {
    grade: &'static str,
    quality: u8,
    interval_days: u32,
}

/// The main application state managed from JavaScript.
#[wasm_bindgen]
pub struct KelimeApp {
    store: CardStore<LocalStorage>,
    session: Session,
}

#[wasm_bindgen]
impl KelimeApp {
    /// Load the collection from localStorage.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<KelimeApp, JsValue> {
        let store = CardStore::open(LocalStorage::new())
            .map_err(|e| js_error("Failed to load cards", e))?;
        Ok(Self {
            store,
            session: Session::new(),
        })
    }

    /// Add a card. Returns its id.
    #[wasm_bindgen]
    pub fn add_card(
        &mut self,
        turkish: &str,
        english: &str,
        example_usage: Option<String>,
        notes: Option<String>,
        category: Option<String>,
    ) -> Result<String, JsValue> {
        let category = match category {
            Some(c) => c
                .parse::<Category>()
                .map_err(|e| js_error("Invalid category", e))?,
            None => Category::Vocabulary,
        };
        let mut content = CardContent::new(turkish, english);
        if let Some(example) = example_usage {
            content = content.with_example(example);
        }
        if let Some(notes) = notes.filter(|n| !n.trim().is_empty()) {
            content = content.with_notes(notes);
        }
        let card = self
            .store
            .add(content, category, now()?)
            .map_err(|e| js_error("Failed to add card", e))?;
        Ok(card.id().to_string())
    }

    /// Replace a card's content. Returns false when no card has that id.
    #[wasm_bindgen]
    pub fn edit_card(
        &mut self,
        id: &str,
        turkish: &str,
        english: &str,
        example_usage: &str,
        notes: Option<String>,
    ) -> Result<bool, JsValue> {
        let mut content = CardContent::new(turkish, english).with_example(example_usage);
        if let Some(notes) = notes.filter(|n| !n.trim().is_empty()) {
            content = content.with_notes(notes);
        }
        self.store
            .edit(&CardId::from(id), content)
            .map_err(|e| js_error("Failed to edit card", e))
    }

    /// Remove a card. Returns false when no card has that id.
    #[wasm_bindgen]
    pub fn remove_card(&mut self, id: &str) -> Result<bool, JsValue> {
        self.store
            .remove(&CardId::from(id))
            .map_err(|e| js_error("Failed to remove card", e))
    }

    /// All cards, as a JSON array of records.
    #[wasm_bindgen]
    pub fn cards_json(&self) -> Result<String, JsValue> {
        to_json(&self.store.list())
    }

    #[wasm_bindgen]
    pub fn due_count(&self) -> Result<usize, JsValue> {
        Ok(due_cards(self.store.list(), now()?).len())
    }

    /// Start a review session over the cards due now.
    /// Returns the number of cards in the session.
    #[wasm_bindgen]
    pub fn start_session(
        &mut self,
        card_limit: Option<usize>,
        new_card_limit: Option<usize>,
    ) -> Result<usize, JsValue> {
        let limits = SessionLimits {
            card_limit,
            new_card_limit,
        };
        self.session
            .start(&self.store, now()?, &limits)
            .map_err(|e| js_error("Failed to start session", e))
    }

    /// Toggle the current card's answer. Returns whether it is now shown.
    #[wasm_bindgen]
    pub fn reveal(&mut self) -> Result<bool, JsValue> {
        self.session
            .toggle_reveal()
            .map_err(|e| js_error("Cannot reveal", e))
    }

    /// Rate the current card with a whole-number quality from 0 to 5.
    /// Returns true when that finished the session.
    #[wasm_bindgen]
    pub fn rate(&mut self, quality: f64) -> Result<bool, JsValue> {
        let quality = Quality::try_from(quality).map_err(|e| js_error("Invalid quality", e))?;
        self.session
            .rate(&mut self.store, quality, now()?)
            .map(outcome_finished)
            .map_err(|e| js_error("Failed to rate card", e))
    }

    /// Save a rating whose write failed. Returns true when that finished the
    /// session.
    #[wasm_bindgen]
    pub fn retry(&mut self) -> Result<bool, JsValue> {
        self.session
            .retry(&mut self.store)
            .map(outcome_finished)
            .map_err(|e| js_error("Failed to save rating", e))
    }

    /// End the session. Returns how many cards were skipped.
    #[wasm_bindgen]
    pub fn abort(&mut self) -> usize {
        self.session.abort(&mut self.store)
    }

    /// The card under review as a JSON record, or `null` when idle.
    #[wasm_bindgen]
    pub fn current_card_json(&self) -> Result<String, JsValue> {
        to_json(&self.session.current())
    }

    #[wasm_bindgen]
    pub fn is_revealed(&self) -> bool {
        self.session.is_revealed()
    }

    /// Get progress (cards reviewed / total).
    #[wasm_bindgen]
    pub fn progress(&self) -> f64 {
        match self.session.progress() {
            (_, 0) => 1.0,
            (reviewed, total) => reviewed as f64 / total as f64,
        }
    }

    /// The interval each answer button would give the current card.
    #[wasm_bindgen]
    pub fn preview_json(&self) -> Result<String, JsValue> {
        let card = self
            .session
            .current()
            .ok_or_else(|| JsValue::from_str("No cards in session"))?;
        let buttons: Vec<ButtonPreview> = preview(card.performance(), now()?)
            .into_iter()
            .map(|(grade, interval_days)| ButtonPreview {
                grade: grade.as_str(),
                quality: Quality::from(grade).value(),
                interval_days,
            })
            .collect();
        to_json(&buttons)
    }

    /// Add cards from a conversation reply. With `phrase`, the whole reply
    /// becomes one card; otherwise one card per vocabulary entry.
    /// Returns the number of cards added.
    #[wasm_bindgen]
    pub fn capture_reply(&mut self, reply_json: &str, phrase: bool) -> Result<usize, JsValue> {
        let reply = Reply::from_json(reply_json).map_err(|e| js_error("Invalid reply", e))?;
        let now = now()?;
        let added = if phrase {
            capture_phrase(&mut self.store, &reply, now)
                .map(|card| usize::from(card.is_some()))
        } else {
            capture_vocabulary(&mut self.store, &reply, now).map(|summary| summary.added.len())
        };
        added.map_err(|e| js_error("Failed to capture reply", e))
    }

    #[wasm_bindgen]
    pub fn stats_json(&self) -> Result<String, JsValue> {
        to_json(&collection_stats(self.store.list(), now()?))
    }

    #[wasm_bindgen]
    pub fn export_json(&self) -> Result<String, JsValue> {
        self.store
            .export_json()
            .map_err(|e| js_error("Failed to export", e))
    }

    /// Merge an exported collection. Returns the number of cards imported.
    #[wasm_bindgen]
    pub fn import_json(&mut self, json: &str) -> Result<usize, JsValue> {
        if !self.session.is_idle() {
            return Err(JsValue::from_str("Cannot import during a review session"));
        }
        let cards = parse_collection(json).map_err(|e| js_error("Invalid collection", e))?;
        let summary = self
            .store
            .import(cards)
            .map_err(|e| js_error("Failed to import", e))?;
        Ok(summary.added + summary.replaced)
    }
}
