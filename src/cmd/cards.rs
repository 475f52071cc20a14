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

//! Adding, editing, removing and listing cards.

use std::io::Write;

use chrono::Local;

use crate::error::Fallible;
use crate::types::timestamp::Timestamp;
use kelime_core::Card;
use kelime_core::CardContent;
use kelime_core::CardId;
use kelime_core::CardStore;
use kelime_core::Category;
use kelime_core::Storage;
use kelime_core::due_cards;

pub struct NewCard {
    pub turkish: String,
    pub english: String,
    pub example: Option<String>,
    pub notes: Option<String>,
    pub category: Category,
}

/// Fields to change on an existing card. `None` keeps the current value; an
/// empty `notes` clears the notes.
#[derive(Default)]
pub struct ContentEdit {
    pub turkish: Option<String>,
    pub english: Option<String>,
    pub example: Option<String>,
    pub notes: Option<String>,
}

impl ContentEdit {
    fn is_empty(&self) -> bool {
        self.turkish.is_none()
            && self.english.is_none()
            && self.example.is_none()
            && self.notes.is_none()
    }

    fn apply(self, current: &CardContent) -> CardContent {
        let mut content = current.clone();
        if let Some(turkish) = self.turkish {
            content.turkish = turkish;
        }
        if let Some(english) = self.english {
            content.english = english;
        }
        if let Some(example) = self.example {
            content.example_usage = example;
        }
        if let Some(notes) = self.notes {
            content.notes = Some(notes).filter(|n| !n.trim().is_empty());
        }
        content
    }
}

/// Add a card and print its id.
pub fn add_card<S: Storage>(
    store: &mut CardStore<S>,
    new_card: NewCard,
    now: Timestamp,
    out: &mut impl Write,
) -> Fallible<Card> {
    let NewCard {
        turkish,
        english,
        example,
        notes,
        category,
    } = new_card;
    let mut content = CardContent::new(turkish, english);
    if let Some(example) = example {
        content = content.with_example(example);
    }
    if let Some(notes) = notes.filter(|n| !n.trim().is_empty()) {
        content = content.with_notes(notes);
    }
    let card = store.add(content, category, now)?;
    writeln!(out, "{}", card.id())?;
    Ok(card)
}

pub fn edit_card<S: Storage>(
    store: &mut CardStore<S>,
    id: &CardId,
    edit: ContentEdit,
    out: &mut impl Write,
) -> Fallible<bool> {
    if edit.is_empty() {
        writeln!(out, "Nothing to change.")?;
        return Ok(false);
    }
    let Some(card) = store.get(id) else {
        writeln!(out, "No card with id {id}.")?;
        return Ok(false);
    };
    let content = edit.apply(card.content());
    let edited = store.edit(id, content)?;
    if edited {
        writeln!(out, "Updated {id}.")?;
    }
    Ok(edited)
}

pub fn remove_card<S: Storage>(
    store: &mut CardStore<S>,
    id: &CardId,
    out: &mut impl Write,
) -> Fallible<bool> {
    let removed = store.remove(id)?;
    if removed {
        writeln!(out, "Removed {id}.")?;
    } else {
        writeln!(out, "No card with id {id}; nothing removed.")?;
    }
    Ok(removed)
}

/// Print one line per card, optionally only those due at `now`.
pub fn list_cards<S: Storage>(
    store: &CardStore<S>,
    due_only: bool,
    now: Timestamp,
    out: &mut impl Write,
) -> Fallible<usize> {
    let cards: Vec<Card> = if due_only {
        due_cards(store.list(), now)
    } else {
        store.list().to_vec()
    };
    for card in &cards {
        writeln!(out, "{}", format_card(card, now))?;
    }
    Ok(cards.len())
}

fn format_card(card: &Card, now: Timestamp) -> String {
    let content = card.content();
    let perf = card.performance();
    let schedule = match perf.next_review_at() {
        None => "new".to_string(),
        Some(next) if next <= now => "due".to_string(),
        Some(next) => format!(
            "due {}",
            next.into_inner().with_timezone(&Local).format("%Y-%m-%d")
        ),
    };
    format!(
        "{}  [{}]  {} = {}  ({}, reps {}, E {:.2})",
        card.id(),
        card.category(),
        content.turkish,
        content.english,
        schedule,
        perf.repetitions(),
        perf.easiness_factor()
    )
}
