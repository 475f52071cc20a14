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

//! One pass over the cards that are due.
//!
//! A session moves from [`Session::Idle`] to [`Session::InProgress`] when it
//! starts, and back to `Idle` when the last card is rated or the user aborts.
//! The due list is taken once at the start; cards that become due, or are
//! added, while the session runs wait for the next one.

use crate::due::SessionLimits;
use crate::due::apply_limits;
use crate::due::due_cards;
use crate::error::ErrorKind;
use crate::error::Fallible;
use crate::error::fail;
use crate::sm2::Quality;
use crate::sm2::schedule;
use crate::storage::Storage;
use crate::store::CardStore;
use crate::types::card::Card;
use crate::types::performance::Performance;
use crate::types::timestamp::Timestamp;

#[derive(Debug, Default)]
pub enum Session {
    #[default]
    Idle,
    InProgress(Drill),
}

/// The state of a running session.
#[derive(Debug)]
pub struct Drill {
    /// The due list, fixed when the session started. Never empty.
    cards: Vec<Card>,
    /// Position of the current card; always less than `cards.len()`.
    index: usize,
    revealed: bool,
    /// A computed rating whose store write failed. `retry` writes this exact
    /// value; it is never recomputed.
    pending: Option<Performance>,
}

/// What happened after a rating was stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateOutcome {
    /// Another card is up.
    Next,
    /// That was the last card; the session is idle again.
    Completed { reviewed: usize },
}

impl Session {
    pub fn new() -> Self {
        Self::Idle
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Session::Idle)
    }

    /// Snapshot the due cards and begin reviewing them. Returns the number of
    /// cards in the session. With nothing due the session stays idle.
    pub fn start<S: Storage>(
        &mut self,
        store: &CardStore<S>,
        now: Timestamp,
        limits: &SessionLimits,
    ) -> Fallible<usize> {
        if !self.is_idle() {
            return fail(ErrorKind::InvalidInput, "a review session is already in progress");
        }
        let cards = apply_limits(due_cards(store.list(), now), limits);
        let total = cards.len();
        if cards.is_empty() {
            log::info!("No cards due.");
            return Ok(0);
        }
        log::info!("Starting session with {total} cards");
        *self = Session::InProgress(Drill {
            cards,
            index: 0,
            revealed: false,
            pending: None,
        });
        Ok(total)
    }

    /// The card under review.
    pub fn current(&self) -> Option<&Card> {
        match self {
            Session::Idle => None,
            Session::InProgress(drill) => drill.cards.get(drill.index),
        }
    }

    pub fn is_revealed(&self) -> bool {
        match self {
            Session::Idle => false,
            Session::InProgress(drill) => drill.revealed,
        }
    }

    /// Show or hide the answer of the current card. Returns whether the answer
    /// is now shown.
    pub fn toggle_reveal(&mut self) -> Fallible<bool> {
        match self {
            Session::Idle => fail(ErrorKind::InvalidInput, "no review session in progress"),
            Session::InProgress(drill) => {
                drill.revealed = !drill.revealed;
                Ok(drill.revealed)
            }
        }
    }

    /// Rate the current card, store the new schedule and move on.
    ///
    /// If the store write fails the session stays on this card and keeps the
    /// computed schedule; call [`Session::retry`] to write it again.
    pub fn rate<S: Storage>(
        &mut self,
        store: &mut CardStore<S>,
        quality: Quality,
        now: Timestamp,
    ) -> Fallible<RateOutcome> {
        let Session::InProgress(drill) = self else {
            return fail(ErrorKind::InvalidInput, "no review session in progress");
        };
        if drill.pending.is_some() {
            return fail(
                ErrorKind::InvalidInput,
                "the previous rating has not been saved yet",
            );
        }
        if !drill.revealed {
            return fail(ErrorKind::InvalidInput, "reveal the card before rating it");
        }
        let card = &drill.cards[drill.index];
        drill.pending = Some(schedule(card, quality, now));
        self.write_pending(store)
    }

    /// Write a rating that failed to persist, then move on.
    pub fn retry<S: Storage>(&mut self, store: &mut CardStore<S>) -> Fallible<RateOutcome> {
        if !self.has_pending_write() {
            return fail(ErrorKind::InvalidInput, "there is no unsaved rating to retry");
        }
        self.write_pending(store)
    }

    pub fn has_pending_write(&self) -> bool {
        match self {
            Session::Idle => false,
            Session::InProgress(drill) => drill.pending.is_some(),
        }
    }

    /// End the session early. Unreviewed cards keep their schedule and are due
    /// again next time. A rating whose write failed is undone in the store, so
    /// that card counts as skipped too. Returns how many cards were skipped.
    pub fn abort<S: Storage>(&mut self, store: &mut CardStore<S>) -> usize {
        let skipped = match self {
            Session::Idle => 0,
            Session::InProgress(drill) => {
                if drill.pending.is_some() {
                    let card = &drill.cards[drill.index];
                    log::warn!("Discarding an unsaved rating for {}", card.id());
                    store.restore(card.id(), *card.performance());
                }
                drill.cards.len() - drill.index
            }
        };
        *self = Session::Idle;
        skipped
    }

    /// `(reviewed, total)` for the running session; `(0, 0)` when idle.
    pub fn progress(&self) -> (usize, usize) {
        match self {
            Session::Idle => (0, 0),
            Session::InProgress(drill) => (drill.index, drill.cards.len()),
        }
    }

    fn write_pending<S: Storage>(&mut self, store: &mut CardStore<S>) -> Fallible<RateOutcome> {
        let Session::InProgress(drill) = self else {
            return fail(ErrorKind::InvalidInput, "no review session in progress");
        };
        let Some(result) = drill.pending else {
            return fail(ErrorKind::InvalidInput, "there is no unsaved rating to write");
        };
        let id = drill.cards[drill.index].id().clone();
        if !store.update(&id, result)? {
            log::warn!("Card {id} was removed during the session; rating dropped");
        }
        drill.pending = None;
        drill.index += 1;
        drill.revealed = false;
        if drill.index == drill.cards.len() {
            let reviewed = drill.index;
            *self = Session::Idle;
            log::info!("Session completed after {reviewed} reviews");
            return Ok(RateOutcome::Completed { reviewed });
        }
        Ok(RateOutcome::Next)
    }
}
