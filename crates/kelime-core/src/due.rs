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

use crate::types::card::Card;
use crate::types::timestamp::Timestamp;

/// Caps on how many cards a session takes from the due set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionLimits {
    /// Maximum number of cards in a session.
    pub card_limit: Option<usize>,
    /// Maximum number of never-reviewed cards in a session.
    pub new_card_limit: Option<usize>,
}

/// Cards that should be reviewed at `now`, in the order they were given.
pub fn due_cards(cards: &[Card], now: Timestamp) -> Vec<Card> {
    cards.iter().filter(|c| c.is_due(now)).cloned().collect()
}

/// Narrow a due list. New cards beyond the new card limit are dropped first,
/// then the list is truncated to the card limit. Order is preserved.
pub fn apply_limits(due: Vec<Card>, limits: &SessionLimits) -> Vec<Card> {
    let due: Vec<Card> = match limits.new_card_limit {
        Some(limit) => {
            let mut new_count = 0;
            due.into_iter()
                .filter(|card| {
                    if !card.performance().is_new() {
                        return true;
                    }
                    new_count += 1;
                    new_count <= limit
                })
                .collect()
        }
        None => due,
    };
    match limits.card_limit {
        Some(limit) => due.into_iter().take(limit).collect(),
        None => due,
    }
}
