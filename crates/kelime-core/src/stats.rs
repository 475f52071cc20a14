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

use serde::Serialize;

use crate::types::card::Card;
use crate::types::card::Category;
use crate::types::timestamp::Timestamp;

/// Cards with at least this many consecutive successes count as mature.
const MATURE_REPETITIONS: u32 = 2;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub due: usize,
    /// Never reviewed.
    pub new: usize,
    /// Reviewed, but short of a mature streak.
    pub learning: usize,
    pub mature: usize,
    pub vocabulary: usize,
    pub grammar: usize,
    pub phrase: usize,
    /// Mean easiness factor of reviewed cards.
    pub mean_easiness: Option<f64>,
}

pub fn collection_stats(cards: &[Card], now: Timestamp) -> Stats {
    let mut stats = Stats {
        total: cards.len(),
        due: 0,
        new: 0,
        learning: 0,
        mature: 0,
        vocabulary: 0,
        grammar: 0,
        phrase: 0,
        mean_easiness: None,
    };
    let mut easiness_sum = 0.0;
    for card in cards {
        let perf = card.performance();
        if card.is_due(now) {
            stats.due += 1;
        }
        if perf.is_new() {
            stats.new += 1;
        } else {
            easiness_sum += perf.easiness_factor();
            if perf.repetitions() >= MATURE_REPETITIONS {
                stats.mature += 1;
            } else {
                stats.learning += 1;
            }
        }
        match card.category() {
            Category::Vocabulary => stats.vocabulary += 1,
            Category::Grammar => stats.grammar += 1,
            Category::Phrase => stats.phrase += 1,
        }
    }
    let reviewed = stats.learning + stats.mature;
    if reviewed > 0 {
        stats.mean_easiness = Some(easiness_sum / reviewed as f64);
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;
    use crate::sm2::Quality;
    use crate::types::card::CardContent;
    use crate::types::card::CardId;
    use crate::types::performance::update_performance;

    #[test]
    fn test_empty() -> Fallible<()> {
        let stats = collection_stats(&[], Timestamp::from_millis(0)?);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.mean_easiness, None);
        Ok(())
    }

    #[test]
    fn test_counts() -> Fallible<()> {
        let now = Timestamp::from_millis(1_704_067_200_000)?;
        let make = |id: &str, category: Category| {
            Card::new(CardId::new(id), CardContent::new("a", "b"), category, now)
        };
        let fresh = make("1", Category::Vocabulary)?;
        let mut learning = make("2", Category::Grammar)?;
        learning.set_performance(update_performance(learning.performance(), Quality::new(5)?, now));
        let mut mature = make("3", Category::Phrase)?;
        for _ in 0..2 {
            mature.set_performance(update_performance(mature.performance(), Quality::new(4)?, now));
        }
        let stats = collection_stats(&[fresh, learning, mature], now);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.due, 1);
        assert_eq!(stats.new, 1);
        assert_eq!(stats.learning, 1);
        assert_eq!(stats.mature, 1);
        assert_eq!((stats.vocabulary, stats.grammar, stats.phrase), (1, 1, 1));
        let mean = stats.mean_easiness.unwrap();
        assert!((mean - 2.55).abs() < 1e-9);
        Ok(())
    }
}
