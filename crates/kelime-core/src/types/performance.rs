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

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::sm2::Easiness;
use crate::sm2::FIRST_INTERVAL;
use crate::sm2::INITIAL_EASINESS;
use crate::sm2::IntervalDays;
use crate::sm2::MIN_EASINESS;
use crate::sm2::Quality;
use crate::sm2::grown_interval;
use crate::sm2::new_easiness;
use crate::types::timestamp::Timestamp;

/// The scheduling state of a card.
///
/// The fields are private: a value is either the default state of a new card,
/// the output of [`update_performance`], or a validated decode of a stored
/// record. This keeps the easiness floor, the minimum interval and the link
/// between the review timestamps intact.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Performance {
    /// The SM-2 easiness factor.
    easiness_factor: Easiness,
    /// Days between the last review and the next one.
    interval_days: IntervalDays,
    /// Consecutive successful reviews.
    repetitions: u32,
    /// When the card was last rated.
    last_reviewed_at: Option<Timestamp>,
    /// When the card becomes due again.
    next_review_at: Option<Timestamp>,
}

impl Performance {
    /// Rebuild a performance from stored fields.
    pub fn from_parts(
        easiness_factor: Easiness,
        interval_days: IntervalDays,
        repetitions: u32,
        last_reviewed_at: Option<Timestamp>,
        next_review_at: Option<Timestamp>,
    ) -> Fallible<Self> {
        if !easiness_factor.is_finite() || easiness_factor < MIN_EASINESS {
            return Err(ErrorReport::invalid_input(format!(
                "easiness factor must be at least {MIN_EASINESS}, got {easiness_factor}"
            )));
        }
        if interval_days < FIRST_INTERVAL {
            return Err(ErrorReport::invalid_input(format!(
                "interval must be at least {FIRST_INTERVAL} day, got {interval_days}"
            )));
        }
        match (last_reviewed_at, next_review_at) {
            (None, None) => {}
            (Some(last), Some(next)) if next == last.plus_days(interval_days) => {}
            (Some(_), Some(_)) => {
                return Err(ErrorReport::invalid_input(format!(
                    "next review must be {interval_days} days after the last review"
                )));
            }
            _ => {
                return Err(ErrorReport::invalid_input(
                    "last and next review dates must both be present or both absent",
                ));
            }
        }
        Ok(Self {
            easiness_factor,
            interval_days,
            repetitions,
            last_reviewed_at,
            next_review_at,
        })
    }

    pub fn easiness_factor(&self) -> Easiness {
        self.easiness_factor
    }

    pub fn interval_days(&self) -> IntervalDays {
        self.interval_days
    }

    pub fn repetitions(&self) -> u32 {
        self.repetitions
    }

    pub fn last_reviewed_at(&self) -> Option<Timestamp> {
        self.last_reviewed_at
    }

    pub fn next_review_at(&self) -> Option<Timestamp> {
        self.next_review_at
    }

    /// Whether the card has never been rated.
    pub fn is_new(&self) -> bool {
        self.last_reviewed_at.is_none()
    }

    /// Whether the card should be reviewed at `now`. Cards without a next
    /// review date are always due.
    pub fn is_due(&self, now: Timestamp) -> bool {
        match self.next_review_at {
            None => true,
            Some(next) => next <= now,
        }
    }
}

impl Default for Performance {
    fn default() -> Self {
        Self {
            easiness_factor: INITIAL_EASINESS,
            interval_days: FIRST_INTERVAL,
            repetitions: 0,
            last_reviewed_at: None,
            next_review_at: None,
        }
    }
}

pub fn update_performance(
    perf: &Performance,
    quality: Quality,
    reviewed_at: Timestamp,
) -> Performance {
    let (interval_days, repetitions): (IntervalDays, u32) = if quality.is_success() {
        let interval = grown_interval(perf.repetitions, perf.interval_days, perf.easiness_factor);
        (interval, perf.repetitions.saturating_add(1))
    } else {
        (FIRST_INTERVAL, 0)
    };
    let easiness_factor: Easiness = new_easiness(perf.easiness_factor, quality);
    Performance {
        easiness_factor,
        interval_days,
        repetitions,
        last_reviewed_at: Some(reviewed_at),
        next_review_at: Some(reviewed_at.plus_days(interval_days)),
    }
}
