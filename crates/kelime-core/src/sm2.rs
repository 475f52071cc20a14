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

//! The SM-2 scheduling rules.
//!
//! A review is rated with a quality from 0 (blackout) to 5 (perfect). Ratings
//! of 3 and above count as a successful recall: the interval grows from 1 day
//! to 6 days and then by the card's easiness factor. Anything lower resets the
//! card to a one day interval. The easiness factor is adjusted after every
//! review and never drops below 1.3.

use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::card::Card;
use crate::types::performance::Performance;
use crate::types::performance::update_performance;
use crate::types::timestamp::Timestamp;

pub type Easiness = f64;
pub type IntervalDays = u32;

pub const INITIAL_EASINESS: Easiness = 2.5;
pub const MIN_EASINESS: Easiness = 1.3;

/// Interval after the first successful review, and after any failure.
pub const FIRST_INTERVAL: IntervalDays = 1;

/// Interval after the second consecutive successful review.
pub const SECOND_INTERVAL: IntervalDays = 6;

/// A recall quality rating in `0..=5`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Fallible<Self> {
        if value > Self::MAX {
            return Err(ErrorReport::invalid_input(format!(
                "quality must be between 0 and {}, got {value}",
                Self::MAX
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Whether this rating counts as a successful recall.
    pub fn is_success(self) -> bool {
        self.0 >= 3
    }
}

impl TryFrom<u8> for Quality {
    type Error = ErrorReport;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Quality::new(value)
    }
}

impl TryFrom<i64> for Quality {
    type Error = ErrorReport;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let value = u8::try_from(value).map_err(|_| {
            ErrorReport::invalid_input(format!(
                "quality must be between 0 and {}, got {value}",
                Quality::MAX
            ))
        })?;
        Quality::new(value)
    }
}

/// Numbers from JavaScript. Only whole numbers in range are accepted.
impl TryFrom<f64> for Quality {
    type Error = ErrorReport;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(ErrorReport::invalid_input(format!(
                "quality must be a whole number, got {value}"
            )));
        }
        if !(0.0..=f64::from(Quality::MAX)).contains(&value) {
            return Err(ErrorReport::invalid_input(format!(
                "quality must be between 0 and {}, got {value}",
                Quality::MAX
            )));
        }
        Quality::try_from(value as i64)
    }
}

impl From<Quality> for u8 {
    fn from(q: Quality) -> u8 {
        q.0
    }
}

impl From<Quality> for f64 {
    fn from(q: Quality) -> f64 {
        f64::from(q.0)
    }
}

impl Display for Quality {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Accepts either a number or the name of a [`Grade`].
impl FromStr for Quality {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.parse::<i64>() {
            Ok(n) => Quality::try_from(n),
            Err(_) => Grade::from_str(s).map(Quality::from),
        }
    }
}

/// The four answer buttons shown after a card is revealed.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Grade {
    Again,
    Hard,
    Good,
    Easy,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::Again, Grade::Hard, Grade::Good, Grade::Easy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Again => "again",
            Grade::Hard => "hard",
            Grade::Good => "good",
            Grade::Easy => "easy",
        }
    }
}

impl From<Grade> for Quality {
    fn from(g: Grade) -> Quality {
        match g {
            Grade::Again => Quality(1),
            Grade::Hard => Quality(3),
            Grade::Good => Quality(4),
            Grade::Easy => Quality(5),
        }
    }
}

impl FromStr for Grade {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "again" => Ok(Grade::Again),
            "hard" => Ok(Grade::Hard),
            "good" => Ok(Grade::Good),
            "easy" => Ok(Grade::Easy),
            _ => Err(ErrorReport::invalid_input(format!("invalid grade: '{s}'"))),
        }
    }
}

impl TryFrom<String> for Grade {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Grade::from_str(&value)
    }
}

/// `E' = E + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))`, floored at 1.3.
pub fn new_easiness(e: Easiness, q: Quality) -> Easiness {
    let d = f64::from(Quality::MAX) - f64::from(q);
    f64::max(MIN_EASINESS, e + (0.1 - d * (0.08 + d * 0.02)))
}

/// The interval following a successful review. Uses the easiness factor from
/// before the review. The product is rounded half away from zero.
pub fn grown_interval(repetitions: u32, interval: IntervalDays, e: Easiness) -> IntervalDays {
    match repetitions {
        0 => FIRST_INTERVAL,
        1 => SECOND_INTERVAL,
        _ => {
            let product = (f64::from(interval) * e).round();
            // Float-to-int casts saturate, so absurd products pin to u32::MAX.
            (product as IntervalDays).max(FIRST_INTERVAL)
        }
    }
}

/// Compute the scheduling state that rating `card` with `quality` at `now`
/// would produce. Pure: the card is not modified.
pub fn schedule(card: &Card, quality: Quality, now: Timestamp) -> Performance {
    update_performance(card.performance(), quality, now)
}

/// The interval each answer button would give, in button order.
pub fn preview(performance: &Performance, now: Timestamp) -> [(Grade, IntervalDays); 4] {
    Grade::ALL.map(|g| {
        let next = update_performance(performance, g.into(), now);
        (g, next.interval_days())
    })
}
