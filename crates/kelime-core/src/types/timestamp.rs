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

use chrono::DateTime;
use chrono::SubsecRound;
use chrono::TimeDelta;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// A UTC instant with millisecond precision. Serialized as milliseconds since
/// the Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn new(dt: DateTime<Utc>) -> Self {
        Self(dt.trunc_subsecs(3))
    }

    pub fn from_millis(millis: i64) -> Fallible<Self> {
        DateTime::from_timestamp_millis(millis)
            .map(Self)
            .ok_or_else(|| ErrorReport::invalid_input(format!("timestamp out of range: {millis}")))
    }

    pub fn as_millis(self) -> i64 {
        self.0.timestamp_millis()
    }

    pub fn into_inner(self) -> DateTime<Utc> {
        self.0
    }

    /// The current time.
    #[cfg(feature = "clock")]
    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    /// This instant moved forward by a whole number of days. Saturates at the
    /// latest representable instant.
    pub fn plus_days(self, days: u32) -> Self {
        match self.0.checked_add_signed(TimeDelta::days(i64::from(days))) {
            Some(dt) => Self(dt),
            None => Self::new(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// This instant moved by a signed number of milliseconds.
    pub fn plus_millis(self, millis: i64) -> Self {
        match self.0.checked_add_signed(TimeDelta::milliseconds(millis)) {
            Some(dt) => Self(dt),
            None if millis < 0 => Self::new(DateTime::<Utc>::MIN_UTC),
            None => Self::new(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Whole days from `self` until `other`, rounded down. Negative if `other`
    /// is earlier.
    pub fn days_until(self, other: Timestamp) -> i64 {
        (other.as_millis() - self.as_millis()).div_euclid(MILLIS_PER_DAY)
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S%.3fZ"))
    }
}

impl TryFrom<i64> for Timestamp {
    type Error = ErrorReport;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Timestamp::from_millis(value)
    }
}

impl From<Timestamp> for i64 {
    fn from(ts: Timestamp) -> i64 {
        ts.as_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_to_string() -> Fallible<()> {
        let ts = Timestamp::from_millis(1_696_516_215_123)?;
        assert_eq!(ts.to_string(), "2023-10-05T14:30:15.123Z");
        Ok(())
    }

    #[test]
    fn test_new_truncates_to_millis() -> Fallible<()> {
        let dt = DateTime::from_timestamp(1_696_516_215, 123_456_789).unwrap();
        let ts = Timestamp::new(dt);
        assert_eq!(ts, Timestamp::from_millis(1_696_516_215_123)?);
        Ok(())
    }

    #[test]
    fn test_serialize() -> Fallible<()> {
        let ts = Timestamp::from_millis(1_696_516_215_123)?;
        assert_eq!(serde_json::to_string(&ts)?, "1696516215123");
        Ok(())
    }

    #[test]
    fn test_deserialize() -> Fallible<()> {
        let ts: Timestamp = serde_json::from_str("1696516215123")?;
        assert_eq!(ts.as_millis(), 1_696_516_215_123);
        Ok(())
    }

    #[test]
    fn test_out_of_range() {
        assert!(Timestamp::from_millis(i64::MAX).is_err());
    }

    #[test]
    fn test_plus_days() -> Fallible<()> {
        let ts = Timestamp::from_millis(0)?;
        assert_eq!(ts.plus_days(6).as_millis(), 6 * MILLIS_PER_DAY);
        assert_eq!(ts.days_until(ts.plus_days(6)), 6);
        assert_eq!(ts.plus_days(6).days_until(ts), -6);
        Ok(())
    }

    #[test]
    fn test_plus_days_saturates() -> Fallible<()> {
        let ts = Timestamp::from_millis(0)?;
        let far = ts.plus_days(u32::MAX);
        assert_eq!(far, Timestamp::new(DateTime::<Utc>::MAX_UTC));
        Ok(())
    }
}
