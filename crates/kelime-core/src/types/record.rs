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

//! The persisted shape of a card. The whole collection is stored as a JSON
//! array of these records under a single key.

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::types::card::Card;
use crate::types::card::CardContent;
use crate::types::card::CardId;
use crate::types::card::Category;
use crate::types::performance::Performance;
use crate::types::timestamp::Timestamp;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    pub id: String,
    pub turkish: String,
    pub english: String,
    #[serde(default)]
    pub example_usage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub category: Category,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review_date: Option<Timestamp>,
    pub easiness_factor: f64,
    pub interval: u32,
    pub repetitions: u32,
}

impl TryFrom<CardRecord> for Card {
    type Error = ErrorReport;

    fn try_from(record: CardRecord) -> Result<Self, Self::Error> {
        let content = CardContent {
            turkish: record.turkish,
            english: record.english,
            example_usage: record.example_usage,
            notes: record.notes,
        };
        content
            .validate()
            .map_err(|e| ErrorReport::invalid_input(format!("card {}: {}", record.id, e.message())))?;
        let performance = Performance::from_parts(
            record.easiness_factor,
            record.interval,
            record.repetitions,
            record.last_reviewed,
            record.next_review_date,
        )
        .map_err(|e| ErrorReport::invalid_input(format!("card {}: {}", record.id, e.message())))?;
        Ok(Card::from_parts(
            CardId::new(record.id),
            content,
            record.category,
            record.created_at,
            performance,
        ))
    }
}

impl From<Card> for CardRecord {
    fn from(card: Card) -> CardRecord {
        let performance = *card.performance();
        let category = card.category();
        let created_at = card.created_at();
        let id = card.id().to_string();
        let CardContent {
            turkish,
            english,
            example_usage,
            notes,
        } = card.content().clone();
        CardRecord {
            id,
            turkish,
            english,
            example_usage,
            notes,
            category,
            created_at,
            last_reviewed: performance.last_reviewed_at(),
            next_review_date: performance.next_review_at(),
            easiness_factor: performance.easiness_factor(),
            interval: performance.interval_days(),
            repetitions: performance.repetitions(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::error::Fallible;
    use crate::sm2::Quality;
    use crate::types::performance::update_performance;

    fn new_card() -> Fallible<Card> {
        Card::new(
            CardId::new("1700000000000"),
            CardContent::new("kedi", "cat").with_example("Kedi uyuyor."),
            Category::Vocabulary,
            Timestamp::from_millis(1_700_000_000_000)?,
        )
    }

    /// A never-reviewed card omits the optional fields.
    #[test]
    fn test_serialize_new_card() -> Fallible<()> {
        let json = serde_json::to_string(&new_card()?)?;
        assert_eq!(
            json,
            "{\"id\":\"1700000000000\",\"turkish\":\"kedi\",\"english\":\"cat\",\
             \"exampleUsage\":\"Kedi uyuyor.\",\"category\":\"vocabulary\",\
             \"createdAt\":1700000000000,\"easinessFactor\":2.5,\"interval\":1,\
             \"repetitions\":0}"
        );
        Ok(())
    }

    #[test]
    fn test_deserialize_reviewed_card() -> Fallible<()> {
        let json = r#"{
            "id": "a",
            "turkish": "su",
            "english": "water",
            "exampleUsage": "",
            "notes": "also 'juice' in meyve suyu",
            "category": "vocabulary",
            "createdAt": 1700000000000,
            "lastReviewed": 1700086400000,
            "nextReviewDate": 1700604800000,
            "easinessFactor": 2.6,
            "interval": 6,
            "repetitions": 2
        }"#;
        let card: Card = serde_json::from_str(json)?;
        assert_eq!(card.id().as_str(), "a");
        assert_eq!(card.content().notes.as_deref(), Some("also 'juice' in meyve suyu"));
        assert_eq!(card.performance().interval_days(), 6);
        assert_eq!(card.performance().repetitions(), 2);
        assert_eq!(
            card.performance().next_review_at(),
            Some(Timestamp::from_millis(1_700_604_800_000)?)
        );
        Ok(())
    }

    /// Fields written by older clients as `null` or left out still load.
    #[test]
    fn test_deserialize_nulls_and_missing_example() -> Fallible<()> {
        let json = r#"{"id":"b","turkish":"ev","english":"house","notes":null,
            "category":"grammar","createdAt":0,"lastReviewed":null,
            "nextReviewDate":null,"easinessFactor":2.5,"interval":1,"repetitions":0}"#;
        let card: Card = serde_json::from_str(json)?;
        assert_eq!(card.content().example_usage, "");
        assert_eq!(card.content().notes, None);
        assert!(card.performance().is_new());
        Ok(())
    }

    #[test]
    fn test_reviewed_card_roundtrips() -> Fallible<()> {
        let mut card = new_card()?;
        let now = Timestamp::from_millis(1_700_100_000_000)?;
        card.set_performance(update_performance(card.performance(), Quality::new(5)?, now));
        let json = serde_json::to_string(&card)?;
        let recovered: Card = serde_json::from_str(&json)?;
        assert_eq!(recovered, card);
        Ok(())
    }

    #[test]
    fn test_reject_invalid_records() {
        let below_floor = r#"{"id":"c","turkish":"ev","english":"house","category":"phrase",
            "createdAt":0,"easinessFactor":1.1,"interval":1,"repetitions":0}"#;
        let zero_interval = r#"{"id":"c","turkish":"ev","english":"house","category":"phrase",
            "createdAt":0,"easinessFactor":2.5,"interval":0,"repetitions":0}"#;
        let unknown_category = r#"{"id":"c","turkish":"ev","english":"house","category":"slang",
            "createdAt":0,"easinessFactor":2.5,"interval":1,"repetitions":0}"#;
        let empty_side = r#"{"id":"c","turkish":"","english":"house","category":"phrase",
            "createdAt":0,"easinessFactor":2.5,"interval":1,"repetitions":0}"#;
        let next_without_last = r#"{"id":"c","turkish":"ev","english":"house","category":"phrase",
            "createdAt":0,"nextReviewDate":9999999999999,"easinessFactor":2.5,"interval":1,
            "repetitions":0}"#;
        let next_off_schedule = r#"{"id":"c","turkish":"ev","english":"house","category":"phrase",
            "createdAt":0,"lastReviewed":0,"nextReviewDate":86400001,"easinessFactor":2.5,
            "interval":1,"repetitions":1}"#;
        for json in [
            below_floor,
            zero_interval,
            unknown_category,
            empty_side,
            next_without_last,
            next_off_schedule,
        ] {
            let err: ErrorReport = serde_json::from_str::<Card>(json).unwrap_err().into();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
    }
}
