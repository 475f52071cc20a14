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
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::performance::Performance;
use crate::types::record::CardRecord;
use crate::types::timestamp::Timestamp;

/// Opaque, stable card identifier.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    /// A fresh random identifier. Random UUIDs are never handed out twice, so
    /// ids stay unique even after cards are deleted.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CardId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CardId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Vocabulary,
    Grammar,
    Phrase,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Vocabulary, Category::Grammar, Category::Phrase];

    pub fn as_str(&self) -> &str {
        match self {
            Category::Vocabulary => "vocabulary",
            Category::Grammar => "grammar",
            Category::Phrase => "phrase",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vocabulary" => Ok(Category::Vocabulary),
            "grammar" => Ok(Category::Grammar),
            "phrase" => Ok(Category::Phrase),
            _ => Err(ErrorReport::invalid_input(format!("invalid category: '{s}'"))),
        }
    }
}

/// The learnable part of a card: a Turkish prompt and its English meaning.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CardContent {
    pub turkish: String,
    pub english: String,
    /// A sentence using the word. Empty when there is none.
    pub example_usage: String,
    pub notes: Option<String>,
}

impl CardContent {
    pub fn new(turkish: impl Into<String>, english: impl Into<String>) -> Self {
        Self {
            turkish: turkish.into(),
            english: english.into(),
            example_usage: String::new(),
            notes: None,
        }
    }

    pub fn with_example(mut self, example_usage: impl Into<String>) -> Self {
        self.example_usage = example_usage.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Check that both sides of the card are present.
    pub fn validate(&self) -> Fallible<()> {
        if self.turkish.trim().is_empty() {
            return Err(ErrorReport::invalid_input("card is missing its Turkish text"));
        }
        if self.english.trim().is_empty() {
            return Err(ErrorReport::invalid_input("card is missing its English text"));
        }
        Ok(())
    }
}

/// A flashcard: content plus its scheduling state.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(try_from = "CardRecord", into = "CardRecord")]
pub struct Card {
    id: CardId,
    content: CardContent,
    category: Category,
    created_at: Timestamp,
    performance: Performance,
}

impl Card {
    /// A card that has never been reviewed.
    pub fn new(
        id: CardId,
        content: CardContent,
        category: Category,
        created_at: Timestamp,
    ) -> Fallible<Self> {
        content.validate()?;
        Ok(Self {
            id,
            content,
            category,
            created_at,
            performance: Performance::default(),
        })
    }

    pub(crate) fn from_parts(
        id: CardId,
        content: CardContent,
        category: Category,
        created_at: Timestamp,
        performance: Performance,
    ) -> Self {
        Self {
            id,
            content,
            category,
            created_at,
            performance,
        }
    }

    pub fn id(&self) -> &CardId {
        &self.id
    }

    pub fn content(&self) -> &CardContent {
        &self.content
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn performance(&self) -> &Performance {
        &self.performance
    }

    pub fn is_due(&self, now: Timestamp) -> bool {
        self.performance.is_due(now)
    }

    /// Replace the scheduling state in one step.
    pub(crate) fn set_performance(&mut self, performance: Performance) {
        self.performance = performance;
    }

    pub(crate) fn set_content(&mut self, content: CardContent) -> Fallible<()> {
        content.validate()?;
        self.content = content;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn created_at() -> Timestamp {
        Timestamp::from_millis(1_700_000_000_000).unwrap()
    }

    #[test]
    fn test_new_card_has_default_performance() -> Fallible<()> {
        let card = Card::new(
            CardId::new("1"),
            CardContent::new("merhaba", "hello"),
            Category::Vocabulary,
            created_at(),
        )?;
        assert_eq!(card.performance(), &Performance::default());
        assert!(card.is_due(created_at()));
        Ok(())
    }

    #[test]
    fn test_missing_content_is_rejected() {
        for (tr, en) in [("", "hello"), ("merhaba", "  "), ("", "")] {
            let err = Card::new(
                CardId::new("1"),
                CardContent::new(tr, en),
                Category::Vocabulary,
                created_at(),
            )
            .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(CardId::generate(), CardId::generate());
    }

    #[test]
    fn test_category_parse() -> Fallible<()> {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>()?, category);
        }
        assert_eq!("Phrase".parse::<Category>()?, Category::Phrase);
        assert!("idiom".parse::<Category>().is_err());
        Ok(())
    }

    #[test]
    fn test_category_serialization_format() -> Fallible<()> {
        assert_eq!(serde_json::to_string(&Category::Grammar)?, "\"grammar\"");
        Ok(())
    }
}
