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

//! kelime-core: Core library for the kelime flashcard system.
//!
//! This library provides WASM-compatible types and algorithms for:
//! - The SM-2 spaced repetition scheduler
//! - Cards, their persisted record format, and the card store
//! - Selecting due cards and running review sessions
//! - Capturing vocabulary from conversation replies

pub mod capture;
pub mod due;
pub mod error;
pub mod session;
pub mod sm2;
pub mod stats;
pub mod storage;
pub mod store;
pub mod types;

// Re-exports for convenience
pub use capture::{Reply, VocabularyItem, capture_phrase, capture_vocabulary};
pub use due::{SessionLimits, due_cards};
pub use error::{ErrorKind, ErrorReport, Fallible, fail};
pub use session::{RateOutcome, Session};
pub use sm2::{Grade, Quality, preview, schedule};
pub use stats::{Stats, collection_stats};
pub use storage::{DEFAULT_STORAGE_KEY, MemoryStorage, Storage};
pub use store::{CardStore, ImportSummary, parse_collection};
pub use types::card::{Card, CardContent, CardId, Category};
pub use types::performance::{Performance, update_performance};
pub use types::timestamp::Timestamp;
