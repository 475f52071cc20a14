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

//! Interactive review in the terminal.
//!
//! Each card shows its Turkish side. Enter reveals the answer, then `1`-`4`
//! (or `again`, `hard`, `good`, `easy`) rates it. `q` ends the session early.

use std::io::BufRead;
use std::io::Write;

use crate::error::ErrorKind;
use crate::error::Fallible;
use crate::types::timestamp::Timestamp;
use kelime_core::Card;
use kelime_core::CardStore;
use kelime_core::Grade;
use kelime_core::Quality;
use kelime_core::RateOutcome;
use kelime_core::Session;
use kelime_core::SessionLimits;
use kelime_core::Storage;
use kelime_core::preview;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DrillSummary {
    pub reviewed: usize,
    /// Cards left unreviewed because the session was quit.
    pub skipped: usize,
}

enum Input {
    Quit,
    Line(String),
}

fn read_input(input: &mut impl BufRead) -> Fallible<Input> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(Input::Quit);
    }
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return Ok(Input::Quit);
    }
    Ok(Input::Line(line.to_string()))
}

/// Button numbers map to the four grades; names are accepted too.
fn parse_answer(answer: &str) -> Option<Quality> {
    if let Ok(n) = answer.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| Grade::ALL.get(i))
            .map(|g| Quality::from(*g));
    }
    answer.parse::<Grade>().ok().map(Quality::from)
}

fn show_answer(card: &Card, now: Timestamp, out: &mut impl Write) -> Fallible<()> {
    let content = card.content();
    writeln!(out, "  {}", content.english)?;
    if !content.example_usage.trim().is_empty() {
        writeln!(out, "  e.g. {}", content.example_usage)?;
    }
    if let Some(notes) = &content.notes {
        writeln!(out, "  ({notes})")?;
    }
    let buttons: Vec<String> = preview(card.performance(), now)
        .iter()
        .enumerate()
        .map(|(i, (grade, days))| format!("{}) {} {}d", i + 1, grade.as_str(), days))
        .collect();
    writeln!(out, "{}", buttons.join("   "))?;
    Ok(())
}

/// Write a rating that failed to save, until it succeeds or the user quits.
/// Returns `None` on quit.
fn retry_until_saved<S: Storage>(
    session: &mut Session,
    store: &mut CardStore<S>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Fallible<Option<RateOutcome>> {
    loop {
        writeln!(out, "Press Enter to try saving again, or q to quit.")?;
        if let Input::Quit = read_input(input)? {
            return Ok(None);
        }
        match session.retry(store) {
            Ok(outcome) => return Ok(Some(outcome)),
            Err(e) if e.kind() == ErrorKind::PersistenceFailure => {
                writeln!(out, "Could not save the rating: {}", e.message())?;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Run one review session over the cards due at the time it starts.
pub fn drill<S: Storage>(
    store: &mut CardStore<S>,
    limits: &SessionLimits,
    clock: impl Fn() -> Timestamp,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Fallible<DrillSummary> {
    let mut session = Session::new();
    let total = session.start(store, clock(), limits)?;
    if total == 0 {
        writeln!(out, "No cards due.")?;
        return Ok(DrillSummary::default());
    }
    loop {
        let Some(card) = session.current().cloned() else {
            break;
        };
        let (reviewed, total) = session.progress();
        writeln!(out)?;
        writeln!(out, "[{}/{}] {}", reviewed + 1, total, card.content().turkish)?;
        writeln!(out, "Press Enter to reveal, or q to quit.")?;
        if let Input::Quit = read_input(input)? {
            break;
        }
        session.toggle_reveal()?;
        show_answer(&card, clock(), out)?;

        let quality = loop {
            match read_input(input)? {
                Input::Quit => break None,
                Input::Line(answer) => match parse_answer(&answer) {
                    Some(quality) => break Some(quality),
                    None => writeln!(out, "Answer with 1-4, or q to quit.")?,
                },
            }
        };
        let Some(quality) = quality else {
            break;
        };
        let outcome = match session.rate(store, quality, clock()) {
            Ok(outcome) => Some(outcome),
            Err(e) if e.kind() == ErrorKind::PersistenceFailure => {
                log::warn!("Failed to save rating for {}: {}", card.id(), e.message());
                writeln!(out, "Could not save the rating: {}", e.message())?;
                retry_until_saved(&mut session, store, input, out)?
            }
            Err(e) => return Err(e),
        };
        match outcome {
            Some(RateOutcome::Next) => continue,
            Some(RateOutcome::Completed { reviewed }) => {
                writeln!(out)?;
                writeln!(out, "Session complete: {reviewed} cards reviewed.")?;
                return Ok(DrillSummary {
                    reviewed,
                    skipped: 0,
                });
            }
            None => break,
        }
    }
    let (reviewed, _) = session.progress();
    let skipped = session.abort(store);
    writeln!(out)?;
    writeln!(
        out,
        "Session ended: {reviewed} reviewed, {skipped} left for next time."
    )?;
    Ok(DrillSummary { reviewed, skipped })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use kelime_core::CardContent;
    use kelime_core::Category;
    use kelime_core::DEFAULT_STORAGE_KEY;
    use kelime_core::MemoryStorage;
    use kelime_core::parse_collection;

    const T: i64 = 1_704_067_200_000;

    fn clock() -> Timestamp {
        Timestamp::from_millis(T).unwrap()
    }

    fn store_with(words: &[(&str, &str)]) -> Fallible<CardStore<MemoryStorage>> {
        let mut store = CardStore::open(MemoryStorage::new())?;
        for (turkish, english) in words {
            store.add(CardContent::new(*turkish, *english), Category::Vocabulary, clock())?;
        }
        Ok(store)
    }

    fn run(
        store: &mut CardStore<MemoryStorage>,
        keys: &str,
    ) -> Fallible<(DrillSummary, String)> {
        let mut input = Cursor::new(keys.as_bytes().to_vec());
        let mut out = Vec::new();
        let summary = drill(store, &SessionLimits::default(), clock, &mut input, &mut out)?;
        Ok((summary, String::from_utf8_lossy(&out).into_owned()))
    }

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("1").map(Quality::value), Some(1));
        assert_eq!(parse_answer("2").map(Quality::value), Some(3));
        assert_eq!(parse_answer("4").map(Quality::value), Some(5));
        assert_eq!(parse_answer("Good").map(Quality::value), Some(4));
        assert_eq!(parse_answer("0"), None);
        assert_eq!(parse_answer("5"), None);
        assert_eq!(parse_answer("sure"), None);
    }

    #[test]
    fn test_no_cards_due() -> Fallible<()> {
        let mut store = store_with(&[])?;
        let (summary, text) = run(&mut store, "")?;
        assert_eq!(summary, DrillSummary::default());
        assert_eq!(text, "No cards due.\n");
        Ok(())
    }

    #[test]
    fn test_full_session() -> Fallible<()> {
        let mut store = store_with(&[("elma", "apple"), ("armut", "pear")])?;
        let (summary, text) = run(&mut store, "\n4\n\nagain\n")?;
        assert_eq!(
            summary,
            DrillSummary {
                reviewed: 2,
                skipped: 0
            }
        );
        assert!(text.contains("[1/2] elma"));
        assert!(text.contains("  apple"));
        assert!(text.contains("1) again 1d   2) hard 1d   3) good 1d   4) easy 1d"));
        assert!(text.contains("Session complete: 2 cards reviewed."));

        let cards = store.list();
        assert_eq!(cards[0].performance().repetitions(), 1);
        assert!((cards[0].performance().easiness_factor() - 2.6).abs() < 1e-9);
        assert_eq!(cards[1].performance().repetitions(), 0);
        Ok(())
    }

    #[test]
    fn test_invalid_answer_is_asked_again() -> Fallible<()> {
        let mut store = store_with(&[("elma", "apple")])?;
        let (summary, text) = run(&mut store, "\n9\n3\n")?;
        assert_eq!(summary.reviewed, 1);
        assert!(text.contains("Answer with 1-4, or q to quit."));
        Ok(())
    }

    #[test]
    fn test_quit_leaves_cards_due() -> Fallible<()> {
        let mut store = store_with(&[("elma", "apple"), ("armut", "pear"), ("üzüm", "grape")])?;
        let (summary, _) = run(&mut store, "\n3\nq\n")?;
        assert_eq!(
            summary,
            DrillSummary {
                reviewed: 1,
                skipped: 2
            }
        );
        assert!(store.list()[1].performance().is_new());
        Ok(())
    }

    #[test]
    fn test_end_of_input_quits() -> Fallible<()> {
        let mut store = store_with(&[("elma", "apple")])?;
        let (summary, _) = run(&mut store, "\n")?;
        assert_eq!(
            summary,
            DrillSummary {
                reviewed: 0,
                skipped: 1
            }
        );
        Ok(())
    }

    #[test]
    fn test_failed_save_then_quit() -> Fallible<()> {
        let mut store = store_with(&[("elma", "apple")])?;
        store.storage_mut().set_fail_writes(true);
        // Enter retries once, then input runs out at the prompt.
        let (summary, text) = run(&mut store, "\n4\n\n")?;
        assert_eq!(
            summary,
            DrillSummary {
                reviewed: 0,
                skipped: 1
            }
        );
        assert_eq!(text.matches("Could not save the rating").count(), 2);
        let saved = store.storage().get(DEFAULT_STORAGE_KEY)?.unwrap();
        assert!(parse_collection(&saved)?[0].performance().is_new());
        // The unsaved rating is undone, so the card comes back next time.
        assert!(store.list()[0].performance().is_new());
        store.storage_mut().set_fail_writes(false);
        let (summary, _) = run(&mut store, "\n4\n")?;
        assert_eq!(summary.reviewed, 1);
        Ok(())
    }

    #[test]
    fn test_retry_after_storage_recovers() -> Fallible<()> {
        let mut store = store_with(&[("elma", "apple")])?;
        let mut session = Session::new();
        session.start(&store, clock(), &SessionLimits::default())?;
        session.toggle_reveal()?;
        store.storage_mut().set_fail_writes(true);
        assert!(session.rate(&mut store, Quality::new(5)?, clock()).is_err());

        store.storage_mut().set_fail_writes(false);
        let mut input = Cursor::new(b"\n".to_vec());
        let outcome = retry_until_saved(&mut session, &mut store, &mut input, &mut Vec::new())?;
        assert_eq!(outcome, Some(RateOutcome::Completed { reviewed: 1 }));
        let saved = store.storage().get(DEFAULT_STORAGE_KEY)?.unwrap();
        assert_eq!(parse_collection(&saved)?[0].performance().repetitions(), 1);
        Ok(())
    }
}
