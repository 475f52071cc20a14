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

use std::io::stdin;
use std::io::stdout;
use std::path::PathBuf;

use clap::Parser;

use crate::cmd::capture::capture_reply;
use crate::cmd::cards::ContentEdit;
use crate::cmd::cards::NewCard;
use crate::cmd::cards::add_card;
use crate::cmd::cards::edit_card;
use crate::cmd::cards::list_cards;
use crate::cmd::cards::remove_card;
use crate::cmd::drill::drill;
use crate::cmd::export::export_collection;
use crate::cmd::export::import_collection;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_stats;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::timestamp::Timestamp;
use kelime_core::CardId;
use kelime_core::Category;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Add a card and print its id.
    Add {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// The Turkish side of the card.
        #[arg(long)]
        turkish: String,
        /// The English side of the card.
        #[arg(long)]
        english: String,
        /// A sentence using the word.
        #[arg(long)]
        example: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long, default_value_t = Category::Vocabulary)]
        category: Category,
    },
    /// Change the content of a card. Its schedule is kept.
    Edit {
        /// The id of the card.
        id: String,
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        #[arg(long)]
        turkish: Option<String>,
        #[arg(long)]
        english: Option<String>,
        #[arg(long)]
        example: Option<String>,
        /// New notes. An empty value removes them.
        #[arg(long)]
        notes: Option<String>,
    },
    /// Remove a card.
    Remove {
        /// The id of the card.
        id: String,
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// List the cards in a collection.
    List {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Only list cards that are due now.
        #[arg(long)]
        due: bool,
    },
    /// Review the cards that are due, in the terminal.
    Drill {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Maximum number of cards to drill in a session. By default, all cards due now are drilled.
        #[arg(long)]
        card_limit: Option<usize>,
        /// Maximum number of new cards to drill in a session.
        #[arg(long)]
        new_card_limit: Option<usize>,
    },
    /// Print collection statistics.
    Stats {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Which output format to use.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },
    /// Export a collection.
    Export {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Optional path to the output file. By default, the output is printed to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Merge cards from an export file into a collection.
    Import {
        /// Path to the export file.
        file: PathBuf,
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// Add cards from a conversation reply saved as JSON.
    Capture {
        /// Path to the reply file.
        file: PathBuf,
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Add the whole reply as one phrase card instead of its vocabulary.
        #[arg(long)]
        phrase: bool,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    let mut out = stdout().lock();
    match cli {
        Command::Add {
            directory,
            turkish,
            english,
            example,
            notes,
            category,
        } => {
            let mut collection = Collection::new(directory)?;
            let new_card = NewCard {
                turkish,
                english,
                example,
                notes,
                category,
            };
            add_card(&mut collection.store, new_card, Timestamp::now(), &mut out)?;
            Ok(())
        }
        Command::Edit {
            id,
            directory,
            turkish,
            english,
            example,
            notes,
        } => {
            let mut collection = Collection::new(directory)?;
            let edit = ContentEdit {
                turkish,
                english,
                example,
                notes,
            };
            edit_card(&mut collection.store, &CardId::new(id), edit, &mut out)?;
            Ok(())
        }
        Command::Remove { id, directory } => {
            let mut collection = Collection::new(directory)?;
            remove_card(&mut collection.store, &CardId::new(id), &mut out)?;
            Ok(())
        }
        Command::List { directory, due } => {
            let collection = Collection::new(directory)?;
            list_cards(&collection.store, due, Timestamp::now(), &mut out)?;
            Ok(())
        }
        Command::Drill {
            directory,
            card_limit,
            new_card_limit,
        } => {
            let mut collection = Collection::new(directory)?;
            let limits = collection.config.limits(card_limit, new_card_limit);
            let mut input = stdin().lock();
            drill(
                &mut collection.store,
                &limits,
                Timestamp::now,
                &mut input,
                &mut out,
            )?;
            Ok(())
        }
        Command::Stats { directory, format } => {
            let collection = Collection::new(directory)?;
            print_stats(&collection.store, format, Timestamp::now(), &mut out)
        }
        Command::Export { directory, output } => {
            let collection = Collection::new(directory)?;
            export_collection(&collection.store, output.as_deref(), &mut out)
        }
        Command::Import { file, directory } => {
            let mut collection = Collection::new(directory)?;
            import_collection(&mut collection.store, &file, &mut out)?;
            Ok(())
        }
        Command::Capture {
            file,
            directory,
            phrase,
        } => {
            let mut collection = Collection::new(directory)?;
            capture_reply(
                &mut collection.store,
                &file,
                phrase,
                Timestamp::now(),
                &mut out,
            )?;
            Ok(())
        }
    }
}
