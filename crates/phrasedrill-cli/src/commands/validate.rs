//! The `phrasedrill validate` command.

use std::path::PathBuf;

use anyhow::Result;

use phrasedrill_core::config::load_config_from;
use phrasedrill_core::corpus::{load_corpus, positional_id_warning, validate_corpus};
use phrasedrill_core::model::QuestionType;
use phrasedrill_core::records::{orphans, RecordStore};

pub fn execute(config: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config.as_deref())?;
    let corpus = load_corpus(&config.corpus, config.hint_chars)?;

    println!(
        "Corpus: {} ({} items)",
        config.corpus.display(),
        corpus.len()
    );
    for ty in QuestionType::ALL {
        let count = corpus.count(ty);
        if count > 0 {
            println!("  {:<16} {count}", ty.label());
        }
    }

    let store = RecordStore::new(&config.records);
    let records = store.load()?;

    let mut warnings = validate_corpus(&corpus);
    warnings.extend(positional_id_warning(&corpus, !records.is_empty()));
    for w in &warnings {
        let prefix = w
            .item_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    let missing = corpus.ids().filter(|id| !records.contains_key(*id)).count();
    let orphaned = orphans(corpus.ids(), &records);
    println!(
        "Records: {} ({} entries)",
        store.path().display(),
        records.len()
    );
    if missing > 0 {
        println!("  {missing} item(s) without a record yet, seeded on the next drill.");
    }
    if !orphaned.is_empty() {
        println!(
            "  {} record(s) for items no longer in the corpus: {}",
            orphaned.len(),
            orphaned.join(", ")
        );
    }

    if warnings.is_empty() {
        println!("Corpus valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
