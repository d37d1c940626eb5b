//! The `phrasedrill stats` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use phrasedrill_core::config::load_config_from;
use phrasedrill_core::corpus::load_corpus;
use phrasedrill_core::records::{reconcile, RecordStore};
use phrasedrill_core::statistics::{hardest, summarize};

pub fn execute(top: usize, config: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config.as_deref())?;
    let corpus = load_corpus(&config.corpus, config.hint_chars)?;
    let store = RecordStore::new(&config.records);
    // Read-only view: unseen items show their seed record, nothing is written.
    let records = reconcile(corpus.ids(), store.load()?, config.initial_weight).records;

    let mut table = Table::new();
    table.set_header(vec!["Type", "Items", "Asked", "Correct", "Accuracy", "Mean weight"]);
    for summary in summarize(&corpus, &records) {
        table.add_row(vec![
            Cell::new(summary.question_type.label()),
            Cell::new(summary.items),
            Cell::new(summary.asked),
            Cell::new(summary.correct),
            Cell::new(format!("{:.1}%", summary.accuracy * 100.0)),
            Cell::new(format!("{:.2}", summary.mean_weight)),
        ]);
    }
    println!("{table}");

    let hard = hardest(&corpus, &records, top);
    if hard.is_empty() {
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Id", "Type", "Item", "Asked", "Correct", "Weight"]);
    for item in hard {
        table.add_row(vec![
            Cell::new(&item.id),
            Cell::new(item.question_type.label()),
            Cell::new(&item.summary),
            Cell::new(item.record.asked),
            Cell::new(item.record.correct),
            Cell::new(format!("{:.2}", item.record.weight)),
        ]);
    }
    println!("\nHardest {top} item(s):\n{table}");

    Ok(())
}
