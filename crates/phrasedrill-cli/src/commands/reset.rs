//! The `phrasedrill reset` command.

use std::path::PathBuf;

use anyhow::Result;

use phrasedrill_core::config::load_config_from;
use phrasedrill_core::records::{reset, RecordStore};

pub fn execute(yes: bool, config: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config.as_deref())?;
    let store = RecordStore::new(&config.records);
    let records = store.load()?;

    if records.is_empty() {
        println!("No records in {}, nothing to reset.", store.path().display());
        return Ok(());
    }

    let prompt = format!(
        "Reset {} record(s) in {} to their initial state?",
        records.len(),
        store.path().display()
    );
    if !yes && !super::confirm(&prompt)? {
        println!("Aborted, records unchanged.");
        return Ok(());
    }

    store.persist(&reset(&records, config.initial_weight))?;
    println!("Reset {} record(s).", records.len());
    Ok(())
}
