//! The `phrasedrill backup` command.

use std::path::PathBuf;

use anyhow::Result;

use phrasedrill_core::config::load_config_from;
use phrasedrill_core::records::RecordStore;

pub fn execute(to: PathBuf, yes: bool, config: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config.as_deref())?;
    let store = RecordStore::new(&config.records);

    if to.exists() && !yes {
        let prompt = format!("{} already exists. Overwrite it?", to.display());
        if !super::confirm(&prompt)? {
            println!("Aborted, nothing written.");
            return Ok(());
        }
    }

    store.backup(&to)?;
    println!("Backed up {} to {}", store.path().display(), to.display());
    Ok(())
}
