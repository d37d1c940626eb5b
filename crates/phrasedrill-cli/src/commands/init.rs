//! The `phrasedrill init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("phrasedrill.toml"), SAMPLE_CONFIG)?;
    write_if_missing(Path::new("material.json"), SAMPLE_MATERIAL)?;

    println!("\nNext steps:");
    println!("  1. Add your own material to material.json");
    println!("  2. Run: phrasedrill validate");
    println!("  3. Run: phrasedrill drill --count 5");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# phrasedrill configuration

corpus = "material.json"
records = "records.json"
questions = 10
initial_weight = 2.0
hint_chars = 3
word_field_threshold = 1.0
review = false
enabled_types = [
    "vocabulary",
    "fill_in_gap",
    "expression",
    "phrasal_verb",
    "word_field",
    "idiom",
    "multiple_choice",
    "pronunciation",
]
# report_dir = "phrasedrill-reports"
"#;

const SAMPLE_MATERIAL: &str = r#"{
  "vocabulary": {
    "voc-ubiquitous": ["ubiquitous", ["omnipresente", "ubicuo"]],
    "voc-thorough": ["thorough", ["minucioso", "exhaustivo"]]
  },
  "fill_in_gap": {
    "fill-account": ["She took his age into ___.", "account"]
  },
  "expression": {
    "exp-ballpark": ["That figure is in the right ballpark.", "Esa cifra es aproximadamente correcta."]
  },
  "phrasal_verb": {
    "pv-put-off": [["put", "off"], ["posponer", "aplazar"], true, "We had to ___ the meeting until Friday."]
  },
  "word_field": {
    "wf-happy": ["happy", ["joyful", "glad", "cheerful", "content"]]
  },
  "idiom": {
    "idm-ice": ["break the ice", "to start a conversation in an awkward situation"]
  },
  "multiple_choice": {
    "mc-affect": ["The weather will ___ our plans.", ["affect", "effect", "infect"]]
  },
  "pronunciation": {
    "pr-colonel": ["colonel", "The colonel inspected the troops.", ["KER-nul", "KOL-o-nel", "ko-LO-nel"]]
  }
}
"#;
