//! The `phrasedrill drill` command.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use phrasedrill_core::config::{load_config_from, DrillConfig};
use phrasedrill_core::corpus::{load_corpus, Corpus};
use phrasedrill_core::error::DrillError;
use phrasedrill_core::model::QuestionType;
use phrasedrill_core::records::{RecordStore, Records};
use phrasedrill_core::report::SessionReport;
use phrasedrill_core::session::{
    review, sync_records, verdict, CasualFlag, CommitStatus, DrillContext, DrillSession,
    SessionPlan,
};
use phrasedrill_core::traits::AnswerSource;

use crate::console::ConsoleAnswers;

/// Flags of one `drill` invocation. `None` keeps the configured value.
#[derive(Debug, Default)]
pub struct DrillArgs {
    pub count: Option<usize>,
    pub types: Option<String>,
    pub interactive: bool,
    pub casual: bool,
    pub review: bool,
    pub report_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub async fn execute(args: DrillArgs) -> Result<()> {
    let mut config = load_config_from(args.config.as_deref())?;
    if let Some(count) = args.count {
        config.questions = count;
    }
    if let Some(types) = &args.types {
        config.enabled_types = parse_types(types)?;
    }
    if args.review {
        config.review = true;
    }
    if args.report_dir.is_some() {
        config.report_dir = args.report_dir;
    }

    let corpus = load_corpus(&config.corpus, config.hint_chars)?;
    for rejected in corpus.rejected() {
        eprintln!(
            "  [{}] skipped ({}): {}",
            rejected.id, rejected.question_type, rejected.reason
        );
    }

    let store = RecordStore::new(&config.records);
    let records = sync_records(&corpus, &store, config.initial_weight)?;

    let casual = CasualFlag::new(args.casual);
    if args.casual {
        eprintln!("Casual mode on: records will not be updated. Press Ctrl-C to toggle.");
    }
    let toggler = {
        let casual = casual.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                let state = if casual.toggle() { "on" } else { "off" };
                eprintln!("\n[casual mode {state}]");
            }
        })
    };

    let interactive = args.interactive;
    let session = tokio::task::spawn_blocking(move || {
        run_session(&config, &corpus, &records, &store, casual, interactive)
    });
    let result = session.await.context("drill session panicked")?;
    toggler.abort();
    result
}

fn run_session(
    config: &DrillConfig,
    corpus: &Corpus,
    records: &Records,
    store: &RecordStore,
    casual: CasualFlag,
    interactive: bool,
) -> Result<()> {
    let stdin = std::io::stdin();
    let mut answers = ConsoleAnswers::new(stdin.lock(), std::io::stdout());

    let mut plan = SessionPlan::from_config(config);
    if interactive {
        plan = ask_plan(&mut answers, plan)?;
    }

    let context = DrillContext::from_config(config, casual);
    let session = DrillSession::new(corpus, &context);
    let mut report = match session.run(records, &plan, &mut answers, &mut rand::rng()) {
        Ok(report) => report,
        Err(DrillError::InputClosed) => {
            anyhow::bail!("input closed before the session finished, records left untouched")
        }
        Err(e) => return Err(e.into()),
    };

    println!();
    println!("{}. {}", report.score_line(), verdict(report.grade));

    if config.review && report.asked() > 0 {
        review(&mut answers, &report)?;
    }

    match session.commit(&mut report, records, store) {
        CommitStatus::Saved => {
            eprintln!("Records updated: {}", store.path().display());
        }
        CommitStatus::Casual => {
            eprintln!("Casual mode: records left untouched.");
        }
        CommitStatus::Failed(e) => {
            eprintln!("WARNING: score stands but records were not saved: {e}");
        }
    }

    print_summary(&report);

    if let Some(dir) = &config.report_dir {
        let path = dir.join(report.file_name());
        report.save_json(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    Ok(())
}

/// Parse a comma-separated list of question types.
fn parse_types(list: &str) -> Result<Vec<QuestionType>> {
    let types: BTreeSet<QuestionType> = list
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<QuestionType>().map_err(anyhow::Error::msg))
        .collect::<Result<_>>()?;
    if types.is_empty() {
        anyhow::bail!("--types needs at least one question type");
    }
    Ok(types.into_iter().collect())
}

/// Ask for the question count and a yes/no per type. Empty input keeps
/// the current value.
fn ask_plan(answers: &mut dyn AnswerSource, mut plan: SessionPlan) -> Result<SessionPlan> {
    loop {
        let line = answers.ask(&format!("Number of questions [{}]:", plan.count))?;
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        match line.parse() {
            Ok(count) => {
                plan.count = count;
                break;
            }
            Err(_) => answers.feedback("Please enter a whole number."),
        }
    }

    for ty in QuestionType::ALL {
        let current = if plan.enabled.contains(&ty) { "yes" } else { "no" };
        loop {
            let line = answers.ask(&format!("{}? (yes, no) [{current}]:", ty.label()))?;
            match line.trim().to_lowercase().as_str() {
                "" => break,
                "yes" | "y" => {
                    plan.enabled.insert(ty);
                    break;
                }
                "no" | "n" => {
                    plan.enabled.remove(&ty);
                    break;
                }
                _ => {}
            }
        }
    }

    Ok(plan)
}

fn print_summary(report: &SessionReport) {
    if report.entries.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Type", "Item", "Outcome"]);
    for (i, entry) in report.entries.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(entry.question_type.label()),
            Cell::new(&entry.summary),
            Cell::new(format!("{:?}", entry.outcome)),
        ]);
    }

    eprintln!("\n{table}");
}

#[cfg(test)]
mod tests {
    use phrasedrill_core::mock::ScriptedAnswers;

    use super::*;

    #[test]
    fn parse_types_accepts_aliases() {
        let types = parse_types("vocabulary, synonyms,fill").unwrap();
        assert_eq!(
            types,
            vec![
                QuestionType::Vocabulary,
                QuestionType::FillInGap,
                QuestionType::WordField
            ]
        );
        assert!(parse_types("vocabulary,grammar").is_err());
        assert!(parse_types(" , ").is_err());
    }

    #[test]
    fn ask_plan_keeps_defaults_on_empty_input() {
        let plan = SessionPlan::from_config(&DrillConfig::default());
        let mut lines = vec!["abc", "4", "no"];
        lines.extend(std::iter::repeat("").take(7));
        let mut answers = ScriptedAnswers::new(lines);

        let plan = ask_plan(&mut answers, plan).unwrap();
        assert_eq!(plan.count, 4);
        assert_eq!(plan.enabled.len(), 7);
        assert!(!plan.enabled.contains(&QuestionType::Vocabulary));
        assert_eq!(answers.remaining(), 0);
    }
}
