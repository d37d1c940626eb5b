use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

use phrasedrill_core::config::DrillConfig;
use phrasedrill_core::corpus::load_corpus;
use phrasedrill_core::mock::ScriptedAnswers;
use phrasedrill_core::model::{Outcome, QuestionType};
use phrasedrill_core::records::{Record, RecordStore, INITIAL_WEIGHT};
use phrasedrill_core::session::{
    sync_records, CasualFlag, CommitStatus, DrillContext, DrillSession, SessionPlan,
};

const MATERIAL: &str = r#"{
    "vocabulary": {"v-cat": ["cat", ["gato"]]},
    "word_field": {"wf-happy": ["happy", ["happy", "joyful", "glad"]]},
    "idiom": {
        "i-ice": ["break the ice", "start a conversation"],
        "i-bad": ["go", "leave"]
    }
}"#;

struct Fixture {
    _dir: TempDir,
    config: DrillConfig,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let corpus = dir.path().join("material.json");
    std::fs::write(&corpus, MATERIAL).unwrap();
    let config = DrillConfig {
        corpus,
        records: dir.path().join("records.json"),
        ..Default::default()
    };
    Fixture { _dir: dir, config }
}

/// Every item answered wrong, whichever order they come in.
fn wrong_answers() -> ScriptedAnswers {
    // vocabulary: bad translation then "no"; word field and idiom: one line each
    ScriptedAnswers::new(["zzz", "no", "zzz", "no", "zzz", "no"])
}

#[test]
fn full_session_updates_records() {
    let fx = fixture();
    let corpus = load_corpus(&fx.config.corpus, fx.config.hint_chars).unwrap();
    assert_eq!(corpus.len(), 3);
    assert_eq!(corpus.rejected().len(), 1);
    assert_eq!(corpus.rejected()[0].id, "i-bad");

    let store = RecordStore::new(&fx.config.records);
    let records = sync_records(&corpus, &store, fx.config.initial_weight).unwrap();
    assert_eq!(records.len(), 3);
    assert!(!records.contains_key("i-bad"));

    let context = DrillContext::from_config(&fx.config, CasualFlag::default());
    let session = DrillSession::new(&corpus, &context);
    let plan = SessionPlan::from_config(&fx.config);
    let mut answers = wrong_answers();
    let mut report = session
        .run(&records, &plan, &mut answers, &mut StdRng::seed_from_u64(11))
        .unwrap();

    assert_eq!(report.asked(), 3);
    assert_eq!(report.grade, 0.0);
    assert!(report.pool_warning.is_some());
    assert!(report.entries.iter().all(|e| e.outcome == Outcome::None));

    assert!(matches!(
        session.commit(&mut report, &records, &store),
        CommitStatus::Saved
    ));
    let saved = store.load().unwrap();
    for id in ["v-cat", "wf-happy", "i-ice"] {
        assert_eq!(
            saved[id],
            Record {
                correct: 0.0,
                asked: 1,
                weight: 1.0
            },
            "record for {id}"
        );
    }
}

#[test]
fn casual_session_leaves_records_byte_identical() {
    let fx = fixture();
    let corpus = load_corpus(&fx.config.corpus, fx.config.hint_chars).unwrap();
    let store = RecordStore::new(&fx.config.records);
    let records = sync_records(&corpus, &store, INITIAL_WEIGHT).unwrap();
    let before = std::fs::read(store.path()).unwrap();

    let casual = CasualFlag::default();
    let context = DrillContext::from_config(&fx.config, casual.clone());
    let session = DrillSession::new(&corpus, &context);
    let plan = SessionPlan {
        count: 3,
        enabled: [QuestionType::Vocabulary, QuestionType::WordField, QuestionType::Idiom]
            .into_iter()
            .collect(),
    };

    let mut answers = wrong_answers();
    let mut report = session
        .run(&records, &plan, &mut answers, &mut StdRng::seed_from_u64(5))
        .unwrap();
    // flipped mid-session, as a signal handler would
    casual.toggle();

    assert!(matches!(
        session.commit(&mut report, &records, &store),
        CommitStatus::Casual
    ));
    assert_eq!(std::fs::read(store.path()).unwrap(), before);

    // a second load must not rewrite the file either
    sync_records(&corpus, &store, INITIAL_WEIGHT).unwrap();
    assert_eq!(std::fs::read(store.path()).unwrap(), before);
}

#[test]
fn aborted_session_touches_nothing() {
    let fx = fixture();
    let corpus = load_corpus(&fx.config.corpus, fx.config.hint_chars).unwrap();
    let store = RecordStore::new(&fx.config.records);
    let records = sync_records(&corpus, &store, INITIAL_WEIGHT).unwrap();
    let before = std::fs::read(store.path()).unwrap();

    let context = DrillContext::from_config(&fx.config, CasualFlag::default());
    let result = DrillSession::new(&corpus, &context).run(
        &records,
        &SessionPlan::from_config(&fx.config),
        &mut ScriptedAnswers::new(["zzz"]),
        &mut StdRng::seed_from_u64(9),
    );

    assert!(result.is_err());
    assert_eq!(std::fs::read(store.path()).unwrap(), before);
}
