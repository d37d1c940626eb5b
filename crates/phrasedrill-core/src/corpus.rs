//! JSON corpus loader.
//!
//! Loads the question corpus, groups items by type in display order, and
//! validates it. Entries are positional arrays; a type's entries are either
//! an object keyed by item id or a plain array whose ids are derived from
//! the position (`vocabulary#1`, `vocabulary#2`, ...).

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use serde::de::{Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{DrillError, Result};
use crate::model::{Item, ItemId, QuestionType};
use crate::question::{
    Expression, FillInGap, Idiom, MultipleChoice, PhrasalVerb, Pronunciation, Question,
    Vocabulary, WordField,
};

#[derive(Debug, Deserialize)]
struct VocabularyEntry(String, Vec<String>);

#[derive(Debug, Deserialize)]
struct FillInGapEntry(String, String);

#[derive(Debug, Deserialize)]
struct ExpressionEntry(String, String);

#[derive(Debug, Deserialize)]
struct PhrasalVerbEntry(Vec<String>, Vec<String>, bool, String);

#[derive(Debug, Deserialize)]
struct WordFieldEntry(String, Vec<String>);

#[derive(Debug, Deserialize)]
struct IdiomEntry(String, String);

#[derive(Debug, Deserialize)]
struct MultipleChoiceEntry(String, Vec<String>);

#[derive(Debug, Deserialize)]
struct PronunciationEntry(String, String, Vec<String>);

/// An entry that parsed but failed content validation.
#[derive(Debug, Clone)]
pub struct RejectedItem {
    pub id: ItemId,
    pub question_type: QuestionType,
    pub reason: String,
}

/// The loaded corpus, grouped by question type.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    items: BTreeMap<QuestionType, BTreeMap<ItemId, Item>>,
    rejected: Vec<RejectedItem>,
    listed: BTreeSet<QuestionType>,
}

impl Corpus {
    /// Items grouped by type, in display order.
    pub fn by_type(&self) -> &BTreeMap<QuestionType, BTreeMap<ItemId, Item>> {
        &self.items
    }

    /// Entries excluded at load time.
    pub fn rejected(&self) -> &[RejectedItem] {
        &self.rejected
    }

    /// Types whose section is an array, so their ids follow entry position.
    pub fn listed_types(&self) -> &BTreeSet<QuestionType> {
        &self.listed
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.values().find_map(|group| group.get(id))
    }

    /// Every usable item id.
    pub fn ids(&self) -> impl Iterator<Item = &ItemId> {
        self.items.values().flat_map(|group| group.keys())
    }

    /// Number of usable items of one type.
    pub fn count(&self, question_type: QuestionType) -> usize {
        self.items.get(&question_type).map_or(0, BTreeMap::len)
    }

    pub fn len(&self) -> usize {
        self.items.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parse a corpus file.
///
/// `hint_chars` is the number of letters idiom hints reveal; idioms too
/// short for it are rejected.
pub fn load_corpus(path: &Path, hint_chars: usize) -> Result<Corpus> {
    let content = std::fs::read_to_string(path).map_err(|e| DrillError::CorpusRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    parse_corpus_str(&content, &path.display().to_string(), hint_chars)
}

/// Parse a corpus from a JSON string (useful for testing).
pub fn parse_corpus_str(content: &str, source: &str, hint_chars: usize) -> Result<Corpus> {
    let Pairs(sections): Pairs<Section> = serde_json::from_str(content)
        .map_err(|e| DrillError::corpus("document", source, e.to_string()))?;

    let mut corpus = Corpus::default();
    let mut owners: HashMap<ItemId, QuestionType> = HashMap::new();

    for (key, section) in sections {
        let question_type: QuestionType = key
            .parse()
            .map_err(|e: String| DrillError::corpus("document", source, e))?;
        if matches!(section, Section::Listed(_)) {
            corpus.listed.insert(question_type);
        }

        for (id, entry) in section_entries(question_type, section) {
            if let Some(owner) = owners.insert(id.clone(), question_type) {
                let message = if owner == question_type {
                    "duplicate id in this section".to_string()
                } else {
                    format!("id already used by a {owner} entry")
                };
                return Err(DrillError::corpus(question_type, &id, message));
            }

            match build_question(question_type, &id, entry, hint_chars) {
                Ok(question) => {
                    corpus
                        .items
                        .entry(question_type)
                        .or_default()
                        .insert(id.clone(), Item { id, question });
                }
                Err(e) if e.is_item_local() => {
                    tracing::warn!("skipping {question_type} entry '{id}': {e}");
                    corpus.rejected.push(RejectedItem {
                        id,
                        question_type,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }

    tracing::debug!(
        "loaded {} item(s) from {source}, {} rejected",
        corpus.len(),
        corpus.rejected.len()
    );
    Ok(corpus)
}

/// A JSON object read as ordered key/value pairs. Repeated keys are kept.
struct Pairs<T>(Vec<(String, T)>);

struct PairsVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for PairsVisitor<T> {
    type Value = Pairs<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object keyed by question type")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Pairs<T>, A::Error> {
        let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(pair) = map.next_entry::<String, T>()? {
            pairs.push(pair);
        }
        Ok(Pairs(pairs))
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Pairs<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(PairsVisitor(PhantomData))
    }
}

/// One type section: entries keyed by id, or listed by position.
enum Section {
    Keyed(Vec<(ItemId, Value)>),
    Listed(Vec<Value>),
}

struct SectionVisitor;

impl<'de> Visitor<'de> for SectionVisitor {
    type Value = Section;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object or array of entries")
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> std::result::Result<Section, A::Error> {
        let Pairs(entries) = PairsVisitor(PhantomData).visit_map(map)?;
        Ok(Section::Keyed(entries))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Section, A::Error> {
        let mut entries = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(entry) = seq.next_element::<Value>()? {
            entries.push(entry);
        }
        Ok(Section::Listed(entries))
    }
}

impl<'de> Deserialize<'de> for Section {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(SectionVisitor)
    }
}

/// Flatten a type section into `(id, entry)` pairs.
fn section_entries(question_type: QuestionType, section: Section) -> Vec<(ItemId, Value)> {
    match section {
        Section::Keyed(entries) => entries,
        Section::Listed(entries) => entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| (format!("{question_type}#{}", i + 1), entry))
            .collect(),
    }
}

fn build_question(
    question_type: QuestionType,
    id: &str,
    entry: Value,
    hint_chars: usize,
) -> Result<Question> {
    fn fields<T: for<'de> Deserialize<'de>>(
        question_type: QuestionType,
        id: &str,
        entry: Value,
    ) -> Result<T> {
        serde_json::from_value(entry)
            .map_err(|e| DrillError::corpus(question_type, id, e.to_string()))
    }

    let question = match question_type {
        QuestionType::Vocabulary => {
            let VocabularyEntry(word, meanings) = fields(question_type, id, entry)?;
            Question::Vocabulary(Vocabulary { word, meanings })
        }
        QuestionType::FillInGap => {
            let FillInGapEntry(sentence, word) = fields(question_type, id, entry)?;
            Question::FillInGap(FillInGap { sentence, word })
        }
        QuestionType::Expression => {
            let ExpressionEntry(sentence, meaning) = fields(question_type, id, entry)?;
            Question::Expression(Expression { sentence, meaning })
        }
        QuestionType::PhrasalVerb => {
            let PhrasalVerbEntry(phrase, meanings, separable, sentence) =
                fields(question_type, id, entry)?;
            let mut words = phrase.into_iter();
            let Some(verb) = words.next() else {
                return Err(DrillError::corpus(question_type, id, "verb phrase is empty"));
            };
            Question::PhrasalVerb(PhrasalVerb {
                verb,
                particles: words.collect(),
                meanings,
                separable,
                sentence,
            })
        }
        QuestionType::WordField => {
            let WordFieldEntry(prompt, words) = fields(question_type, id, entry)?;
            Question::WordField(WordField::new(id, prompt, words)?)
        }
        QuestionType::Idiom => {
            let IdiomEntry(idiom, meaning) = fields(question_type, id, entry)?;
            Question::Idiom(Idiom::new(id, idiom, meaning, hint_chars)?)
        }
        QuestionType::MultipleChoice => {
            let MultipleChoiceEntry(question, options) = fields(question_type, id, entry)?;
            if options.is_empty() {
                return Err(DrillError::corpus(question_type, id, "no answer options"));
            }
            Question::MultipleChoice(MultipleChoice { question, options })
        }
        QuestionType::Pronunciation => {
            let PronunciationEntry(word, sentence, options) = fields(question_type, id, entry)?;
            if options.is_empty() {
                return Err(DrillError::corpus(
                    question_type,
                    id,
                    "no pronunciation options",
                ));
            }
            Question::Pronunciation(Pronunciation {
                word,
                sentence,
                options,
            })
        }
    };

    Ok(question)
}

/// A warning from corpus validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The item ID (if applicable).
    pub item_id: Option<ItemId>,
    /// Warning message.
    pub message: String,
}

/// Check a loaded corpus for content that will drill poorly.
pub fn validate_corpus(corpus: &Corpus) -> Vec<ValidationWarning> {
    let mut warnings: Vec<ValidationWarning> = corpus
        .rejected
        .iter()
        .map(|r| ValidationWarning {
            item_id: Some(r.id.clone()),
            message: format!("excluded from drills: {}", r.reason),
        })
        .collect();

    if corpus.is_empty() {
        warnings.push(ValidationWarning {
            item_id: None,
            message: "corpus has no usable items".into(),
        });
    }

    for item in corpus.by_type().values().flat_map(BTreeMap::values) {
        let warn = |message: String| ValidationWarning {
            item_id: Some(item.id.clone()),
            message,
        };

        if item.question.summarize().trim().is_empty() {
            warnings.push(warn("prompt is empty".into()));
        }

        match &item.question {
            Question::Vocabulary(q) if q.meanings.is_empty() => {
                warnings.push(warn("no accepted meanings, every answer needs a judgement".into()));
            }
            Question::MultipleChoice(MultipleChoice { options, .. })
            | Question::Pronunciation(Pronunciation { options, .. }) => {
                if options.len() == 1 {
                    warnings.push(warn("only one option, nothing to choose from".into()));
                }
                if options.iter().skip(1).any(|o| o == &options[0]) {
                    warnings.push(warn("a distractor repeats the correct answer".into()));
                }
            }
            _ => {}
        }
    }

    warnings
}

/// Warn when records exist for a corpus with array sections. Inserting an
/// entry into such a section renumbers the rest, and their records follow
/// the position rather than the entry.
pub fn positional_id_warning(corpus: &Corpus, has_records: bool) -> Option<ValidationWarning> {
    if !has_records || corpus.listed.is_empty() {
        return None;
    }
    let types: Vec<String> = corpus.listed.iter().map(ToString::to_string).collect();
    let types = types.join(", ");
    tracing::warn!("records exist for positional ids in section(s) {types}");
    Some(ValidationWarning {
        item_id: None,
        message: format!(
            "section(s) {types} are arrays, so ids follow entry order and records shift \
             when entries are inserted; key these sections by id instead"
        ),
    })
}
