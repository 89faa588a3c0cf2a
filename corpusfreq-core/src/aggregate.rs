//! Grouped frequency tables by word form, lemma and part of speech

use ahash::AHashMap;
use serde::Serialize;

use crate::accumulator::{FrequencyRecord, FrequencyTable};

/// Column a frequency table is grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    WordForm,
    Lemma,
    PartOfSpeech,
}

impl GroupKey {
    pub const ALL: [GroupKey; 3] = [GroupKey::WordForm, GroupKey::Lemma, GroupKey::PartOfSpeech];

    /// Name of the persisted table
    pub fn table_name(self) -> &'static str {
        match self {
            GroupKey::WordForm => "чс_словоформ",
            GroupKey::Lemma => "чс_лем",
            GroupKey::PartOfSpeech => "чс_частин_мови",
        }
    }

    /// Name of the primary key column
    pub fn column(self) -> &'static str {
        match self {
            GroupKey::WordForm => "word_form",
            GroupKey::Lemma => "lemma",
            GroupKey::PartOfSpeech => "part_of_speech",
        }
    }

    fn extract(self, record: &FrequencyRecord) -> &str {
        match self {
            GroupKey::WordForm => &record.word_form,
            GroupKey::Lemma => &record.lemma,
            GroupKey::PartOfSpeech => &record.part_of_speech,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateRecord {
    pub key: String,
    pub absolute_frequency: u32,
    pub frequencies: Vec<u32>,
}

/// Group `records` by `key`, summing counts element-wise.
///
/// The result is sorted by absolute frequency, highest first; equal
/// frequencies keep the order in which their key was first seen.
pub fn aggregate(
    records: &[FrequencyRecord],
    key: GroupKey,
    sample_count: usize,
) -> Vec<AggregateRecord> {
    let mut groups: Vec<AggregateRecord> = Vec::new();
    let mut index: AHashMap<&str, usize> = AHashMap::new();

    for record in records {
        let value = key.extract(record);
        let idx = *index.entry(value).or_insert_with(|| {
            groups.push(AggregateRecord {
                key: value.to_string(),
                absolute_frequency: 0,
                frequencies: vec![0; sample_count],
            });
            groups.len() - 1
        });

        let group = &mut groups[idx];
        group.absolute_frequency += record.absolute_frequency();
        for (sum, count) in group.frequencies.iter_mut().zip(&record.frequencies) {
            *sum += count;
        }
    }

    groups.sort_by(|a, b| b.absolute_frequency.cmp(&a.absolute_frequency));
    groups
}

/// The three grouped views of one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateTables {
    pub word_forms: Vec<AggregateRecord>,
    pub lemmas: Vec<AggregateRecord>,
    pub parts_of_speech: Vec<AggregateRecord>,
}

impl AggregateTables {
    pub fn build(table: &FrequencyTable) -> Self {
        let k = table.sample_count();
        Self {
            word_forms: aggregate(table.records(), GroupKey::WordForm, k),
            lemmas: aggregate(table.records(), GroupKey::Lemma, k),
            parts_of_speech: aggregate(table.records(), GroupKey::PartOfSpeech, k),
        }
    }

    pub fn get(&self, key: GroupKey) -> &[AggregateRecord] {
        match key {
            GroupKey::WordForm => &self.word_forms,
            GroupKey::Lemma => &self.lemmas,
            GroupKey::PartOfSpeech => &self.parts_of_speech,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::Accumulator;
    use crate::config::SamplingParams;
    use crate::morphology::LexiconMorphology;

    fn sample_table() -> FrequencyTable {
        let lexicon = LexiconMorphology::parse(
            "cats\tcat\tNOUN\ncat\tcat\tNOUN\nran\trun\tVERB\nruns\trun\tVERB\n",
        )
        .unwrap();
        let tokens = ["cats", "ran", "cat", "cats", "runs", "cat", "the", "cats"];
        let params = SamplingParams::new(3, 3).unwrap();
        Accumulator::new(params).accumulate(&tokens, &lexicon)
    }

    #[test]
    fn test_word_forms_are_identity_grouping() {
        let table = sample_table();
        let forms = aggregate(table.records(), GroupKey::WordForm, 3);
        assert_eq!(forms.len(), table.len());
        for agg in &forms {
            let base = table.get(&agg.key).unwrap();
            assert_eq!(agg.absolute_frequency, base.absolute_frequency());
            assert_eq!(agg.frequencies, base.frequencies);
        }
    }

    #[test]
    fn test_lemma_sums() {
        let table = sample_table();
        let lemmas = aggregate(table.records(), GroupKey::Lemma, 3);

        // samples: [cats ran cat] [cats runs cat] [the cats]
        let cat = lemmas.iter().find(|r| r.key == "cat").unwrap();
        assert_eq!(cat.absolute_frequency, 5);
        assert_eq!(cat.frequencies, vec![2, 2, 1]);

        let run = lemmas.iter().find(|r| r.key == "run").unwrap();
        assert_eq!(run.absolute_frequency, 2);
        assert_eq!(run.frequencies, vec![1, 1, 0]);

        assert_eq!(lemmas[0].key, "cat");
    }

    #[test]
    fn test_group_sums_match_base_records() {
        let table = sample_table();
        for key in GroupKey::ALL {
            for agg in aggregate(table.records(), key, 3) {
                let members: Vec<&FrequencyRecord> = table
                    .records()
                    .iter()
                    .filter(|r| key.extract(r) == agg.key)
                    .collect();
                let total: u32 = members.iter().map(|r| r.absolute_frequency()).sum();
                assert_eq!(agg.absolute_frequency, total);
                for sample in 0..3 {
                    let sum: u32 = members.iter().map(|r| r.frequencies[sample]).sum();
                    assert_eq!(agg.frequencies[sample], sum);
                }
            }
        }
    }

    #[test]
    fn test_sorted_non_increasing() {
        let tables = AggregateTables::build(&sample_table());
        for key in GroupKey::ALL {
            let rows = tables.get(key);
            assert!(rows
                .windows(2)
                .all(|w| w[0].absolute_frequency >= w[1].absolute_frequency));
        }
    }

    #[test]
    fn test_ties_keep_first_sighting_order() {
        let table = sample_table();
        let pos = aggregate(table.records(), GroupKey::PartOfSpeech, 3);
        let keys: Vec<&str> = pos.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["NOUN", "VERB", "UNKN"]);

        // ran, runs and the are each seen once; first-sighting order wins
        let forms = aggregate(table.records(), GroupKey::WordForm, 3);
        let singles: Vec<&str> = forms
            .iter()
            .filter(|r| r.absolute_frequency == 1)
            .map(|r| r.key.as_str())
            .collect();
        assert_eq!(singles, vec!["ran", "runs", "the"]);
    }
}
