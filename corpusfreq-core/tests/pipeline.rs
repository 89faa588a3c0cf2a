use corpusfreq_core::persist::INTERMEDIATE_TABLE;
use corpusfreq_core::{
    Corpus, CorpusLimits, FrequencyPipeline, GroupKey, LexiconMorphology, SamplingParams, Store,
    TfIdfScorer, Tokenizer, Value, UNKNOWN_POS,
};

const LEXICON: &str = "\
коти\tкіт\tNOUN
кіт\tкіт\tNOUN
кота\tкіт\tNOUN
біжить\tбігти\tVERB
біжать\tбігти\tVERB
";

const TEXT: &str = "Коти біжать. Кіт біжить, а кота нема! Коти... \
                    А кіт біжить; коти біжать — і кота видно.";

fn integer(value: &Value) -> u32 {
    value.as_integer().unwrap()
}

#[test]
fn test_document_tables() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("kazka.txt");
    std::fs::write(&doc, TEXT).unwrap();

    let lexicon = LexiconMorphology::parse(LEXICON).unwrap();
    let params = SamplingParams::new(4, 3).unwrap();
    let pipeline = FrequencyPipeline::new(params, lexicon).unwrap();
    let report = pipeline.run_document(&doc).unwrap();

    assert_eq!(report.storage, dir.path().join("kazka.db"));
    assert_eq!(report.total_tokens, 16);
    assert_eq!(report.sampled_tokens, 12);

    let store = Store::open(&report.storage).unwrap();
    let names: Vec<&str> = store.table_names().collect();
    assert_eq!(
        names,
        vec![
            INTERMEDIATE_TABLE,
            "чс_словоформ",
            "чс_лем",
            "чс_частин_мови",
        ]
    );

    // every snapshot row has K samples summing to its absolute frequency
    let snapshot = store.table(INTERMEDIATE_TABLE).unwrap();
    let mut sampled = 0;
    for row in snapshot.rows() {
        assert_eq!(row.len(), 4 + 3);
        let absolute = integer(&row[3]);
        assert_eq!(row[4..].iter().map(integer).sum::<u32>(), absolute);
        sampled += absolute;
    }
    assert_eq!(sampled as usize, report.sampled_tokens);

    let lemmas = store.table(GroupKey::Lemma.table_name()).unwrap();
    // samples: [коти біжать кіт біжить] [а кота нема коти]
    //          [а кіт біжить коти]
    let cat = lemmas.get("кіт").unwrap();
    assert_eq!(integer(&cat[1]), 6);
    assert_eq!(cat[2..].iter().map(integer).collect::<Vec<_>>(), vec![2, 2, 2]);

    let unknown = store.table(GroupKey::PartOfSpeech.table_name()).unwrap();
    assert_eq!(integer(&unknown.get(UNKNOWN_POS).unwrap()[1]), 3);

    for key in GroupKey::ALL {
        let table = store.table(key.table_name()).unwrap();
        let totals: Vec<u32> = table.rows().map(|r| integer(&r[1])).collect();
        assert!(totals.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(totals.iter().sum::<u32>() as usize, report.sampled_tokens);
    }
}

#[test]
fn test_rerun_replaces_rows() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("kazka.txt");
    std::fs::write(&doc, TEXT).unwrap();

    let lexicon = LexiconMorphology::parse(LEXICON).unwrap();
    let pipeline = FrequencyPipeline::new(SamplingParams::default(), lexicon).unwrap();
    let first = pipeline.run_document(&doc).unwrap();
    let before = std::fs::read(&first.storage).unwrap();
    let second = pipeline.run_document(&doc).unwrap();
    let after = std::fs::read(&second.storage).unwrap();

    assert_eq!(first, second);
    assert_eq!(before, after);

    let store = Store::open(&second.storage).unwrap();
    assert_eq!(store.table(INTERMEDIATE_TABLE).unwrap().len(), first.distinct_word_forms);
}

#[test]
fn test_rerun_on_edited_document_drops_stale_keys() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("draft.txt");
    let params = SamplingParams::new(2, 2).unwrap();
    let pipeline = FrequencyPipeline::new(params, LexiconMorphology::new()).unwrap();

    std::fs::write(&doc, "old old old new").unwrap();
    pipeline.run_document(&doc).unwrap();
    std::fs::write(&doc, "new new fresh").unwrap();
    let report = pipeline.run_document(&doc).unwrap();
    assert_eq!(report.sampled_tokens, 3);

    let store = Store::open(&report.storage).unwrap();
    let forms = store.table(GroupKey::WordForm.table_name()).unwrap();
    assert!(forms.get("old").is_none());
    assert_eq!(integer(&forms.get("new").unwrap()[1]), 2);

    for key in GroupKey::ALL {
        let table = store.table(key.table_name()).unwrap();
        let total: u32 = table.rows().map(|r| integer(&r[1])).sum();
        assert_eq!(total as usize, report.sampled_tokens);
    }
    assert_eq!(store.table(INTERMEDIATE_TABLE).unwrap().len(), 2);
}

#[test]
fn test_documents_are_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.txt");
    let bad = dir.path().join("bad.txt");
    std::fs::write(&good, "один два три").unwrap();
    std::fs::write(&bad, [0xFFu8, 0xFE, 0x00]).unwrap();

    let pipeline =
        FrequencyPipeline::new(SamplingParams::default(), LexiconMorphology::new()).unwrap();
    assert!(pipeline.run_document(&bad).is_err());
    let report = pipeline.run_document(&good).unwrap();

    assert!(!dir.path().join("bad.db").exists());
    let store = Store::open(&report.storage).unwrap();
    assert_eq!(store.table("чс_словоформ").unwrap().len(), 3);
}

#[test]
fn test_corpus_ranking_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("a.txt");
    let second = dir.path().join("b.txt");
    std::fs::write(&first, "Cat cat dog.").unwrap();
    std::fs::write(&second, "Dog, dog!").unwrap();

    let corpus =
        Corpus::from_files(&[first, second], CorpusLimits::default(), &Tokenizer::new())
            .unwrap();
    let ranked = TfIdfScorer::new().rank(&corpus, 100);

    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].term, "cat");
    assert!((ranked[0].score - 0.3917).abs() < 1e-4);
    assert_eq!(ranked[1].term, "dog");
    assert_eq!(ranked[1].score, 0.0);
}
