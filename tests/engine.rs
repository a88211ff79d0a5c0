use autocorrect_core::config::CUSTOM_WORD_PROBABILITY;
use autocorrect_core::corpus::read_corpus;
use autocorrect_core::fuzzy::frequency::FrequencyDictionary;
use autocorrect_core::persistence::{load_model_snapshot, save_model_snapshot, JsonFileStore, MemoryStore};
use autocorrect_core::{Autocorrector, EngineConfig, Error, LanguageModel, Strategy, SuggestionSource};
use std::fs;
use std::path::Path;

const CORPUS: &str = "The cat sat on the mat. The cat ate the rat!\nA dog sat on the log.";

fn write_corpus(dir: &Path) -> Vec<String> {
    let path = dir.join("corpus.txt");
    fs::write(&path, CORPUS).unwrap();
    read_corpus(&path).unwrap()
}

#[test]
fn learned_state_survives_a_restart() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let tokens = write_corpus(dir.path());

    {
        let mut engine = Autocorrector::from_tokens(
            &tokens,
            EngineConfig::default(),
            Box::new(JsonFileStore::in_dir(dir.path())),
        )
        .unwrap();

        assert_eq!(engine.suggest(&["the"], "cst")[0].word, "cat");

        engine.add_custom_word("Kohli").unwrap();
        engine.add_shortcut("btw", "by the way").unwrap();
        engine.record_feedback("cst", "cat", true).unwrap();
        assert_eq!(engine.revision(), 3);
    }

    assert!(dir.path().join("custom_words.json").exists());
    assert!(dir.path().join("shortcuts.json").exists());

    let engine = Autocorrector::from_tokens(
        &tokens,
        EngineConfig::default(),
        Box::new(JsonFileStore::in_dir(dir.path())),
    )
    .unwrap();

    assert!(engine.custom_words().contains("kohli"));
    assert_eq!(engine.shortcut_expansion("btw"), Some("by the way"));
    assert_eq!(engine.acceptance_rate("cst", "cat"), Some(1.0));
    assert_eq!(engine.revision(), 0);

    let kohli = &engine.suggest(&[], "kohli")[0];
    assert_eq!(kohli.source, SuggestionSource::Known);
    assert_eq!(kohli.probability, CUSTOM_WORD_PROBABILITY);

    let btw = engine.suggest(&[], "btw");
    assert_eq!(btw.len(), 1);
    assert_eq!(btw[0].word, "by the way");
    assert_eq!(btw[0].source, SuggestionSource::Shortcut);
}

#[test]
fn snapshot_model_answers_like_the_built_one() {
    let dir = tempfile::tempdir().unwrap();
    let tokens = write_corpus(dir.path());
    let model = LanguageModel::build(&tokens);

    let snapshot = dir.path().join("model.bin");
    save_model_snapshot(&model, &snapshot).unwrap();
    let restored = load_model_snapshot(&snapshot).unwrap();
    assert_eq!(restored, model);

    let built = Autocorrector::new(model, EngineConfig::default(), Box::new(MemoryStore::new())).unwrap();
    let loaded = Autocorrector::new(restored, EngineConfig::default(), Box::new(MemoryStore::new())).unwrap();
    for (preceding, word) in [(vec!["the"], "cst"), (vec![], "dgo"), (vec!["sat", "on"], "teh")] {
        assert_eq!(built.suggest(&preceding, word), loaded.suggest(&preceding, word));
    }
    assert_eq!(built.stats(), loaded.stats());
}

#[test]
fn frequency_dictionary_covers_words_outside_the_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let tokens = write_corpus(dir.path());
    let path = dir.path().join("frequency.txt");
    fs::write(&path, "house 1000\nhorse 900\nnot-a-count line\n").unwrap();

    let dictionary = FrequencyDictionary::load(&path, 2).unwrap();
    assert_eq!(dictionary.len(), 2);
    assert!(FrequencyDictionary::load_optional(&dir.path().join("missing.txt"), 2).is_none());

    let engine = Autocorrector::from_tokens(&tokens, EngineConfig::default(), Box::new(MemoryStore::new()))
        .unwrap()
        .with_approximate_dictionary(Box::new(dictionary));

    let suggestions = engine.suggest(&[], "hous");
    assert_eq!(suggestions[0].word, "house");
    assert_eq!(suggestions[0].source, SuggestionSource::Approximate);
    assert_eq!(suggestions[0].probability, 1000.0 / 1900.0);
    assert_eq!(suggestions[1].word, "horse");

    // the corpus still wins when it has a candidate
    assert_eq!(engine.suggest(&[], "cst")[0].source, SuggestionSource::Corrected);
}

#[test]
fn json_config_drives_the_engine() {
    let dir = tempfile::tempdir().unwrap();
    let tokens = write_corpus(dir.path());

    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"strategy": "exact_only", "top_k": 3}"#).unwrap();
    let config = EngineConfig::from_json_file(&path).unwrap();
    assert_eq!(config.strategy, Strategy::ExactOnly);
    assert_eq!(config.top_k, 3);
    assert_eq!(config.max_edit_distance, 2);

    let mut engine = Autocorrector::from_tokens(&tokens, config, Box::new(MemoryStore::new())).unwrap();
    assert_eq!(engine.suggest(&[], "cst")[0].source, SuggestionSource::NoSuggestion);

    engine.set_strategy(Strategy::ContextFree);
    let suggestions = engine.suggest(&[], "cst");
    assert_eq!(suggestions[0].word, "cat");
    assert!(suggestions.len() <= 3);

    fs::write(&path, r#"{"top_k": 0}"#).unwrap();
    assert!(matches!(EngineConfig::from_json_file(&path), Err(Error::Config(_))));

    let mut bad = EngineConfig::default();
    bad.max_edit_distance = 3;
    assert!(matches!(
        Autocorrector::from_tokens(&tokens, bad, Box::new(MemoryStore::new())),
        Err(Error::Config(_))
    ));
}

#[test]
fn unreadable_store_directory_does_not_block_startup() {
    let dir = tempfile::tempdir().unwrap();
    let tokens = write_corpus(dir.path());
    fs::write(dir.path().join("custom_words.json"), "[1, 2").unwrap();
    fs::write(dir.path().join("shortcuts.json"), "\"btw\"").unwrap();

    let mut engine = Autocorrector::from_tokens(
        &tokens,
        EngineConfig::default(),
        Box::new(JsonFileStore::in_dir(dir.path())),
    )
    .unwrap();
    assert!(engine.custom_words().is_empty());
    assert!(engine.shortcuts().is_empty());

    // the next save replaces the malformed documents
    engine.add_shortcut("pls", "please").unwrap();
    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("shortcuts.json")).unwrap()).unwrap();
    assert_eq!(raw, serde_json::json!({"pls": "please"}));
}
