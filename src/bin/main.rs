use autocorrect_core::config::EngineConfig;
use autocorrect_core::corpus::{load_corpora, tokenize};
use autocorrect_core::fuzzy::frequency::FrequencyDictionary;
use autocorrect_core::persistence::{load_model_snapshot, save_model_snapshot, JsonFileStore};
use autocorrect_core::{Autocorrector, LanguageModel, Result, Strategy, Suggestion, SuggestionSource};
use clap::{Parser, Subcommand};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use log::{info, warn};
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(version, about = "Context-aware spelling correction")]
struct Cli {
    /// Corpus text files the vocabulary is built from.
    #[arg(long = "corpus", value_name = "FILE")]
    corpora: Vec<PathBuf>,
    /// Optional `term count` frequency dictionary used as a fallback source.
    #[arg(long, value_name = "FILE")]
    dictionary: Option<PathBuf>,
    /// Directory holding custom_words.json and shortcuts.json.
    #[arg(long, value_name = "DIR", default_value = ".")]
    store_dir: PathBuf,
    /// JSON engine configuration.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Binary snapshot of the built model; read if present, written otherwise.
    #[arg(long, value_name = "FILE")]
    model_cache: Option<PathBuf>,
    /// exact_only, context_free, context_aware or hybrid.
    #[arg(long)]
    strategy: Option<Strategy>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive correction loop (default).
    Repl,
    /// Correct the last word, using the words before it as context.
    Suggest {
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Print vocabulary and store statistics.
    Stats,
    /// Run a fixed set of typos through every strategy.
    Compare,
}

/// (typo, expected correction, sentence containing the typo)
const COMPARISON_CASES: &[(&str, &str, &str)] = &[
    ("thier", "their", "forgot thier book"),
    ("thier", "their", "thier house"),
    ("recieve", "receive", "i will recieve the package"),
    ("recieve", "receive", "recieve payment"),
    ("seperate", "separate", "keep them seperate"),
    ("seperate", "separate", "seperate rooms"),
    ("occured", "occurred", "it occured yesterday"),
    ("definately", "definitely", "definately true"),
    ("beleive", "believe", "i beleive you"),
    ("beleive", "believe", "beleive in yourself"),
    ("neccessary", "necessary", "neccessary steps"),
    ("accomodate", "accommodate", "accomodate guests"),
    ("python", "python", "python programming"),
    ("json", "json", "json data"),
];

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[ERROR] {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut engine = build_engine(&cli)?;
    match cli.command.unwrap_or(Command::Repl) {
        Command::Repl => repl(&mut engine),
        Command::Suggest { words } => {
            let tokens: Vec<&str> = words.iter().map(String::as_str).collect();
            if let Some((word, preceding)) = tokens.split_last() {
                print_suggestions(&engine.suggest(preceding, word));
            }
            Ok(())
        }
        Command::Stats => {
            print_stats(&engine);
            Ok(())
        }
        Command::Compare => {
            compare(&mut engine);
            Ok(())
        }
    }
}

fn load_model(cli: &Cli) -> LanguageModel {
    if let Some(cache) = cli.model_cache.as_ref().filter(|p| p.exists()) {
        match load_model_snapshot(cache) {
            Ok(model) => {
                info!("Loaded model snapshot {}", cache.display());
                return model;
            }
            Err(e) => warn!("Ignoring model snapshot {}: {}", cache.display(), e),
        }
    }

    let model = LanguageModel::build(&load_corpora(&cli.corpora));
    if let Some(cache) = &cli.model_cache {
        if let Err(e) = save_model_snapshot(&model, cache) {
            warn!("Could not write model snapshot {}: {}", cache.display(), e);
        }
    }
    model
}

fn build_engine(cli: &Cli) -> Result<Autocorrector> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy;
    }
    let max_edit_distance = config.max_edit_distance;

    let store = JsonFileStore::in_dir(&cli.store_dir);
    let engine = Autocorrector::new(load_model(cli), config, Box::new(store))?;

    let dictionary = cli
        .dictionary
        .as_ref()
        .and_then(|path| FrequencyDictionary::load_optional(path, max_edit_distance));
    Ok(match dictionary {
        Some(dictionary) => engine.with_approximate_dictionary(Box::new(dictionary)),
        None => engine,
    })
}

fn repl(engine: &mut Autocorrector) -> Result<()> {
    let mut out = stdout();
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    println!(
        "{}",
        format!("Autocorrect (strategy: {})", engine.config().strategy).bold()
    );
    println!("---------------------------------------------------------------");
    println!("Type a phrase; its last word is corrected. Select with ':1', ':2'.");
    println!(":add <word>  :rm <word>  :sc <short> <full...>  :unsc <short>");
    println!(":accept <orig> <sugg>  :reject <orig> <sugg>  :words  :shortcuts  :stats  exit\n");

    // The word last corrected and what was offered for it.
    let mut last: Option<(String, Vec<Suggestion>)> = None;

    loop {
        print!("> ");
        out.flush()?;
        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            break;
        }
        let cmd = input.trim();
        let mut parts = cmd.split_whitespace();

        match parts.next() {
            None => continue,
            Some("exit") => break,
            Some(":add") => {
                for word in parts {
                    report(engine.add_custom_word(word));
                }
            }
            Some(":rm") => {
                for word in parts {
                    match engine.remove_custom_word(word) {
                        Ok(true) => println!("Removed '{}'", word),
                        Ok(false) => println!("'{}' is not a custom word", word),
                        Err(e) => eprintln!("[ERROR] {}", e),
                    }
                }
            }
            Some(":sc") => {
                let short = parts.next().unwrap_or_default();
                let full = parts.collect::<Vec<_>>().join(" ");
                report(engine.add_shortcut(short, &full));
            }
            Some(":unsc") => {
                let short = parts.next().unwrap_or_default();
                match engine.remove_shortcut(short) {
                    Ok(true) => println!("Removed shortcut '{}'", short),
                    Ok(false) => println!("No shortcut '{}'", short),
                    Err(e) => eprintln!("[ERROR] {}", e),
                }
            }
            Some(verb @ (":accept" | ":reject")) => match (parts.next(), parts.next()) {
                (Some(original), Some(suggested)) => {
                    report(engine.record_feedback(original, suggested, verb == ":accept"));
                }
                _ => println!("usage: {} <original> <suggested>", verb),
            },
            Some(":words") => {
                for word in engine.custom_words() {
                    println!("  {}", word);
                }
            }
            Some(":shortcuts") => {
                for (short, full) in engine.shortcuts() {
                    println!("  {} -> {}", short, full);
                }
            }
            Some(":stats") => print_stats(engine),
            Some(s) if s.starts_with(':') && s.len() > 1 => {
                // Select suggestion :1, :2 etc
                let chosen = s[1..].parse::<usize>().ok().and_then(|n| {
                    let (word, suggestions) = last.as_ref()?;
                    let suggestion = suggestions.get(n.checked_sub(1)?)?;
                    Some((word.clone(), suggestion.word.clone()))
                });
                match chosen {
                    Some((word, suggestion)) => {
                        println!("\nCommitting: '{}'", suggestion);
                        report(engine.record_feedback(&word, &suggestion, true));
                        last = None;
                    }
                    None => println!("Nothing to select"),
                }
            }
            Some(_) => {
                let tokens = tokenize(cmd);
                let words: Vec<&str> = tokens.iter().map(String::as_str).collect();
                if let Some((word, preceding)) = words.split_last() {
                    let suggestions = engine.suggest(preceding, word);
                    print_suggestions(&suggestions);
                    last = Some((word.to_string(), suggestions));
                }
            }
        }
    }
    Ok(())
}

fn report(result: Result<()>) {
    match result {
        Ok(()) => println!("{}", "ok".green()),
        Err(e) => eprintln!("[ERROR] {}", e),
    }
}

fn print_suggestions(suggestions: &[Suggestion]) {
    if suggestions.is_empty() {
        println!("\nNo suggestions found.");
        return;
    }
    println!("\nSuggestions:");
    for (i, suggestion) in suggestions.iter().enumerate() {
        let word = match suggestion.source {
            SuggestionSource::NoSuggestion => suggestion.word.as_str().red(),
            SuggestionSource::Known => suggestion.word.as_str().green(),
            _ => suggestion.word.as_str().yellow(),
        };
        println!(
            "  :{}: {} (p: {:.6}, context: {:.6}, {:?})",
            i + 1,
            word,
            suggestion.probability,
            suggestion.context_probability,
            suggestion.source
        );
    }
}

fn print_stats(engine: &Autocorrector) {
    let stats = engine.stats();
    println!("Vocabulary size:  {}", stats.vocabulary_size);
    println!("Bigrams:          {}", stats.bigram_count);
    println!("Trigrams:         {}", stats.trigram_count);
    println!("Custom words:     {}", stats.custom_word_count);
    println!("Shortcuts:        {}", stats.shortcut_count);
    println!("Feedback entries: {}", stats.feedback_entry_count);
}

fn compare(engine: &mut Autocorrector) {
    println!(
        "{:<14} {:>8} {:>10} {:>14} {:>12}",
        "strategy", "correct", "incorrect", "no suggestion", "time (ms)"
    );
    for strategy in Strategy::ALL {
        engine.set_strategy(strategy);
        let (mut correct, mut incorrect, mut missing) = (0, 0, 0);
        let mut elapsed = Duration::ZERO;

        for &(typo, expected, sentence) in COMPARISON_CASES {
            let words: Vec<&str> = sentence.split_whitespace().collect();
            let position = words.iter().position(|w| *w == typo).unwrap_or(words.len());
            let preceding = &words[..position];

            let start = Instant::now();
            let suggestions = engine.suggest(preceding, typo);
            elapsed += start.elapsed();

            match suggestions.first() {
                Some(top) if top.source == SuggestionSource::NoSuggestion => missing += 1,
                Some(top) if top.word == expected => correct += 1,
                _ => incorrect += 1,
            }
        }
        println!(
            "{:<14} {:>8} {:>10} {:>14} {:>12.2}",
            strategy.as_str(),
            correct,
            incorrect,
            missing,
            elapsed.as_secs_f64() * 1000.0
        );
    }
}
