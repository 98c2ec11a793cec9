//! Lexicon command-line interface.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info};

use lexicon::builder::DEFAULT_ID_PREFIX;
use lexicon::utils::ProgressState;
use lexicon::{BuilderConfig, DefinitionFormat, LexiconBuilder, LexiconReader, Result};

#[derive(Parser)]
#[command(name = "lexicon")]
#[command(about = "Build and query a corpus-enriched lexicon", long_about = None)]
#[command(version)]
struct Cli {
    /// Id prefix the snapshot is built with (default "G")
    #[arg(long, global = true)]
    id_prefix: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a snapshot from dictionary and corpus sources
    Build {
        /// JSON configuration file; the flags below override its values
        #[arg(short, long)]
        config: Option<String>,
        /// Dictionary XML file
        #[arg(short, long)]
        dictionary: Option<String>,
        /// Corpus file or directory
        #[arg(long)]
        corpus: Option<String>,
        /// Output snapshot file
        #[arg(short, long)]
        snapshot: Option<String>,
        /// Aggregate corpus files on a single thread
        #[arg(long)]
        sequential: bool,
    },
    /// Look up entries by id, headword or transliteration
    Lookup {
        /// Snapshot file
        snapshot: String,
        /// Id, headword or transliteration
        text: String,
        /// Definition format: primary, secondary, both or short
        #[arg(short, long, default_value = "both")]
        format: DefinitionFormat,
        /// Print the full entry as JSON
        #[arg(long)]
        json: bool,
    },
    /// Ranked free-text search
    Search {
        /// Snapshot file
        snapshot: String,
        /// Search query
        query: String,
        /// Number of results
        #[arg(short = 'k', long, default_value = "10")]
        top_k: usize,
    },
    /// Print entry-set statistics
    Stats {
        /// Snapshot file
        snapshot: String,
    },
}

fn report_progress(state: &mut ProgressState) -> bool {
    info!("{}: {}/{}", state.state_id, state.current + 1, state.total);
    false
}

fn build(
    id_prefix: Option<String>,
    config: Option<String>,
    dictionary: Option<String>,
    corpus: Option<String>,
    snapshot: Option<String>,
    sequential: bool,
) -> Result<()> {
    let mut config = match config {
        Some(path) => BuilderConfig::from_json_file(path)?,
        None => BuilderConfig::default(),
    };
    if let Some(dictionary) = dictionary {
        config.dictionary_path = dictionary;
    }
    if let Some(corpus) = corpus {
        config.corpus_path = corpus;
    }
    if let Some(snapshot) = snapshot {
        config.snapshot_path = snapshot;
    }
    if sequential {
        config.parallel = false;
    }
    if let Some(id_prefix) = id_prefix {
        config.id_prefix = id_prefix;
    }

    let report = LexiconBuilder::build_snapshot(&config, Some(report_progress))?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn lookup(reader: &LexiconReader, text: &str, format: DefinitionFormat, json: bool) -> Result<()> {
    let entries = reader.resolve(text);
    if entries.is_empty() {
        println!("No entry found for {}", text);
        return Ok(());
    }
    for entry in entries {
        if json {
            println!("{}", serde_json::to_string_pretty(entry)?);
            continue;
        }
        println!("{}: {} ({})", entry.id, entry.headword, entry.transliteration.as_deref().unwrap_or_default());
        println!("Part of Speech: {}", entry.part_of_speech_or_unknown());
        if let Some(definition) = reader.definition(&entry.id, format) {
            println!("{}", definition);
        }
        println!("{}", entry.morphology_summary());
        println!();
    }
    Ok(())
}

fn search(reader: &LexiconReader, query: &str, top_k: usize) -> Result<()> {
    for hit in reader.search(query, top_k) {
        let short = reader.definition(&hit.entry.id, DefinitionFormat::Short).unwrap_or_default();
        println!("{:>4}  {:<7} {:<20} {}", hit.score, hit.entry.id, hit.entry.headword, short);
    }
    Ok(())
}

fn stats(reader: &LexiconReader) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&reader.stats())?);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let id_prefix = cli.id_prefix;
    let open = |snapshot: &str| {
        LexiconReader::from_snapshot_file_with_prefix(snapshot, id_prefix.as_deref().unwrap_or(DEFAULT_ID_PREFIX))
    };
    let result = match cli.command {
        Commands::Build { config, dictionary, corpus, snapshot, sequential } => {
            build(id_prefix.clone(), config, dictionary, corpus, snapshot, sequential)
        }
        Commands::Lookup { snapshot, text, format, json } => {
            open(&snapshot).and_then(|reader| lookup(&reader, &text, format, json))
        }
        Commands::Search { snapshot, query, top_k } => open(&snapshot).and_then(|reader| search(&reader, &query, top_k)),
        Commands::Stats { snapshot } => open(&snapshot).and_then(|reader| stats(&reader)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
