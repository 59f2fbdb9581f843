// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use locmem::app_config::{self, Config};
use locmem::file_utils::FileManager;
use locmem::language_utils;
use locmem::translation::context::{ContextAssembler, StringEntry};
use locmem::translation::glossary::{GlossaryEntry, GlossaryStore};
use locmem::translation::memory::TranslationMemoryStore;
use locmem::translation::prompts::{parse_response, PromptRenderer};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// Prompt rendering styles
#[derive(Debug, Clone, Copy, ValueEnum)]
enum PromptFormat {
    /// Full system prompt followed by the user prompt
    Full,
    /// Compact system prompt followed by the user prompt
    Compact,
    /// Structured JSON request
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage the project glossary
    #[command(subcommand)]
    Glossary(GlossaryCommand),

    /// Inspect and maintain the translation memory
    #[command(subcommand)]
    Memory(MemoryCommand),

    /// Render the prompt for a batch of strings
    Prompt {
        /// JSON file with an array of {"key", "value", "comment"} objects
        #[arg(value_name = "BATCH")]
        batch: PathBuf,

        /// Target language code (e.g., 'fr', 'pt-BR')
        #[arg(short, long)]
        lang: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "full")]
        format: PromptFormat,
    },

    /// Generate shell completions for locmem
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum GlossaryCommand {
    /// List glossary terms
    List {
        /// Only list terms still missing a translation for this language
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Add or replace a term
    Add {
        /// The term
        term: String,

        /// Fixed translation as LANG=VALUE (repeatable)
        #[arg(short = 't', long = "translation", value_parser = parse_translation)]
        translations: Vec<(String, String)>,

        /// What the term means
        #[arg(short, long)]
        definition: Option<String>,

        /// Match the exact casing only
        #[arg(long)]
        case_sensitive: bool,

        /// Keep the term verbatim in every language
        #[arg(long)]
        do_not_translate: bool,

        /// Part of speech, e.g. "noun"
        #[arg(long)]
        part_of_speech: Option<String>,
    },

    /// Remove a term
    Remove {
        /// The term (case-insensitive)
        term: String,
    },

    /// Create the glossary file from the configured terms
    Init {
        /// Overwrite an existing glossary file
        #[arg(short, long)]
        force: bool,
    },

    /// Add the terms of an exported glossary document
    Import {
        /// Document written by `glossary export`
        file: PathBuf,
    },

    /// Write every term as a versioned interchange document
    Export {
        /// Output file; standard output when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum MemoryCommand {
    /// Show memory statistics
    Stats,

    /// Delete every stored translation
    Clear,

    /// Look up exact and similar translations
    Lookup {
        /// Source text
        text: String,

        /// Target language code
        #[arg(short, long)]
        lang: String,
    },

    /// Store the translations of a backend reply
    Record {
        /// File containing the backend's JSON reply
        #[arg(value_name = "RESPONSE")]
        response: PathBuf,

        /// Language of the translations
        #[arg(short, long)]
        lang: String,

        /// Backend that produced the reply
        #[arg(short, long)]
        provider: String,
    },
}

/// locmem - Translation memory and glossary for app localization
///
/// Keeps machine translations of app strings consistent by remembering
/// earlier translations and enforcing project terminology.
#[derive(Parser, Debug)]
#[command(name = "locmem")]
#[command(version)]
#[command(about = "Translation memory and glossary for app localization")]
#[command(long_about = "locmem keeps machine translations of app strings consistent across batches and runs.

EXAMPLES:
    locmem glossary init                              # Create the glossary from locmem.json
    locmem glossary add LotoFuel --do-not-translate   # Never translate the product name
    locmem glossary add Dashboard -t fr='Tableau de bord'
    locmem glossary list --lang de                    # Terms still missing a German translation
    locmem glossary export -o terms.json              # Share terms with another project
    locmem prompt batch.json --lang fr                # Render the prompt for a batch
    locmem memory record reply.json -l fr -p openai   # Remember a backend reply
    locmem memory lookup 'Save Changes' --lang fr     # Exact and fuzzy matches
    locmem completions bash > locmem.bash             # Generate bash completions

CONFIGURATION:
    Configuration is read from locmem.json by default. You can specify a different
    file with --config. Defaults are used when the file does not exist.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "locmem.json")]
    config: PathBuf,

    /// Set logging level
    #[arg(long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The logger accepts everything; `log::set_max_level` does the filtering
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

// @parses: LANG=VALUE pairs for --translation
fn parse_translation(raw: &str) -> Result<(String, String), String> {
    let (language, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected LANG=VALUE, got '{}'", raw))?;
    let language = language.trim();
    language_utils::validate_locale(language).map_err(|e| e.to_string())?;
    if value.trim().is_empty() {
        return Err(format!("translation for '{}' must not be empty", language));
    }
    Ok((language.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Start at info; the configured level is applied once the config is read
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "locmem", &mut std::io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = Config::load_or_default(&cli.config)?;
    if let Some(level) = cli.log_level.clone() {
        config.log_level = level.into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    config.validate().context("Configuration validation failed")?;

    match cli.command {
        Commands::Glossary(command) => run_glossary(&config, command),
        Commands::Memory(command) => run_memory(&config, command),
        Commands::Prompt { batch, lang, format } => run_prompt(&config, &batch, &lang, format).await,
        Commands::Completions { .. } => Ok(ExitCode::SUCCESS),
    }
}

fn open_glossary(config: &Config) -> Result<GlossaryStore> {
    GlossaryStore::open(&config.glossary.path)
        .with_context(|| format!("Failed to load glossary: {:?}", config.glossary.path))
}

fn open_memory(config: &Config) -> Result<TranslationMemoryStore> {
    let path = config.memory.resolved_path();
    TranslationMemoryStore::open(&path, config.memory.options())
        .with_context(|| format!("Failed to load translation memory: {:?}", path))
}

fn run_glossary(config: &Config, command: GlossaryCommand) -> Result<ExitCode> {
    let path = &config.glossary.path;

    match command {
        GlossaryCommand::List { lang } => {
            if !FileManager::file_exists(path) {
                println!("No glossary found at {:?}. Run `locmem glossary init` first.", path);
                return Ok(ExitCode::SUCCESS);
            }
            let glossary = open_glossary(config)?;
            let terms = match &lang {
                Some(language) => glossary.terms_needing_translation(language),
                None => glossary.all_terms(),
            };

            if terms.is_empty() {
                println!("No terms to show.");
            }
            for entry in &terms {
                println!("{}", describe_term(entry));
            }
            Ok(ExitCode::SUCCESS)
        }
        GlossaryCommand::Add {
            term,
            translations,
            definition,
            case_sensitive,
            do_not_translate,
            part_of_speech,
        } => {
            if term.trim().is_empty() {
                return Err(anyhow!("Term must not be empty"));
            }
            let glossary = open_glossary(config)?;
            let mut entry = GlossaryEntry::new(term.trim())
                .case_sensitive(case_sensitive)
                .do_not_translate(do_not_translate);
            for (language, value) in &translations {
                entry = entry.with_translation(language, value);
            }
            if let Some(definition) = &definition {
                entry = entry.with_definition(definition);
            }
            if let Some(part_of_speech) = &part_of_speech {
                entry = entry.with_part_of_speech(part_of_speech);
            }

            let replaced = glossary.get_term(&entry.term).is_some();
            glossary.add_term(entry);
            glossary.save()?;
            info!("{} term '{}' in {:?}", if replaced { "Updated" } else { "Added" }, term.trim(), path);
            Ok(ExitCode::SUCCESS)
        }
        GlossaryCommand::Remove { term } => {
            let glossary = open_glossary(config)?;
            if !glossary.remove_term(&term) {
                eprintln!("Term not found: {}", term);
                return Ok(ExitCode::FAILURE);
            }
            glossary.save()?;
            info!("Removed term '{}'", term);
            Ok(ExitCode::SUCCESS)
        }
        GlossaryCommand::Init { force } => {
            if FileManager::file_exists(path) && !force {
                eprintln!("Glossary already exists at {:?}. Use --force to overwrite.", path);
                return Ok(ExitCode::FAILURE);
            }

            let glossary = GlossaryStore::new(path);
            let entries = config
                .glossary
                .terms
                .iter()
                .cloned()
                .map(GlossaryEntry::try_from)
                .collect::<Result<Vec<_>, _>>()
                .context("Invalid glossary term in configuration")?;
            let count = entries.len();
            glossary.add_terms(entries);
            glossary.force_save()?;
            info!("Created glossary at {:?} with {} term(s)", path, count);
            Ok(ExitCode::SUCCESS)
        }
        GlossaryCommand::Import { file } => {
            let glossary = open_glossary(config)?;
            let json = FileManager::read_to_string(&file)?;
            let count = glossary
                .import_json(&json)
                .with_context(|| format!("Failed to import glossary document: {:?}", file))?;
            glossary.save()?;
            info!("Imported {} term(s) into {:?}", count, path);
            Ok(ExitCode::SUCCESS)
        }
        GlossaryCommand::Export { output } => {
            let glossary = open_glossary(config)?;
            let json = glossary.export_json()?;
            match output {
                Some(output) => {
                    FileManager::write_to_file(&output, &json)?;
                    info!("Exported {} term(s) to {:?}", glossary.len(), output);
                }
                None => println!("{}", json),
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn describe_term(entry: &GlossaryEntry) -> String {
    let mut line = entry.term.clone();
    if entry.do_not_translate {
        line.push_str(" [do not translate]");
    }
    if entry.case_sensitive {
        line.push_str(" [case-sensitive]");
    }
    if let Some(part_of_speech) = &entry.part_of_speech {
        line.push_str(&format!(" ({})", part_of_speech));
    }
    for (language, value) in &entry.translations {
        line.push_str(&format!("\n    {}: {}", language, value));
    }
    if let Some(definition) = &entry.definition {
        line.push_str(&format!("\n    definition: {}", definition));
    }
    line
}

fn run_memory(config: &Config, command: MemoryCommand) -> Result<ExitCode> {
    let memory = open_memory(config)?;

    match command {
        MemoryCommand::Stats => {
            let stats = memory.statistics();
            println!("Entries: {}", stats.total_entries);
            println!("Human reviewed: {}", stats.human_reviewed);
            for (language, count) in &stats.translations_by_language {
                println!("  {} ({}): {}", language_utils::display_name(language), language, count);
            }
            for (provider, count) in &stats.by_provider {
                println!("  via {}: {}", provider, count);
            }
        }
        MemoryCommand::Clear => {
            let count = memory.len();
            memory.clear();
            memory.save()?;
            info!("Cleared {} entries from translation memory", count);
        }
        MemoryCommand::Lookup { text, lang } => {
            if let Some(exact) = memory.find_exact(&text, &lang) {
                println!("Exact: {}", exact);
            }
            let matches = memory.find_similar(&text, &lang, None);
            if matches.is_empty() {
                println!("No similar translations.");
            }
            for m in matches {
                let reviewed = if m.human_reviewed { " (reviewed)" } else { "" };
                println!("{:>5.1}%  {} → {}{}", m.similarity * 100.0, m.source_text, m.translation, reviewed);
            }
        }
        MemoryCommand::Record { response, lang, provider } => {
            language_utils::validate_locale(&lang)?;
            let text = FileManager::read_to_string(&response)?;
            let translations = parse_response(&text)
                .with_context(|| format!("Failed to parse response file: {:?}", response))?;
            let items: Vec<(String, String, String)> = translations
                .into_iter()
                .filter(|(source, translation)| !source.is_empty() && !translation.is_empty())
                .map(|(source, translation)| (source, translation, lang.clone()))
                .collect();

            memory.store_batch(&items, &provider);
            memory.save()?;
            info!("Recorded {} translation(s) for {}", items.len(), lang);
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn run_prompt(config: &Config, batch: &Path, lang: &str, format: PromptFormat) -> Result<ExitCode> {
    language_utils::validate_locale(lang)?;

    let content = FileManager::read_to_string(batch)?;
    let entries: Vec<StringEntry> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse batch file: {:?}", batch))?;
    if entries.is_empty() {
        warn!("Batch {:?} contains no strings", batch);
    }

    let mut assembler = ContextAssembler::new(config.app.clone());
    if config.app.enable_translation_memory {
        assembler = assembler.with_memory(open_memory(config)?);
    }
    if config.app.enable_glossary {
        assembler = assembler.with_glossary(open_glossary(config)?);
    }
    if config.app.enable_usage_analysis {
        assembler = assembler.with_usage_analyzer(Arc::new(config.usage.analyzer()));
    }

    let context = assembler.build_context(&entries, lang).await;
    let renderer = PromptRenderer::new(&context);
    match format {
        PromptFormat::Full => {
            println!("{}\n\n---\n\n{}", renderer.to_system_prompt(), renderer.to_user_prompt());
        }
        PromptFormat::Compact => {
            println!("{}\n\n---\n\n{}", renderer.to_compact_system_prompt(), renderer.to_user_prompt());
        }
        PromptFormat::Json => {
            println!("{}", renderer.to_json_string()?);
        }
    }
    info!("Prompt fingerprint: {}", renderer.fingerprint()?);
    Ok(ExitCode::SUCCESS)
}
