//! Command-line interface for verse-corpus
//!
//! Usage:
//!   verse-corpus convert `<input>` --profile `<name|file.yaml>` [--output `<table>`] [--sentences `<file>`]
//!   verse-corpus align `<left>` `<right>` [--output `<table>`] [--left-label L] [--right-label R]
//!   verse-corpus classify `<input>` --profile `<name|file.yaml>`   - Show how each line is read
//!   verse-corpus list-profiles                                 - List available language profiles

use clap::{Arg, ArgAction, ArgMatches, Command};
use config::ValueKind;
use std::path::{Path, PathBuf};
use tracing_subscriber::{filter::LevelFilter, fmt};

use verse_corpus::scripture::alignment::BookSynonyms;
use verse_corpus::scripture::config::{loader, CorpusConfig};
use verse_corpus::scripture::formats::FormatRegistry;
use verse_corpus::scripture::processor::{
    align_files, classify_file, convert_file, default_convert_paths, default_corpus_path,
    AlignOptions, ConvertOptions,
};
use verse_corpus::scripture::profile::{ProfileRegistry, SourceLayout};
use verse_corpus::scripture::Result;

const FORMATS: [&str; 3] = ["xlsx", "csv", "json"];

fn main() {
    let matches = Command::new("verse-corpus")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Turns raw scripture text dumps into verse tables and parallel corpora")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log more (-v info, -vv debug, -vvv trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Configuration file layered over the defaults")
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a raw dump into a verse table and a sentence file")
                .arg(input_arg("Raw text dump"))
                .arg(profile_arg().required(true))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Verse table to write (default: <converted_dir>/<input>_cleaned.<format>)"),
                )
                .arg(
                    Arg::new("sentences")
                        .long("sentences")
                        .help("Sentence file to write"),
                )
                .arg(
                    Arg::new("no-sentences")
                        .long("no-sentences")
                        .help("Do not write a sentence file")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("sentences"),
                )
                .arg(format_arg())
                .arg(
                    Arg::new("layout")
                        .long("layout")
                        .help("Table columns: split (Chapter, Verse) or combined (ChapterVerse)")
                        .value_parser(["split", "combined"]),
                ),
        )
        .subcommand(
            Command::new("align")
                .about("Join two verse tables on Book, Chapter and Verse")
                .arg(
                    Arg::new("left")
                        .help("First verse table")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("right")
                        .help("Second verse table")
                        .required(true)
                        .index(2),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Corpus table to write (default: <corpus_dir>/<left>-<right>-corpus.<format>)"),
                )
                .arg(Arg::new("left-label").long("left-label").help("Label of the first text column"))
                .arg(Arg::new("right-label").long("right-label").help("Label of the second text column"))
                .arg(
                    profile_arg()
                        .action(ArgAction::Append)
                        .help("Profile whose book synonyms join the built-in map (repeatable)"),
                )
                .arg(format_arg()),
        )
        .subcommand(
            Command::new("classify")
                .about("Print the classification of every line of a raw dump")
                .arg(input_arg("Raw text dump"))
                .arg(profile_arg().required(true)),
        )
        .subcommand(Command::new("list-profiles").about("List available language profiles"))
        .get_matches();

    init_tracing(log_level(matches.get_count("verbose")));
    let config_path = matches.get_one::<String>("config").map(PathBuf::from);

    let result = match matches.subcommand() {
        Some(("convert", convert_matches)) => {
            handle_convert_command(convert_matches, config_path.as_deref())
        }
        Some(("align", align_matches)) => handle_align_command(align_matches, config_path.as_deref()),
        Some(("classify", classify_matches)) => {
            handle_classify_command(classify_matches, config_path.as_deref())
        }
        Some(("list-profiles", _)) => handle_list_profiles_command(config_path.as_deref()),
        _ => unreachable!(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn input_arg(help: &'static str) -> Arg {
    Arg::new("input").help(help).required(true).index(1)
}

fn profile_arg() -> Arg {
    Arg::new("profile")
        .long("profile")
        .short('p')
        .help("Built-in profile name or path to a profile YAML file")
}

fn format_arg() -> Arg {
    Arg::new("format")
        .long("format")
        .short('f')
        .help("Table format (default: from the output extension, else the configured format)")
        .value_parser(FORMATS)
}

fn log_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn init_tracing(level: LevelFilter) {
    let subscriber = fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::warn!("Tracing subscriber already set; skipping re-initialization.");
    }
}

fn load_config(path: Option<&Path>, overrides: Vec<(&str, ValueKind)>) -> Result<CorpusConfig> {
    let mut layered = loader(path);
    for (key, value) in overrides {
        layered = layered.set_override(key, value)?;
    }
    Ok(layered.build()?)
}

fn load_profiles(config: &CorpusConfig) -> Result<ProfileRegistry> {
    let mut registry = ProfileRegistry::with_defaults()?;
    registry.load_dir(&config.paths.profiles_dir)?;
    Ok(registry)
}

fn string_override(matches: &ArgMatches, arg: &str, key: &'static str) -> Option<(&'static str, ValueKind)> {
    matches
        .get_one::<String>(arg)
        .map(|value| (key, ValueKind::from(value.as_str())))
}

/// Handle the convert command
fn handle_convert_command(matches: &ArgMatches, config_path: Option<&Path>) -> Result<()> {
    let mut overrides: Vec<(&str, ValueKind)> = Vec::new();
    overrides.extend(string_override(matches, "format", "convert.format"));
    overrides.extend(string_override(matches, "layout", "convert.layout"));
    if matches.get_flag("no-sentences") {
        overrides.push(("convert.sentences", ValueKind::from(false)));
    }
    let config = load_config(config_path, overrides)?;
    let registry = load_profiles(&config)?;

    let input = PathBuf::from(matches.get_one::<String>("input").unwrap());
    let profile = registry.resolve(matches.get_one::<String>("profile").unwrap())?;
    let explicit_format = matches.get_one::<String>("format").cloned();

    let (default_output, default_sentences) =
        default_convert_paths(&input, &config.convert.format, &config);
    let explicit_output = matches.get_one::<String>("output").map(PathBuf::from);
    let sentences = if !config.convert.sentences {
        None
    } else if let Some(path) = matches.get_one::<String>("sentences") {
        Some(PathBuf::from(path))
    } else if let Some(output) = &explicit_output {
        // next to an explicit output
        default_sentences.file_name().map(|name| output.with_file_name(name))
    } else {
        Some(default_sentences)
    };
    let (output, format) = match explicit_output {
        Some(output) => (output, explicit_format),
        None => (default_output, Some(config.convert.format.clone())),
    };

    let mut options = ConvertOptions::new(&output).with_layout(config.convert.layout);
    options.format = format;
    options.sentences = sentences.clone();

    let summary = convert_file(&input, &profile, &options, &FormatRegistry::with_defaults())?;
    println!("Saved {} verses -> {}", summary.records, output.display());
    if let Some(path) = sentences {
        println!("Saved {} sentences -> {}", summary.sentences, path.display());
    }
    if summary.skipped > 0 {
        println!("Skipped {} malformed lines", summary.skipped);
    }
    Ok(())
}

/// Handle the align command
fn handle_align_command(matches: &ArgMatches, config_path: Option<&Path>) -> Result<()> {
    let mut overrides: Vec<(&str, ValueKind)> = Vec::new();
    overrides.extend(string_override(matches, "format", "align.format"));
    overrides.extend(string_override(matches, "left-label", "align.left_label"));
    overrides.extend(string_override(matches, "right-label", "align.right_label"));
    let config = load_config(config_path, overrides)?;

    let mut synonyms = BookSynonyms::with_defaults();
    if let Some(names) = matches.get_many::<String>("profile") {
        let registry = load_profiles(&config)?;
        for name in names {
            synonyms.extend_from_profile(&registry.resolve(name)?);
        }
    }

    let left = PathBuf::from(matches.get_one::<String>("left").unwrap());
    let right = PathBuf::from(matches.get_one::<String>("right").unwrap());
    let (output, format) = match matches.get_one::<String>("output") {
        Some(output) => (PathBuf::from(output), matches.get_one::<String>("format").cloned()),
        None => (
            default_corpus_path(
                &config.align.left_label,
                &config.align.right_label,
                &config.align.format,
                &config,
            ),
            Some(config.align.format.clone()),
        ),
    };

    let options = AlignOptions {
        output: output.clone(),
        format,
        left_label: config.align.left_label.clone(),
        right_label: config.align.right_label.clone(),
    };
    let summary = align_files(&left, &right, &synonyms, &options, &FormatRegistry::with_defaults())?;
    println!(
        "Aligned {} verses ({} left, {} right) -> {}",
        summary.aligned,
        summary.left,
        summary.right,
        output.display()
    );
    Ok(())
}

/// Handle the classify command
fn handle_classify_command(matches: &ArgMatches, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path, Vec::new())?;
    let registry = load_profiles(&config)?;
    let input = PathBuf::from(matches.get_one::<String>("input").unwrap());
    let profile = registry.resolve(matches.get_one::<String>("profile").unwrap())?;

    for line in classify_file(&input, &profile)? {
        println!("{:>5}  {:<16} {}", line.number, line.rule, line.class);
    }
    Ok(())
}

/// Handle the list-profiles command
fn handle_list_profiles_command(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path, Vec::new())?;
    let registry = load_profiles(&config)?;

    println!("Available language profiles:\n");
    for profile in registry.list_all() {
        let layout = match profile.layout {
            SourceLayout::Verses => "verses",
            SourceLayout::Delimited { .. } => "delimited",
            SourceLayout::ChapterVerse => "chapter-verse",
        };
        println!("  {} ({}, {})", profile.name, profile.language, layout);
        if !profile.description.is_empty() {
            println!("    {}", profile.description);
        }
    }
    Ok(())
}
