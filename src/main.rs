use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pmml_tree::config::{Config, OutputFormat, StrategyOverrides};
use pmml_tree::tree::{only_warnings, validate_model};
use pmml_tree::{MissingValueStrategy, NoTrueChildStrategy, Pmml, Record, TreeModel};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

const EXIT_SUCCESS: i32 = 0;
const EXIT_SCORE: i32 = 1;
const EXIT_LOAD: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score one record against a tree model
    Score {
        /// PMML document (defaults to the config's `models` patterns)
        document: Option<PathBuf>,

        /// Model name; may be omitted when only one model is loaded
        #[arg(short, long)]
        model: Option<String>,

        /// Field assignment such as `outlook="sunny"` or `temperature=75`
        #[arg(short = 'f', long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,

        /// JSON file holding a flat object of field values
        #[arg(long, value_name = "FILE")]
        record: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Override the document's missingValueStrategy
        #[arg(long, value_name = "STRATEGY")]
        missing_value_strategy: Option<MissingValueStrategy>,

        /// Override the document's noTrueChildStrategy
        #[arg(long, value_name = "STRATEGY")]
        no_true_child_strategy: Option<NoTrueChildStrategy>,
    },
    /// Summarize every tree model in the given documents
    List {
        /// PMML documents (defaults to the config's `models` patterns)
        documents: Vec<PathBuf>,
    },
    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "pmml-tree")]
#[command(about = "Score records against PMML decision-tree models", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/pmml-tree/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Load the named documents, or the config's glob patterns when none are named.
fn load_documents(documents: &[PathBuf], config: &Config) -> Result<Pmml> {
    let paths = if documents.is_empty() {
        expand_patterns(&config.models)?
    } else {
        documents.to_vec()
    };
    if paths.is_empty() {
        bail!("No PMML document given and no `models` patterns configured");
    }

    let mut registry = Pmml::default();
    for path in &paths {
        let pmml = Pmml::load(path)?;
        debug!(path = %path.display(), models = pmml.len(), "loaded document");
        registry
            .merge(pmml)
            .with_context(|| format!("Failed to merge models from {}", path.display()))?;
    }
    Ok(registry)
}

fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let expanded = expand_home(pattern);
        let entries = glob::glob(&expanded)
            .with_context(|| format!("Invalid models pattern '{}'", pattern))?;
        for entry in entries {
            match entry {
                Ok(path) => paths.push(path),
                Err(e) => warn!(pattern = %pattern, error = %e, "skipping unreadable path"),
            }
        }
    }
    paths.sort();
    paths.dedup();
    Ok(paths)
}

fn expand_home(pattern: &str) -> String {
    match (pattern.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest).to_string_lossy().into_owned(),
        _ => pattern.to_string(),
    }
}

fn select_model<'a>(pmml: &'a Pmml, name: Option<&str>) -> Result<&'a TreeModel> {
    match name {
        Some(name) => pmml.get_by_name(name).with_context(|| {
            format!(
                "No model named '{}' (available: {})",
                name,
                pmml.names().collect::<Vec<_>>().join(", ")
            )
        }),
        None => pmml.single().with_context(|| {
            format!(
                "{} models loaded; pick one with --model ({})",
                pmml.len(),
                pmml.names().collect::<Vec<_>>().join(", ")
            )
        }),
    }
}

fn build_record(fields: &[String], record_path: Option<&Path>) -> Result<Record> {
    let mut record = match record_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read record file at {}", path.display()))?;
            let json: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON in {}", path.display()))?;
            Record::from_json(&json)
                .with_context(|| format!("Invalid record in {}", path.display()))?
        }
        None => Record::new(),
    };
    // Command-line fields win over the file.
    for field in fields {
        record.insert_assignment(field)?;
    }
    Ok(record)
}

/// Print validation findings for a loaded model.
///
/// Returns false when any finding is more than a warning; such a model
/// must not be scored.
fn check_model(key: &str, model: &TreeModel) -> bool {
    let Err(findings) = validate_model(model) else {
        return true;
    };
    let usable = only_warnings(&findings);
    let level = if usable { "warnings" } else { "problems" };
    eprintln!("Model '{}' has {}:", key, level);
    for finding in findings {
        eprintln!("  - {}", finding);
    }
    usable
}

fn main() {
    let cli = Cli::parse();

    let code = match cli.command {
        // Runs before the config is read so a broken file can be replaced.
        Commands::Init { force } => run_init(cli.config, force),
        Commands::List { documents } => match prepare(cli.config, cli.verbose) {
            Ok(config) => run_list(&documents, &config),
            Err(code) => code,
        },
        Commands::Score {
            document,
            model,
            fields,
            record,
            json,
            missing_value_strategy,
            no_true_child_strategy,
        } => match prepare(cli.config, cli.verbose) {
            Ok(config) => {
                let cli_overrides = StrategyOverrides {
                    missing_value: missing_value_strategy,
                    no_true_child: no_true_child_strategy,
                };
                let request = ScoreRequest {
                    document,
                    model,
                    fields,
                    record,
                    json: json || config.output == OutputFormat::Json,
                    overrides: config.strategies.unwrap_or_default().or_from(cli_overrides),
                };
                run_score(request, &config)
            }
            Err(code) => code,
        },
    };

    std::process::exit(code);
}

/// Load and validate the config, then install logging. Errors carry the exit code.
fn prepare(config_path: Option<PathBuf>, verbose: bool) -> Result<Config, i32> {
    let config = match pmml_tree::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            return Err(EXIT_CONFIG);
        }
    };

    if let Err(errors) = pmml_tree::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(EXIT_CONFIG);
    }

    if let Err(e) = pmml_tree::telemetry::init(&config.log_level, verbose) {
        eprintln!("Logging error: {}", e);
        return Err(EXIT_CONFIG);
    }

    Ok(config)
}

fn run_init(config_path: Option<PathBuf>, force: bool) -> i32 {
    let path = match config_path.map_or_else(pmml_tree::config::get_config_path, Ok) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            return EXIT_CONFIG;
        }
    };
    match pmml_tree::config::write_default_config(&path, force) {
        Ok(()) => {
            println!("Wrote default config to {}", path.display());
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            EXIT_CONFIG
        }
    }
}

fn run_list(documents: &[PathBuf], config: &Config) -> i32 {
    let pmml = match load_documents(documents, config) {
        Ok(pmml) => pmml,
        Err(e) => {
            eprintln!("Load error: {:#}", e);
            return EXIT_LOAD;
        }
    };

    let use_colors = pmml_tree::output::should_use_colors();
    let summaries = pmml
        .models()
        .map(|(key, model)| pmml_tree::output::format_model_summary(key, model, use_colors))
        .collect::<Vec<_>>();
    println!("{}", summaries.join("\n\n"));

    let mut usable = true;
    for (key, model) in pmml.models() {
        usable &= check_model(key, model);
    }
    if usable {
        EXIT_SUCCESS
    } else {
        EXIT_LOAD
    }
}

struct ScoreRequest {
    document: Option<PathBuf>,
    model: Option<String>,
    fields: Vec<String>,
    record: Option<PathBuf>,
    json: bool,
    overrides: StrategyOverrides,
}

fn run_score(request: ScoreRequest, config: &Config) -> i32 {
    let start_time = Instant::now();

    let documents: Vec<PathBuf> = request.document.into_iter().collect();
    let pmml = match load_documents(&documents, config) {
        Ok(pmml) => pmml,
        Err(e) => {
            eprintln!("Load error: {:#}", e);
            return EXIT_LOAD;
        }
    };

    let model = match select_model(&pmml, request.model.as_deref()) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("Load error: {:#}", e);
            return EXIT_LOAD;
        }
    };
    if !check_model(model.display_name(), model) {
        return EXIT_LOAD;
    }

    let record = match build_record(&request.fields, request.record.as_deref()) {
        Ok(record) => record,
        Err(e) => {
            eprintln!("Record error: {:#}", e);
            return EXIT_SCORE;
        }
    };

    let strategies = request.overrides.apply(model.strategies());
    debug!(
        model = model.display_name(),
        fields = record.len(),
        missing_value = %strategies.missing_value,
        no_true_child = %strategies.no_true_child,
        "scoring"
    );

    let result = match model.score_with(&record, strategies) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Scoring error: {}", e);
            return EXIT_SCORE;
        }
    };

    if request.json {
        println!("{}", pmml_tree::output::format_result_json(&result));
    } else {
        let use_colors = pmml_tree::output::should_use_colors();
        println!("{}", pmml_tree::output::format_result_text(&result, use_colors));
    }

    info!(
        elapsed = %humantime::format_duration(start_time.elapsed()),
        "scored record"
    );
    EXIT_SUCCESS
}
