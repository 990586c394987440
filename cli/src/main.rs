//! pdfscope CLI - PDF outline extraction and persona-driven section ranking

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfscope::render::{self, ANALYSIS_OUTPUT_NAME};
use pdfscope::{
    is_pdf_path, AnalysisConfig, AnalysisResult, DocumentSource, Error, HashingEmbedder,
    JsonFormat, LevelPolicy, PersonaAnalyzer, StructureOptions,
};

#[derive(Parser)]
#[command(name = "pdfscope")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract PDF outlines and rank sections for a persona", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract title and heading outline of each PDF
    #[command(alias = "outline")]
    Structure {
        /// PDF files or directories containing PDFs
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "output")]
        output: PathBuf,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Use fixed font-size thresholds instead of per-document tiers
        #[arg(long)]
        absolute_levels: bool,

        /// Remove leading numbering from heading text
        #[arg(long)]
        strip_numbering: bool,

        /// Drop page labels, captions and links from the outline
        #[arg(long)]
        skip_noise: bool,

        /// Order headings by importance instead of reading order
        #[arg(long)]
        sort_by_importance: bool,
    },

    /// Rank sections across PDFs for a persona and job
    Analyze {
        /// PDF files or directories containing PDFs
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// Persona config file ({"persona": ..., "job_to_be_done": ...})
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Persona (overrides the config file)
        #[arg(long, env = "PDFSCOPE_PERSONA")]
        persona: Option<String>,

        /// Job to be done (overrides the config file)
        #[arg(long, env = "PDFSCOPE_JOB")]
        job: Option<String>,

        /// Maximum number of ranked sections
        #[arg(long)]
        top_k: Option<usize>,

        /// Minimum similarity for a section to be kept
        #[arg(long)]
        threshold: Option<f32>,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "output")]
        output: PathBuf,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Structure {
            inputs,
            output,
            compact,
            absolute_levels,
            strip_numbering,
            skip_noise,
            sort_by_importance,
        } => {
            let policy = if absolute_levels {
                LevelPolicy::Absolute
            } else {
                LevelPolicy::Tiered
            };
            let options = StructureOptions::new()
                .with_level_policy(policy)
                .with_strip_numbering(strip_numbering)
                .with_skip_noise(skip_noise)
                .with_sort_by_importance(sort_by_importance);
            cmd_structure(&inputs, &output, json_format(compact), &options)
        }
        Commands::Analyze {
            inputs,
            config,
            persona,
            job,
            top_k,
            threshold,
            output,
            compact,
        } => load_config(config.as_deref(), persona, job, top_k, threshold)
            .and_then(|config| cmd_analyze(&inputs, &output, json_format(compact), &config)),
        Commands::Info { input, json } => cmd_info(&input, json),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

/// Expand directories to the PDFs they contain (sorted); files pass through.
fn collect_inputs(inputs: &[PathBuf]) -> CliResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = fs::read_dir(input)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| is_pdf_path(p))
                .collect();
            found.sort();
            if found.is_empty() {
                log::warn!("No PDF files in {}", input.display());
            }
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }

    if files.is_empty() {
        return Err("no PDF files to process".into());
    }
    Ok(files)
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap(),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn cmd_structure(
    inputs: &[PathBuf],
    output: &Path,
    format: JsonFormat,
    options: &StructureOptions,
) -> CliResult<()> {
    let files = collect_inputs(inputs)?;
    fs::create_dir_all(output)?;

    let pb = spinner("Extracting outlines...");
    let entries = pdfscope::extract_structure_batch(&files, options);
    pb.finish_and_clear();

    println!("{}", "Structure Extraction".cyan().bold());
    println!("{}", "─".repeat(60).dimmed());

    let mut succeeded = 0;
    for entry in &entries {
        let target = render::structure_output_path(output, &entry.path);
        render::write_json(&entry.outline, &target, format)?;

        let elapsed = format!("{:.2}s", entry.elapsed.as_secs_f64()).dimmed();
        if entry.is_success() {
            succeeded += 1;
            println!(
                "{} {} {} headings, \"{}\" {}",
                "✓".green(),
                entry.file_name.bold(),
                entry.outline.sections.len(),
                entry.outline.title,
                elapsed
            );
        } else {
            println!(
                "{} {} {} {}",
                "✗".red(),
                entry.file_name.bold(),
                entry.error().unwrap_or("unknown error").red(),
                elapsed
            );
        }
    }

    println!("{}", "─".repeat(60).dimmed());
    println!(
        "{} {}/{} documents, written to {}",
        "Done!".green().bold(),
        succeeded,
        entries.len(),
        output.display()
    );

    if succeeded == 0 {
        return Err("no document could be processed".into());
    }
    Ok(())
}

fn load_config(
    path: Option<&Path>,
    persona: Option<String>,
    job: Option<String>,
    top_k: Option<usize>,
    threshold: Option<f32>,
) -> CliResult<AnalysisConfig> {
    let mut config = match path {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };

    if let Some(persona) = persona {
        config.persona = persona;
    }
    if let Some(job) = job {
        config.job_to_be_done = job;
    }
    if let Some(top_k) = top_k {
        config.top_k = top_k;
    }
    if let Some(threshold) = threshold {
        config.relevance_threshold = threshold;
    }

    config.validate()?;
    Ok(config)
}

fn cmd_analyze(
    inputs: &[PathBuf],
    output: &Path,
    format: JsonFormat,
    config: &AnalysisConfig,
) -> CliResult<()> {
    let files = collect_inputs(inputs)?;
    let target = output.join(ANALYSIS_OUTPUT_NAME);

    let pb = spinner("Analyzing documents...");
    let analyzer = PersonaAnalyzer::new(HashingEmbedder::new());
    let outcome = analyzer.analyze_paths(&files, config);
    pb.finish_and_clear();

    let result = match outcome {
        Ok(result) => result,
        Err(e @ Error::EmbeddingService(_)) => {
            let names: Vec<String> = files.iter().map(|f| file_name(f)).collect();
            let failed = AnalysisResult::failed(
                &names,
                &config.persona,
                &config.job_to_be_done,
                e.to_string(),
            );
            render::write_json(&failed, &target, format)?;
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    render::write_json(&result, &target, format)?;

    println!("{}", "Persona Analysis".cyan().bold());
    println!("{}", "─".repeat(60).dimmed());
    println!("{}: {}", "Persona".bold(), config.persona);
    println!("{}: {}", "Job".bold(), config.job_to_be_done);
    println!("{}: {}", "Documents".bold(), files.len());
    println!();

    if result.extracted_sections.is_empty() {
        println!("{}", "No section passed the relevance threshold".yellow());
    }
    for section in &result.extracted_sections {
        println!(
            "{:>3}. {} {}",
            section.importance_rank,
            section.section_title.bold(),
            format!("({}, p. {})", section.document, section.page_number).dimmed()
        );
    }
    for skipped in &result.skipped_documents {
        println!(
            "{} {}: {}",
            "Skipped".yellow(),
            skipped.document,
            skipped.reason
        );
    }

    println!("\n{} {}", "Saved to".green(), target.display());
    Ok(())
}

fn cmd_info(input: &Path, json: bool) -> CliResult<()> {
    let doc = pdfscope::open(input)?;
    let info = doc.info();

    if json {
        println!("{}", serde_json::to_string_pretty(info)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), info.pdf_version);
    println!("{}: {}", "Pages".bold(), doc.page_count());

    if let Some(ref title) = info.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = info.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref subject) = info.subject {
        println!("{}: {}", "Subject".bold(), subject);
    }
    if let Some(ref keywords) = info.keywords {
        println!("{}: {}", "Keywords".bold(), keywords);
    }
    if let Some(ref creator) = info.creator {
        println!("{}: {}", "Creator".bold(), creator);
    }
    if let Some(ref producer) = info.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }
    if let Some(ref created) = info.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = info.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfscope".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF outline extraction and persona-driven section ranking");
    println!();
    println!("License: MIT");
}
