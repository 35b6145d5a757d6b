use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use mdchunk_cli::build_chunker;
use mdchunk_cli::collection::{
    annotate_collection, default_output_path, load_collection, write_collection, ChunkAnnotation,
    FieldNames,
};
use mdchunk_cli::config::{FileConfig, Overrides, Settings};
use mdchunk_cli::report::{print_stdout, render_summary};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mdchunk")]
#[command(about = "Split markdown into token-bounded chunks for embedding", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Settings file (JSON or TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// HuggingFace tokenizer.json used to count tokens (overrides MDCHUNK_TOKENIZER)
    #[arg(long, global = true)]
    tokenizer: Option<PathBuf>,

    /// Do not count the model's special tokens
    #[arg(long, global = true)]
    no_special_tokens: bool,

    /// Maximum tokens per chunk
    #[arg(long, global = true)]
    max_tokens: Option<usize>,

    /// Minimum tokens per chunk
    #[arg(long, global = true)]
    min_tokens: Option<usize>,

    /// Heading level documents are first cut at
    #[arg(long, global = true, conflicts_with = "no_headings")]
    top_level: Option<usize>,

    /// Ignore headings and pack paragraphs directly
    #[arg(long, global = true)]
    no_headings: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chunk every document of a JSON collection
    Chunk(ChunkArgs),

    /// Chunk a single markdown file and print the chunks as JSON
    File(FileArgs),
}

#[derive(Args)]
struct ChunkArgs {
    /// JSON array of documents
    input: PathBuf,

    /// Output path (defaults to <input>-chunked.json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Field holding each document's markdown
    #[arg(long)]
    content_field: Option<String>,

    /// Field holding each document's title (used in logs)
    #[arg(long)]
    title_field: Option<String>,

    /// Chunk and report without writing the output file
    #[arg(long)]
    dry_run: bool,

    /// Print the batch summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct FileArgs {
    /// Markdown file
    path: PathBuf,
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();

    // stdout is reserved for JSON in these modes
    let json_output = match &cli.command {
        Commands::Chunk(args) => args.json,
        Commands::File(_) => true,
    };
    if json_output && !cli.verbose {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let file_config = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let mut overrides = Overrides {
        tokenizer: cli.tokenizer.clone(),
        max_tokens: cli.max_tokens,
        min_tokens: cli.min_tokens,
        top_level: cli.top_level,
        no_headings: cli.no_headings,
        no_special_tokens: cli.no_special_tokens,
        ..Overrides::default()
    };

    match cli.command {
        Commands::Chunk(args) => {
            overrides.content_field = args.content_field.clone();
            overrides.title_field = args.title_field.clone();
            let settings = Settings::resolve(file_config, overrides)?;
            run_chunk(args, &settings)
        }
        Commands::File(args) => {
            let settings = Settings::resolve(file_config, overrides)?;
            run_file(args, &settings)
        }
    }
}

/// Chunk a document collection
fn run_chunk(args: ChunkArgs, settings: &Settings) -> Result<()> {
    let chunker = build_chunker(settings)?;
    let fields = FieldNames {
        content: settings.content_field.clone(),
        title: settings.title_field.clone(),
    };

    let mut documents = load_collection(&args.input)?;
    log::info!(
        "Chunking {} documents from {} (max_tokens={})",
        documents.len(),
        args.input.display(),
        chunker.config().max_tokens
    );
    let summary = annotate_collection(&chunker, &mut documents, &fields);

    if args.dry_run {
        log::info!("Dry run, output not written");
    } else {
        let output = args
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&args.input));
        write_collection(&output, &documents)?;
        log::info!("Wrote {}", output.display());
    }

    if args.json {
        print_stdout(&serde_json::to_string_pretty(&summary)?)
    } else {
        print_stdout(&render_summary(&summary))
    }
}

/// Chunk one markdown file
fn run_file(args: FileArgs, settings: &Settings) -> Result<()> {
    let chunker = build_chunker(settings)?;
    let chunked = chunker
        .chunk_file(&args.path)
        .with_context(|| format!("Failed to chunk {}", args.path.display()))?;
    let annotation = ChunkAnnotation::from_document(&chunked);
    print_stdout(&serde_json::to_string_pretty(&annotation)?)
}
