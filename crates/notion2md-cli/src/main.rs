//! notion2md: CLI tool to render Notion pages as Hugo Markdown content

mod config;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use notion_blocks::Document;
use notion2md_core::{
    Archetype, Collaborators, ImageStore, LogDiagnostics, MetadataScraper, Offline, generate_with,
};
use notion2md_fetch::{HttpImageStore, NotionClient, OpenGraphScraper};

use config::{CONFIG_FILE_NAME, Config};

#[derive(Parser, Debug)]
#[command(name = "notion2md")]
#[command(about = "Render Notion pages as Hugo Markdown content")]
#[command(version)]
#[command(after_help = "Examples:
  notion2md render 5983378...               # Render a page into the content folder
  notion2md render 5983378... -o post.md    # Render to a specific file
  notion2md fetch 5983378... -o page.json   # Save a page for offline rendering
  notion2md render --input page.json        # Render a saved page
  notion2md init                            # Write a sample notion2md.toml")]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Quiet mode - only show warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a page to a Markdown content file
    Render(RenderArgs),
    /// Save a page and its block tree as JSON
    Fetch(FetchArgs),
    /// Write a sample configuration file
    Init(InitArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Page ID (not needed with --input)
    #[arg(required_unless_present = "input")]
    page_id: Option<String>,

    /// Render a page saved with `notion2md fetch` instead of calling the API
    #[arg(short, long, conflicts_with = "page_id")]
    input: Option<PathBuf>,

    /// Output file (default: <content_folder>/<title slug>.md)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file (default: ./notion2md.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render callouts and bookmarks as Hugo shortcodes
    #[arg(long, overrides_with = "no_shortcodes")]
    shortcodes: bool,

    /// Disable Hugo shortcodes
    #[arg(long, overrides_with = "shortcodes")]
    no_shortcodes: bool,

    /// Keep remote image URLs and skip bookmark metadata
    #[arg(long)]
    offline: bool,

    #[command(flatten)]
    auth: AuthArgs,
}

impl RenderArgs {
    fn shortcodes(&self) -> Option<bool> {
        match (self.shortcodes, self.no_shortcodes) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// Page ID
    page_id: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    auth: AuthArgs,
}

#[derive(Args, Debug)]
struct InitArgs {
    /// Output file (default: ./notion2md.toml, or stdout with --schema)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the JSON schema of the configuration file instead
    #[arg(long)]
    schema: bool,

    /// Overwrite an existing file
    #[arg(short, long)]
    force: bool,
}

#[derive(Args, Debug)]
struct AuthArgs {
    /// Integration token
    #[arg(long, env = "NOTION_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

impl AuthArgs {
    fn client(&self) -> Result<NotionClient> {
        let token = self
            .token
            .as_deref()
            .context("No integration token: pass --token or set NOTION_TOKEN")?;
        Ok(NotionClient::new(token)?)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet);

    match cli.command {
        Command::Render(args) => render(&args, cli.quiet),
        Command::Fetch(args) => fetch(&args),
        Command::Init(args) => init(&args),
    }
}

/// Log to stderr; `RUST_LOG` takes precedence over the flags
fn init_logger(verbose: bool, quiet: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else if quiet {
        log::LevelFilter::Warn
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .parse_default_env()
        .init();
}

/// Render a page to a content file
fn render(args: &RenderArgs, quiet: bool) -> Result<()> {
    let (config, base_dir) = load_config(args.config.as_deref())?;
    let mut render_config = config.render_config(&base_dir);
    if let Some(use_shortcodes) = args.shortcodes() {
        render_config.use_shortcodes = use_shortcodes;
    }

    // A broken archetype should fail before anything is fetched
    let archetype = Archetype::load(&render_config.archetype_file)?;

    let document = match (&args.input, &args.page_id) {
        (Some(input), _) => read_document(input)?,
        (None, Some(page_id)) => args.auth.client()?.document(page_id)?,
        (None, None) => anyhow::bail!("Either a page ID or --input is required"),
    };

    let output_path = match &args.output {
        Some(path) => path.clone(),
        None => config
            .content_folder(&base_dir)
            .join(format!("{}.md", file_stem(&document))),
    };

    let (mut images, mut scraper): (Box<dyn ImageStore>, Box<dyn MetadataScraper>) =
        if args.offline {
            (Box::new(Offline), Box::new(Offline))
        } else {
            (
                Box::new(HttpImageStore::from_config(&render_config)?),
                Box::new(OpenGraphScraper::new()?),
            )
        };
    let mut diagnostics = LogDiagnostics;
    let mut collaborators =
        Collaborators::new(images.as_mut(), scraper.as_mut(), &mut diagnostics);

    let mut buffer = Vec::new();
    generate_with(
        &archetype,
        &mut buffer,
        &document,
        &render_config,
        &mut collaborators,
    )?;

    write_output(&output_path, &buffer)?;
    log::debug!("Rendered page {} to {}", document.page.id, output_path.display());

    if !quiet {
        println!("{}", output_path.display());
    }

    Ok(())
}

/// Save a page with its block tree
fn fetch(args: &FetchArgs) -> Result<()> {
    let document = args.auth.client()?.document(&args.page_id)?;
    let json = document
        .to_json_pretty()
        .context("Failed to serialize document")?;

    match &args.output {
        Some(path) => write_output(path, json.as_bytes())?,
        None => println!("{}", json),
    }

    Ok(())
}

/// Write a sample configuration or print the schema
fn init(args: &InitArgs) -> Result<()> {
    let content = if args.schema {
        Config::json_schema_string()?
    } else {
        Config::sample().to_toml_with_schema()?
    };

    let output = match &args.output {
        Some(path) => path.clone(),
        None if args.schema => {
            println!("{}", content);
            return Ok(());
        }
        None => PathBuf::from(CONFIG_FILE_NAME),
    };

    if output.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            output.display()
        );
    }

    write_output(&output, content.as_bytes())?;
    log::info!("Wrote {}", output.display());

    Ok(())
}

/// Load the configuration and the directory its relative paths refer to
fn load_config(path: Option<&Path>) -> Result<(Config, PathBuf)> {
    match path {
        Some(path) => {
            let config = Config::load(path)?;
            let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            Ok((config, base_dir))
        }
        None => {
            let config = Config::load_from_dir(Path::new("."))?.unwrap_or_default();
            Ok((config, PathBuf::new()))
        }
    }
}

fn read_document(path: &Path) -> Result<Document> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read: {}", path.display()))?;
    Document::from_json(&json).with_context(|| format!("Failed to parse: {}", path.display()))
}

/// File name for a page: its title slug, or its ID for untitled pages
fn file_stem(document: &Document) -> String {
    let title = notion_blocks::plain_text(&document.page.title());
    let stem = slug::slugify(title);
    if stem.is_empty() {
        document.page.id.clone()
    } else {
        stem
    }
}

fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write: {}", path.display()))
}
