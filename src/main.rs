//! # Popsheet CLI
//!
//! Command-line interface for rendering pop sheets and managing the badge
//! catalog.
//!
//! ## Usage
//!
//! ```bash
//! # Render a page description to PNG at 300 DPI
//! popsheet render page.json -o page.png
//!
//! # Lower resolution, override the paper size
//! popsheet render page.json -o proof.png --dpi 96 --paper letter
//!
//! # Manage the badge catalog
//! popsheet badges list
//! popsheet badges add sale.json
//! popsheet badges remove 5f0c...
//!
//! # Classify a Discogs link
//! popsheet discogs https://www.discogs.com/release/249504-Nirvana-Nevermind
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use popsheet::{
    PopsheetError,
    badge::{BadgeStore, CatalogError, CustomBadgeInput, FileStorage},
    discogs,
    render::{CardCompositor, render_page},
    sheet::{DEFAULT_DPI, PageDescriptor, PaperSize, RenderSettings},
};

/// Popsheet - printable pop sheet renderer
#[derive(Parser, Debug)]
#[command(name = "popsheet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Badge catalog directory (defaults to the user data directory)
    #[arg(long, global = true, value_name = "DIR")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a page description (JSON) to PNG
    Render {
        /// Page description file
        page: PathBuf,

        /// Output PNG file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Output resolution in dots per inch
        #[arg(long, default_value_t = DEFAULT_DPI)]
        dpi: u32,

        /// Display scale (reported only, does not change pixels)
        #[arg(long, default_value_t = 1.0)]
        scale: f64,

        /// Override the page size (a3, a4, a5, letter, or WxH in mm)
        #[arg(long)]
        paper: Option<String>,
    },

    /// Manage the custom badge catalog
    Badges {
        #[command(subcommand)]
        action: BadgeAction,
    },

    /// Classify a Discogs URL and print it as JSON
    Discogs {
        /// URL to classify
        url: String,
    },
}

#[derive(Subcommand, Debug)]
enum BadgeAction {
    /// List badges in creation order
    List,

    /// Print one badge as JSON
    Show { id: String },

    /// Create a badge from a JSON input file
    Add { input: PathBuf },

    /// Replace all fields of a badge from a JSON input file
    Update { id: String, input: PathBuf },

    /// Delete a badge
    Remove { id: String },

    /// Delete every badge
    Clear,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<(), PopsheetError> {
    let storage = match &cli.catalog {
        Some(dir) => FileStorage::new(dir),
        None => FileStorage::default_location(),
    };
    let store = BadgeStore::new(storage);

    match cli.command {
        Commands::Render {
            page,
            output,
            dpi,
            scale,
            paper,
        } => {
            if dpi == 0 {
                return Err(PopsheetError::InvalidArgument("--dpi must be positive".into()));
            }
            if !(scale.is_finite() && scale > 0.0) {
                return Err(PopsheetError::InvalidArgument(
                    "--scale must be a positive number".into(),
                ));
            }

            let mut descriptor: PageDescriptor = read_json(&page)?;
            if let Some(paper) = paper {
                let size = PaperSize::parse(&paper).map_err(PopsheetError::InvalidArgument)?;
                descriptor.dimensions = size.into();
            }

            let settings = RenderSettings::new(dpi, scale);
            let mut compositor = CardCompositor::new(dpi).with_badges(store.get_all());
            let rendered = render_page(&descriptor, &settings, &mut compositor)?;
            rendered.save_png(&output)?;

            println!(
                "Wrote {} ({}x{} px at {} DPI, display {:.0}x{:.0})",
                output.display(),
                rendered.width(),
                rendered.height(),
                rendered.dpi,
                rendered.display.width,
                rendered.display.height
            );
        }

        Commands::Badges { action } => run_badges(&store, action)?,

        Commands::Discogs { url } => {
            let classified = discogs::classify(&url);
            let json = serde_json::json!({
                "type": classified.as_ref().map(|r| r.kind),
                "id": classified.as_ref().map(|r| r.id.as_str()),
            });
            println!("{}", json);
        }
    }

    Ok(())
}

fn run_badges(store: &BadgeStore<FileStorage>, action: BadgeAction) -> Result<(), PopsheetError> {
    match action {
        BadgeAction::List => {
            let badges = store.get_all();
            if badges.is_empty() {
                println!("No badges.");
            }
            for badge in badges {
                let kind = serde_json::to_value(badge.kind)?;
                println!(
                    "{}  {:<20}  {}",
                    badge.id,
                    badge.name,
                    kind.as_str().unwrap_or_default()
                );
            }
        }
        BadgeAction::Show { id } => {
            let badge = store
                .get_by_id(&id)
                .ok_or(CatalogError::NotFound(id))?;
            println!("{}", serde_json::to_string_pretty(&badge)?);
        }
        BadgeAction::Add { input } => {
            let input: CustomBadgeInput = read_json(&input)?;
            let badge = store.create(input)?;
            println!("{}", serde_json::to_string_pretty(&badge)?);
        }
        BadgeAction::Update { id, input } => {
            let input: CustomBadgeInput = read_json(&input)?;
            let badge = store.update(&id, input)?;
            println!("{}", serde_json::to_string_pretty(&badge)?);
        }
        BadgeAction::Remove { id } => {
            store.delete(&id)?;
            println!("Removed {}", id);
        }
        BadgeAction::Clear => {
            store.clear_all()?;
            println!("Catalog cleared.");
        }
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, PopsheetError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
