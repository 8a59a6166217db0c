use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use arc_consolidate::parser::perks::segment_perks;
use arc_consolidate::parser::recipe::parse_recipe_cell;
use arc_consolidate::parser::slot::classify_slot;
use arc_consolidate::parser::tier::extract_tier;
use arc_consolidate::{
    pipeline, DocumentSink, ImageLookup, JsonDirSource, JsonFileSink, Settings, SourceKind,
    SourceProvider, Summary,
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "arc_consolidate", about = "Consolidate scraped wiki data into one game-data document")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RunArgs {
    /// Directory holding the *_data.json scrapes and images.json
    #[arg(short, long, default_value = ".")]
    input: PathBuf,
    /// Settings file (TOML); ARC_* environment variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Date stamped on the document (default: settings, then today)
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the consolidated document and write it
    Build {
        #[command(flatten)]
        run: RunArgs,
        /// Output file
        #[arg(short, long, default_value = "game_data.json")]
        output: PathBuf,
    },
    /// Run the pipeline and print the summary without writing
    Check {
        #[command(flatten)]
        run: RunArgs,
    },
    /// Classify a modification's slot
    Classify {
        name: String,
        /// Explicit slot tag from the infobox
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// Extract the tier from a label ("Kettle III")
    Tier { label: String },
    /// Split a concatenated perk cell
    Perks { text: String },
    /// Parse a recipe cell ("2x Metal Parts\n3x Wires")
    Recipe { text: String },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build { run, output } => {
            let (out, settings) = consolidate(&run)?;
            let sink = JsonFileSink::new(&output);
            sink.store(&out.data)?;
            print_summary(&out.summary);
            println!(
                "Wrote {} (version {}, {})",
                sink.path().display(),
                settings.version,
                out.data.last_updated
            );
            Ok(())
        }
        Commands::Check { run } => {
            let (out, _) = consolidate(&run)?;
            print_summary(&out.summary);
            Ok(())
        }
        Commands::Classify { name, tag } => {
            let settings = Settings::load(None)?;
            println!("{}", classify_slot(&name, tag.as_deref(), &settings.slot_rewrites));
            Ok(())
        }
        Commands::Tier { label } => {
            match extract_tier(&label) {
                Some(tier) => println!("{}", tier),
                None => println!("no tier"),
            }
            Ok(())
        }
        Commands::Perks { text } => {
            for perk in segment_perks(&unescape_newlines(&text)) {
                println!("{}", perk);
            }
            Ok(())
        }
        Commands::Recipe { text } => {
            let materials = parse_recipe_cell(&unescape_newlines(&text));
            if materials.is_empty() {
                println!("no materials");
            }
            for m in materials {
                println!("{:>4} x {}", m.quantity, m.material);
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn consolidate(args: &RunArgs) -> anyhow::Result<(pipeline::Consolidated, Settings)> {
    let settings = Settings::load(args.config.as_deref())
        .with_context(|| "loading settings")?;
    let date = args
        .date
        .or(settings.last_updated)
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let source = Tracked::new(JsonDirSource::new(&args.input));
    let out = pipeline::run(&source, &settings, date)
        .with_context(|| format!("consolidating {}", args.input.display()))?;
    source.pb.finish_and_clear();
    Ok((out, settings))
}

/// Ticks a progress bar as each source document is loaded.
struct Tracked<P> {
    inner: P,
    pb: ProgressBar,
}

impl<P> Tracked<P> {
    fn new(inner: P) -> Self {
        let pb = ProgressBar::new(SourceKind::ALL.len() as u64 + 1);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Tracked { inner, pb }
    }
}

impl<P: SourceProvider> SourceProvider for Tracked<P> {
    fn load(&self, kind: SourceKind) -> arc_consolidate::Result<Value> {
        self.pb.set_message(kind.to_string());
        let doc = self.inner.load(kind);
        self.pb.inc(1);
        doc
    }

    fn images(&self) -> arc_consolidate::Result<ImageLookup> {
        self.pb.set_message("images");
        let images = self.inner.images();
        self.pb.inc(1);
        images
    }
}

fn print_summary(s: &Summary) {
    println!("{:<16} {:>6}", "Category", "Items");
    println!("{}", "-".repeat(23));
    for (category, count) in &s.kept {
        println!("{:<16} {:>6}", category, count);
    }
    println!("{}", "-".repeat(23));
    println!("{:<16} {:>6}", "Total", s.total_kept());
    println!();
    println!("Filtered:          {}", s.filtered);
    println!("Inventory-only:    {}", s.inventory_only);
    println!("Unnamed:           {}", s.unnamed);
    println!("Duplicates:        {}", s.duplicates);
    println!("Self-referential:  {}", s.self_referential);
    println!("Empty recipes:     {}", s.empty_recipes);
    println!("Unresolved refs:   {}", s.unresolved_weapon_refs);
}

/// Shells make embedded newlines awkward, so a literal `\n` works too.
fn unescape_newlines(s: &str) -> String {
    s.replace("\\n", "\n")
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
