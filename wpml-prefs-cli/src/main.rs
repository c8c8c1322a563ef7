use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use wpml_prefs::{Indent, Processor, DEFAULT_CONFIG_PATH, DEFAULT_TARGET_PATH};

/// WPML Preferences
/// Adds wpml_cf_preferences to ACF field groups based on wpml-config.xml
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output for detailed processing information
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add wpml_cf_preferences to every mapped field in the field groups file
    AddPreferences {
        /// Path to the WPML config listing custom-field actions
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, value_name = "PATH TO WPML CONFIG")]
        config: PathBuf,

        /// Path to the ACF field groups PHP file to patch
        #[arg(short, long, default_value = DEFAULT_TARGET_PATH, value_name = "PATH TO FIELD GROUPS")]
        target: PathBuf,

        /// Indent new lines like the 'name' line instead of with three tabs
        #[arg(long)]
        match_indent: bool,

        /// Report what would change without writing the file
        #[arg(long)]
        dry_run: bool,
    },
    /// Remove consecutive duplicate wpml_cf_preferences lines
    FixDuplicates {
        /// Path to the ACF field groups PHP file to clean
        #[arg(short, long, default_value = DEFAULT_TARGET_PATH, value_name = "PATH TO FIELD GROUPS")]
        target: PathBuf,

        /// Report what would change without writing the file
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the field mapping built from the WPML config
    Mapping {
        /// Path to the WPML config listing custom-field actions
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, value_name = "PATH TO WPML CONFIG")]
        config: PathBuf,

        /// Print the mapping as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with appropriate level
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::AddPreferences {
            config,
            target,
            match_indent,
            dry_run,
        } => add_preferences_command(config, target, match_indent, dry_run).await,
        Commands::FixDuplicates { target, dry_run } => {
            fix_duplicates_command(target, dry_run).await
        }
        Commands::Mapping { config, json } => mapping_command(config, json).await,
    }
}

async fn add_preferences_command(
    config: PathBuf,
    target: PathBuf,
    match_indent: bool,
    dry_run: bool,
) -> Result<()> {
    let indent = if match_indent {
        Indent::MatchName
    } else {
        Indent::default()
    };
    let processor = Processor::builder()
        .config_path(config)
        .target_path(target)
        .indent(indent)
        .dry_run(dry_run)
        .build();

    let report = processor.add_preferences().await.with_context(|| {
        format!(
            "Failed to add preferences to {}",
            processor.target_path().display()
        )
    })?;

    println!("=== WPML Field Mapping ===");
    for entry in &report.listing {
        println!("{}", entry);
    }
    println!("\nTotal fields mapped: {}", report.listing.len());

    println!("\n=== Modification Summary ===");
    for field in &report.injected {
        info!("{} => {} ({})", field.name, field.preference.code(), field.preference);
    }
    println!("Fields modified: {}", report.modified_count());

    if report.written {
        println!("\nFile updated successfully!");
        println!("Please review the changes and test in WPML.");
    } else {
        println!("\nDry run: {} was not modified.", processor.target_path().display());
    }
    Ok(())
}

async fn fix_duplicates_command(target: PathBuf, dry_run: bool) -> Result<()> {
    let processor = Processor::builder()
        .target_path(target)
        .dry_run(dry_run)
        .build();

    let report = processor.remove_duplicates().await.with_context(|| {
        format!(
            "Failed to remove duplicates from {}",
            processor.target_path().display()
        )
    })?;

    for line in &report.removed {
        println!("Removing duplicate: {}", line.text);
    }
    println!("\nDuplicates removed: {}", report.removed_count());

    if report.written {
        println!("Removed duplicate wpml_cf_preferences entries!");
    } else {
        println!("Dry run: {} was not modified.", processor.target_path().display());
    }
    Ok(())
}

async fn mapping_command(config: PathBuf, json: bool) -> Result<()> {
    let processor = Processor::builder().config_path(config).build();
    let (table, _) = processor.load_table().await.with_context(|| {
        format!(
            "Failed to load WPML config: {}",
            processor.config_path().display()
        )
    })?;

    if json {
        println!("{}", table.to_json().context("Failed to serialize mapping")?);
        return Ok(());
    }

    for entry in table.sorted() {
        println!("{}", entry);
    }
    println!("\nTotal fields mapped: {}", table.len());
    Ok(())
}
