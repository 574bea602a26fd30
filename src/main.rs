//! # commpack CLI
//!
//! Command-line interface for the commpack library.

use std::path::Path;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;

use commpack::CommpackError;
use commpack::cli::{Args, Command};
use commpack::config::{MailboxConfig, VoiceConfig};
use commpack::core::{Sidecars, export_mbox, export_voice, mbox_export_path};
use commpack::logging::init_logging;

fn main() {
    init_logging();
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), CommpackError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();

    println!("📦 commpack v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📖 Source:  {}", args.command.kind());

    match args.command {
        Command::Voice { input, output } => run_voice(&input, output.as_deref())?,
        Command::Mbox { path } => run_mbox(&path)?,
    }

    println!();
    println!("⚡ Total time:  {:.2}s", total_start.elapsed().as_secs_f64());
    Ok(())
}

fn run_voice(input: &Path, output: Option<&Path>) -> Result<(), CommpackError> {
    let config = VoiceConfig::default();
    let output_dir = output.unwrap_or(input);

    println!("📂 Input:   {}", input.display());
    println!("💾 Output:  {}", output_dir.join(&config.output_file_name).display());
    println!();
    println!("⏳ Parsing takeout documents...");

    let summary = export_voice(input, output, &config)?;

    println!();
    println!("✅ Done! Output saved to {}", summary.export_path.display());
    println!();
    println!("📊 Summary:");
    println!("   Records:          {}", summary.records);
    println!("   Skipped files:    {}", summary.skipped_files);
    println!("   Skipped entries:  {}", summary.skipped_entries);
    Ok(())
}

fn run_mbox(path: &Path) -> Result<(), CommpackError> {
    // A missing .env is fine; the process environment still applies.
    dotenv::dotenv().ok();

    let config = MailboxConfig::from_env()?;
    let sidecars = Sidecars::load(Path::new("."));

    println!("📂 Input:   {}", path.display());
    println!("💾 Output:  {}", mbox_export_path(path).display());
    println!("📄 Columns: {}", config.headers().join(", "));
    println!();
    println!("⏳ Converting messages...");

    let summary = export_mbox(path, &config, &sidecars)?;

    println!();
    println!("{summary}");
    Ok(())
}
