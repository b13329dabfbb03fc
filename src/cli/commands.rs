//! CLI command handlers

use anyhow::{Context, Result};
use clap_complete::generate;
use colored::Colorize;
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::debug;

use playlist_converter::config::Settings;
use playlist_converter::server;
use playlist_converter::utils::output_filename;
use playlist_converter::{ConvertOptions, convert_with};

/// Path argument standing for stdin or stdout
const STDIO: &str = "-";

/// Handle the `convert` command
pub async fn convert(input: PathBuf, output: Option<PathBuf>, settings: &Settings) -> Result<()> {
    let options = settings.convert_options();

    if is_stdio(&input) {
        let mut bytes = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut bytes)
            .await
            .context("Failed to read JSPF from stdin")?;

        let xspf = convert_with(&bytes, &options).context("Failed to convert stdin")?;
        match output.filter(|path| !is_stdio(path)) {
            Some(path) => write_output(&path, &xspf).await?,
            None => write_stdout(&xspf).await?,
        }
        return Ok(());
    }

    match output {
        Some(path) if is_stdio(&path) => {
            let xspf = convert_path(&input, &options).await?;
            write_stdout(&xspf).await?;
        }
        output => {
            let path = output.unwrap_or_else(|| default_output_path(&input));
            convert_file(&input, &path, &options).await?;
        }
    }

    Ok(())
}

/// Convert one file on disk into another
///
/// The output file is only written once the conversion has succeeded, and
/// never when it is the input file itself.
pub async fn convert_file(input: &Path, output: &Path, options: &ConvertOptions) -> Result<()> {
    if same_file(input, output).await {
        anyhow::bail!(
            "Output {} would overwrite the input; pass -o to choose another path",
            output.display()
        );
    }

    let xspf = convert_path(input, options).await?;
    write_output(output, &xspf).await
}

async fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (tokio::fs::canonicalize(a).await, tokio::fs::canonicalize(b).await) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

async fn convert_path(input: &Path, options: &ConvertOptions) -> Result<Vec<u8>> {
    let bytes = tokio::fs::read(input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;
    debug!("Read {} bytes from {}", bytes.len(), input.display());

    convert_with(&bytes, options).with_context(|| format!("Failed to convert {}", input.display()))
}

async fn write_output(path: &Path, xspf: &[u8]) -> Result<()> {
    tokio::fs::write(path, xspf)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    eprintln!("{} {}", "Wrote XSPF to".green(), path.display());
    Ok(())
}

async fn write_stdout(xspf: &[u8]) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(xspf)
        .await
        .context("Failed to write XSPF to stdout")?;
    stdout.flush().await.context("Failed to flush stdout")?;
    Ok(())
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == STDIO
}

/// `<dir>/<stem>.xspf` for an input at `<dir>/<stem>.<ext>`
pub fn default_output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    input.with_file_name(output_filename(&name))
}

/// Handle the `serve` command
pub async fn serve(settings: &Settings) -> Result<()> {
    println!(
        "{} {}",
        "Starting playlist converter on".cyan(),
        format!("http://{}", settings.bind_address).bold()
    );
    server::serve(settings).await
}

/// Handle the `config` command
pub fn config(settings: &Settings, init: bool) -> Result<()> {
    let path = Settings::config_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    if init {
        if path.exists() {
            println!("{}", "Settings file already exists, leaving it untouched.".yellow());
        } else {
            settings.save_to(&path)?;
            println!("{} {}", "Wrote settings to".green(), path.display());
        }
        println!();
    }

    println!("{}", "Settings".green().bold());
    println!("  File:                {}", path.display());
    println!("  Missing locations:   {:?}", settings.missing_location);
    println!("  Bind address:        {}", settings.bind_address);
    println!("  Upload limit:        {} MiB", settings.max_upload_mb);

    Ok(())
}

/// Handle the `completion` command
pub fn completion(shell: clap_complete::Shell) {
    let mut cmd = super::Cli::command();
    generate(shell, &mut cmd, "playlist-converter", &mut io::stdout());
}

// Extension trait for Cli to get clap Command
impl super::Cli {
    fn command() -> clap::Command {
        <Self as clap::CommandFactory>::command()
    }
}
