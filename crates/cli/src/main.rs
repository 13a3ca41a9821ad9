use anyhow::{Context, Result};
use arboard::Clipboard;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use leafscan_core::{config::Config, init, LeafScan, PredictionResult};
use std::path::PathBuf;
use std::time::Duration;
use termimad::crossterm::style::Color;
use termimad::MadSkin;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Leaf photo to analyze; omit to open the desktop window
    image: Option<PathBuf>,

    /// Analyze an image by URL instead of a local file
    #[arg(short, long, conflicts_with = "image")]
    url: Option<String>,

    /// Override the server URL defined in .env
    #[arg(short, long)]
    server: Option<String>,

    /// Copy the report to clipboard automatically
    #[arg(short, long, default_value_t = false)]
    copy: bool,

    /// Check whether the server is reachable and exit
    #[arg(long)]
    check_server: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup
    let _ = dotenvy::dotenv();
    init();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();

    // Load config and override server if specified via CLI
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(server) = &args.server {
        config = Config::builder()
            .with_server_url(server)
            .with_timeout_secs(config.timeout_secs)
            .build()
            .context("Invalid --server URL")?;
    }

    let app = LeafScan::with_config(config);

    // Handle --check-server
    if args.check_server {
        if app.check_server().await? {
            println!("Server at {} is reachable", app.config().server_url);
            return Ok(());
        }
        eprintln!("Server at {} is not reachable", app.config().server_url);
        std::process::exit(1);
    }

    // Headless analysis when an input was given, GUI otherwise
    let outcome = match (&args.image, &args.url) {
        (Some(path), _) => analyze_with_spinner(&app, Input::File(path.clone())).await,
        (None, Some(url)) => analyze_with_spinner(&app, Input::Url(url.clone())).await,
        (None, None) => return app.run_interactive().map_err(Into::into),
    };

    match outcome {
        Ok(result) => {
            let report = render_report(&result);
            print_markdown(&report);

            // Copy to clipboard if requested
            if args.copy {
                match Clipboard::new() {
                    Ok(mut clipboard) => {
                        if let Err(e) = clipboard.set_text(plain_report(&result)) {
                            eprintln!("Warning: Failed to copy to clipboard: {}", e);
                        } else {
                            println!("(Copied to clipboard)");
                        }
                    }
                    Err(e) => eprintln!("Warning: Could not access clipboard: {}", e),
                }
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Analysis Failed: {}", e.user_message());
            std::process::exit(1);
        }
    }
}

enum Input {
    File(PathBuf),
    Url(String),
}

async fn analyze_with_spinner(
    app: &LeafScan,
    input: Input,
) -> leafscan_core::Result<PredictionResult> {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
        .template("{spinner:.green} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Analyzing against {}...", app.config().server_url));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = match input {
        Input::File(path) => app.analyze_file(path).await,
        Input::Url(url) => app.analyze_url(&url).await,
    };

    spinner.finish_and_clear();
    outcome
}

/// Builds the markdown diagnosis report. Notes stay out of the report.
fn render_report(result: &PredictionResult) -> String {
    format!(
        "# Diagnosis\n\n**{}** ({})\n\n## Treatment\n\n{}\n\n## Prevention\n\n{}\n",
        result.disease,
        result.confidence_percent(),
        result.treatment,
        result.prevention
    )
}

/// Plain-text variant for the clipboard.
fn plain_report(result: &PredictionResult) -> String {
    format!(
        "{} ({})\n\nTreatment:\n{}\n\nPrevention:\n{}",
        result.disease,
        result.confidence_percent(),
        result.treatment,
        result.prevention
    )
}

/// Helper to print markdown
fn print_markdown(text: &str) {
    let mut skin = MadSkin::default();
    skin.bold.set_fg(Color::Yellow);
    skin.italic.set_fg(Color::Magenta);
    skin.code_block.set_bg(Color::Rgb { r: 40, g: 40, b: 40 });

    skin.print_text(text);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PredictionResult {
        PredictionResult {
            class_name: "Tomato___Late_blight".into(),
            disease: "Late Blight".into(),
            confidence: 0.873,
            treatment: "Remove infected leaves.".into(),
            prevention: "Rotate crops.".into(),
            notes: "internal note".into(),
        }
    }

    #[test]
    fn report_shows_four_fields_and_never_the_notes() {
        let report = render_report(&sample());
        assert!(report.contains("Late Blight"));
        assert!(report.contains("87%"));
        assert!(report.contains("Remove infected leaves."));
        assert!(report.contains("Rotate crops."));
        assert!(!report.contains("internal note"));
    }

    #[test]
    fn clipboard_report_matches_the_display_fields() {
        let plain = plain_report(&sample());
        assert!(plain.starts_with("Late Blight (87%)"));
        assert!(!plain.contains("internal note"));
    }
}
