//! The `snapsort sort` command: classify a directory and move files into
//! label folders.
//!
//! The core pipeline is synchronous and blocking; this command runs it on a
//! blocking thread so the foreground task (spinner, signal handling) stays
//! responsive. Cancellation is coarse: a run either completes or the process
//! exits between files.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use snapsort_core::{
    write_report, ClipEngine, Config, LabelSet, OutputFormat, Pipeline, RunReport,
};

/// Arguments for the `sort` command.
#[derive(Args, Debug)]
pub struct SortArgs {
    /// Directory containing the images to sort
    #[arg(required = true)]
    pub directory: PathBuf,

    /// Label configuration file (JSON with a "labels" array)
    #[arg(short, long, default_value = "labels.json")]
    pub labels: PathBuf,

    /// Report file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report format: json or jsonl (defaults to the configured output.format)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the sort command.
pub async fn execute(args: SortArgs, config: Config) -> anyhow::Result<()> {
    if !args.directory.is_dir() {
        anyhow::bail!(
            "Directory does not exist: {:?}\n\n  Hint: Check the path and try again.",
            args.directory
        );
    }

    let format_name = args.format.as_deref().unwrap_or(&config.output.format);
    let format = OutputFormat::parse(format_name)
        .ok_or_else(|| anyhow::anyhow!("Unknown report format: {:?}", format_name))?;
    let pretty = args.pretty || config.output.pretty;

    let labels = LabelSet::load(&args.labels)?;
    tracing::info!("Loaded {} labels from {:?}", labels.len(), args.labels);

    if !ClipEngine::model_exists(&config.embedding, &config.model_dir()) {
        anyhow::bail!(
            "Model files not found at {:?}\n\n  \
             Hint: Place visual.onnx, text.onnx, and tokenizer.json there, \
             or point general.model_dir at them (`snapsort config show`).",
            ClipEngine::model_path(&config.embedding, &config.model_dir())
        );
    }
    let engine = ClipEngine::load(&config.embedding, &config.model_dir())?;

    // Kept for the per-label breakdown; the set itself moves into the run.
    let label_names: Vec<String> = labels.labels().to_vec();

    let spinner = create_spinner(&args.directory);

    // The whole run is one blocking call; per-file progress is on stderr
    // via the pipeline's log lines.
    let directory = args.directory.clone();
    let report: RunReport = tokio::task::spawn_blocking(move || {
        let pipeline = Pipeline::new(&engine, &config);
        pipeline.run(&directory, &labels)
    })
    .await??;

    spinner.finish_and_clear();

    log_breakdown(&report, &label_names);

    // Emit the machine-readable report.
    match &args.output {
        Some(path) => {
            let file = File::create(path)?;
            write_report(BufWriter::new(file), &report, format, pretty)?;
            tracing::info!("Report written to {:?}", path);
        }
        None => {
            write_report(std::io::stdout().lock(), &report, format, pretty)?;
        }
    }

    eprintln!(
        "Sorted {} of {} files ({} failed) in {:.2?}",
        report.succeeded(),
        report.len(),
        report.failed(),
        report.elapsed
    );

    Ok(())
}

/// Debug-log the full probability breakdown for every classified file.
fn log_breakdown(report: &RunReport, label_names: &[String]) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }
    for outcome in &report.outcomes {
        if let Ok(classification) = &outcome.result {
            for (label, prob) in label_names.iter().zip(&classification.probabilities) {
                tracing::debug!("{:?} {}: {:.2}%", outcome.path, label, prob * 100.0);
            }
        }
    }
}

fn create_spinner(directory: &std::path::Path) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Classifying {:?}...", directory));
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
