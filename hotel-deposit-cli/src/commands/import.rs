use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use hotel_deposit_import::{
    Batch, BatchOptions, FailurePolicy, ImportProgress, ImportStats, SourceFormat, run_batch,
};

use crate::CliError;
use crate::cli_types::FormatArg;

use super::{open_db, print_json};

/// Batches smaller than this log their phases instead of drawing a bar.
const PROGRESS_BAR_MIN: usize = 200;

/// Import one JSON or CSV file.
pub(crate) fn run_import(
    db: Option<PathBuf>,
    file: PathBuf,
    format: Option<FormatArg>,
    fail_fast: bool,
    skip_errors: bool,
    quiet: bool,
    json: bool,
) -> Result<(), CliError> {
    let format = format.map(|f| match f {
        FormatArg::Json => SourceFormat::Json,
        FormatArg::Csv => SourceFormat::Tabular,
    });
    let batch = Batch::read(&file, format)?;

    let mut options = BatchOptions::for_format(batch.format);
    if fail_fast {
        options.failure_policy = FailurePolicy::FailFast;
    } else if skip_errors {
        options.failure_policy = FailurePolicy::SkipAndContinue;
    }

    let (mut conn, db_path) = open_db(db)?;

    log::info!(
        "{}",
        format!(
            "Importing {} into {}",
            file.display(),
            db_path.display()
        )
        .if_supports_color(Stdout, |t| t.bold()),
    );

    let progress = CliImportProgress::new(batch.records.len(), quiet || json);
    let stats = run_batch(&mut conn, &batch, &options, Some(&progress));
    progress.finish();

    let stats = match stats {
        Ok(s) => s,
        Err(e) => {
            log::error!(
                "  {} {} rolled back",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                file.display(),
            );
            return Err(e.into());
        }
    };

    if json {
        return print_json(&stats);
    }
    report(&stats);
    Ok(())
}

fn report(stats: &ImportStats) {
    let mark = if stats.skipped == 0 {
        "\u{2714}".if_supports_color(Stdout, |t| t.green()).to_string()
    } else {
        "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()).to_string()
    };
    log::info!(
        "  {} {} of {} records imported, {} skipped",
        mark,
        stats.imported,
        stats.total_records,
        stats.skipped,
    );
    crate::log_blank();
    log::info!("{}", "Import complete".if_supports_color(Stdout, |t| t.bold()));
    if stats.brands > 0 {
        log::info!("  Brands:   {:>6}", stats.brands);
    }
    log::info!(
        "  Hotels:   {:>6} new, {} updated",
        stats.hotels_created,
        stats.hotels_updated,
    );
    log::info!("  Policies: {:>6} written", stats.policies_written);
}

/// CLI progress reporter: a bar for large batches, log lines otherwise.
struct CliImportProgress {
    bar: Option<ProgressBar>,
}

impl CliImportProgress {
    fn new(total: usize, hidden: bool) -> Self {
        if hidden || total < PROGRESS_BAR_MIN {
            return Self { bar: None };
        }
        let bar = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::stderr());
        if let Ok(style) =
            ProgressStyle::with_template("  {bar:40.cyan/blue} {pos}/{len} {wide_msg}")
        {
            bar.set_style(style);
        }
        Self { bar: Some(bar) }
    }

    fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl ImportProgress for CliImportProgress {
    fn on_record(&self, current: usize, _total: usize, name: &str) {
        if let Some(bar) = &self.bar {
            bar.set_position(current as u64);
            bar.set_message(name.to_string());
        }
    }

    fn on_phase(&self, message: &str) {
        match &self.bar {
            Some(bar) => bar.println(format!("  {message}")),
            None => log::info!("  {}", message),
        }
    }

    fn on_complete(&self, message: &str) {
        log::debug!("{}", message);
    }
}
