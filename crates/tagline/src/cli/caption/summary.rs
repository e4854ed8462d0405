//! Progress bar and end-of-run summary.

use indicatif::{ProgressBar, ProgressStyle};
use tagline_core::RunStats;

pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .map(|s| s.progress_chars("##-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message("starting...");
    pb
}

pub fn print_summary(stats: &RunStats, dry_run: bool) {
    let secs = stats.elapsed.as_secs_f64();
    let rate = if secs > 0.0 {
        stats.images as f64 / secs
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Folders:      {:>8}", stats.folders);
    if stats.folders_skipped > 0 {
        eprintln!("    Skipped:      {:>8}", stats.folders_skipped);
    }
    eprintln!("    Images:       {:>8}", stats.images);
    eprintln!("      enriched:   {:>8}", stats.enriched);
    eprintln!("      template:   {:>8}", stats.fallback);
    if stats.write_failures > 0 {
        eprintln!("    Write errors: {:>8}", stats.write_failures);
    }
    eprintln!("  ------------------------------------");
    if dry_run {
        eprintln!("    Dry run: no caption files written");
    } else {
        eprintln!("    Written:      {:>8}", stats.written());
    }
    eprintln!("    Duration:     {:>7.1}s", secs);
    eprintln!("    Rate:         {:>7.1} img/sec", rate);
    eprintln!("  ====================================");
}
