use crate::config::CercatoreConfig;
use crate::core::scanner::notify;
use crate::core::{
    FileRecord, ReportRow, ScanEvent, ScanOutcome, ScanStats, ScanTarget, discover_files,
};
use crate::detect::{DetectorRegistry, assess};
use crate::extract::TextExtractor;
use crate::progress::ScanProgress;
use crate::report::ReportGenerator;
use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Main entry point for cercatore in CLI mode.
///
/// The scan runs on a background thread while the main thread consumes its
/// events to drive the progress bar. Report paths, or the no-data notice,
/// are printed once the scan thread finishes.
pub fn run(config: CercatoreConfig) -> Result<ScanOutcome> {
    let (tx, rx) = crossbeam_channel::unbounded();

    let config_clone = config.clone();
    let handle = std::thread::spawn(move || run_scan(&config_clone, Some(tx)));

    let progress = ScanProgress::new(config.quiet);
    for event in rx {
        match event {
            ScanEvent::StartScanning => progress.set_message("discovering files"),
            ScanEvent::FilesFound(n) => progress.set_total(n),
            ScanEvent::FileProcessed(p) => progress.inc(p.display().to_string()),
            ScanEvent::Reporting => progress.set_message("writing reports"),
            ScanEvent::Complete(summary) => {
                progress.finish();
                debug!("{}", summary);
            }
            // The error itself is returned through the join handle below
            ScanEvent::Error(e) => progress.abandon(e),
        }
    }
    progress.finish();

    let outcome = handle
        .join()
        .map_err(|_| anyhow::anyhow!("Scan thread panicked"))??;

    for line in summary_lines(&outcome) {
        println!("{}", line);
    }

    Ok(outcome)
}

/// End-of-run lines printed to stdout.
pub fn summary_lines(outcome: &ScanOutcome) -> Vec<String> {
    match outcome.artifacts() {
        Some(artifacts) => {
            let mut lines = vec![format!("Reports saved to {}", artifacts.dir.display())];
            lines.extend(
                artifacts
                    .paths()
                    .iter()
                    .map(|path| format!("  - {}", path.display())),
            );
            lines
        }
        None => vec!["No analyzable data found.".to_string()],
    }
}

/// Runs the whole pipeline for `config` without printing anything.
///
/// No report directory is created when no row survives discovery and filtering.
pub fn run_scan(config: &CercatoreConfig, tx: Option<Sender<ScanEvent>>) -> Result<ScanOutcome> {
    let result = scan(config, &tx);
    match &result {
        Ok(ScanOutcome::Report { artifacts, .. }) => notify(
            &tx,
            ScanEvent::Complete(format!("Reports written to {}", artifacts.dir.display())),
        ),
        Ok(ScanOutcome::NoData { .. }) => {
            notify(&tx, ScanEvent::Complete("No analyzable data found".to_string()))
        }
        Err(e) => notify(&tx, ScanEvent::Error(e.to_string())),
    }
    result
}

fn scan(config: &CercatoreConfig, tx: &Option<Sender<ScanEvent>>) -> Result<ScanOutcome> {
    let start = Instant::now();
    config.validate()?;

    let target = config.scan_target()?;
    let registry = DetectorRegistry::builtin().context("Failed to compile built-in detectors")?;
    let extractor = config.extractor();

    let candidates = discover_files(&target, &config.folder_exclusion(), tx)?;
    let (rows, mut stats) =
        collect_rows(&candidates, &target, &registry, &extractor, config.jobs, tx)?;
    stats.scan_duration_ms = start.elapsed().as_millis() as u64;

    if rows.is_empty() {
        log_stats(&stats);
        return Ok(ScanOutcome::NoData { stats });
    }

    notify(tx, ScanEvent::Reporting);
    let artifacts = ReportGenerator::new(config.narrative_rows).generate(&rows, &config.output)?;
    stats.scan_duration_ms = start.elapsed().as_millis() as u64;
    log_stats(&stats);

    Ok(ScanOutcome::Report { artifacts, stats })
}

fn log_stats(stats: &ScanStats) {
    info!(
        discovered = stats.files_discovered,
        reported = stats.files_reported,
        filtered = stats.files_filtered,
        extraction_failures = stats.extraction_failures,
        duration_ms = stats.scan_duration_ms,
        "Scan finished"
    );
}

/// Extracts, gates and classifies every candidate on a pool of `jobs` workers.
///
/// `jobs == 0` uses one worker per CPU. Rows come back in candidate order
/// whatever the pool size.
pub fn collect_rows(
    candidates: &[FileRecord],
    target: &ScanTarget,
    registry: &DetectorRegistry,
    extractor: &TextExtractor,
    jobs: usize,
    tx: &Option<Sender<ScanEvent>>,
) -> Result<(Vec<ReportRow>, ScanStats)> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .context("Failed to start worker pool")?;

    let failures_before = extractor.failures();
    let filtered = AtomicUsize::new(0);

    let results: Vec<Option<ReportRow>> = pool.install(|| {
        candidates
            .par_iter()
            .map(|record| {
                let text = extractor.extract(&record.path);
                let row = match assess(&text, target.content_filter.as_ref(), registry) {
                    Some(assessment) => Some(ReportRow {
                        file: record.path.clone(),
                        tags: assessment.detection.joined(),
                        size: record.size,
                        risk: assessment.risk,
                    }),
                    None => {
                        filtered.fetch_add(1, Ordering::Relaxed);
                        None
                    }
                };

                notify(tx, ScanEvent::FileProcessed(record.path.clone()));
                row
            })
            .collect()
    });

    let rows: Vec<ReportRow> = results.into_iter().flatten().collect();
    let stats = ScanStats {
        files_discovered: candidates.len(),
        files_reported: rows.len(),
        files_filtered: filtered.into_inner(),
        extraction_failures: extractor.failures() - failures_before,
        scan_duration_ms: 0,
    };

    Ok((rows, stats))
}
