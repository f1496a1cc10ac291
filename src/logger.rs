use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::RwLock;

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub enum VerbosityLevel {
    Silent = 0,   // Only show progress bar and final summary
    Summary = 1,  // Per-item progress and outcomes (default)
    Detailed = 2, // Delays, warnings, per-item failure detail
    Debug = 3,    // All messages including debug info
}

impl VerbosityLevel {
    pub fn from_verbose_count(count: u8) -> Self {
        match count {
            0 => VerbosityLevel::Summary,
            1 => VerbosityLevel::Detailed,
            2.. => VerbosityLevel::Debug,
        }
    }
}

#[derive(Clone)]
pub struct RunLogger {
    verbosity: VerbosityLevel,
    progress_bar: Arc<RwLock<Option<ProgressBar>>>,
    metadata: Arc<Mutex<RunMetadata>>,
}

#[derive(Default, Clone)]
struct RunMetadata {
    start_time: Option<SystemTime>,
    end_time: Option<SystemTime>,
    targets_processed: usize,
    records_extracted: usize,
    failures_by_class: BTreeMap<&'static str, usize>,
    output_file: String,
}

impl RunLogger {
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            progress_bar: Arc::new(RwLock::new(None)),
            metadata: Arc::new(Mutex::new(RunMetadata::default())),
        }
    }

    // Core logging functions with consistent timestamp formatting
    pub fn info(&self, message: &str) {
        if self.verbosity >= VerbosityLevel::Summary {
            self.print_message("INFO", message);
        }
    }

    pub fn warn(&self, message: &str) {
        if self.verbosity >= VerbosityLevel::Detailed {
            self.print_message("WARN", message);
        }
    }

    pub fn error(&self, message: &str) {
        // Errors are never hidden, regardless of verbosity.
        self.print_message("ERROR", message);
    }

    pub fn debug(&self, message: &str) {
        if self.verbosity >= VerbosityLevel::Debug {
            self.print_message("DEBUG", message);
        }
    }

    fn print_message(&self, level: &str, message: &str) {
        let msg = format!("[{}] {}: {}", self.get_timestamp(), level, message);

        // Route through the progress bar when one is active so the bar
        // keeps its fixed position.
        if let Ok(guard) = self.progress_bar.try_read() {
            if let Some(pb) = guard.as_ref() {
                pb.println(msg);
                return;
            }
        }

        eprintln!("{}", msg);
    }

    fn get_timestamp(&self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let secs = now.as_secs();
        let millis = now.subsec_millis();

        let hours = (secs / 3600) % 24;
        let minutes = (secs % 3600) / 60;
        let seconds = secs % 60;

        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
    }

    // Progress bar management
    pub async fn start_progress(&self, total_steps: u64) {
        let pb = ProgressBar::new(total_steps);

        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap_or_else(|_| {
                    ProgressStyle::default_bar()
                        .template("{bar:40} {pos}/{len} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                })
                .progress_chars("##-"),
        );

        pb.set_message("Starting...");

        let mut progress_guard = self.progress_bar.write().await;
        *progress_guard = Some(pb);

        let mut metadata = self.metadata.lock().unwrap();
        metadata.start_time = Some(SystemTime::now());
    }

    pub async fn update_progress(&self, message: &str) {
        if let Some(pb) = self.progress_bar.read().await.as_ref() {
            pb.set_message(message.to_string());
        }
    }

    pub async fn advance_progress(&self, steps: u64) {
        if let Some(pb) = self.progress_bar.read().await.as_ref() {
            pb.inc(steps);
        }
    }

    pub async fn finish_progress(&self, final_message: &str) {
        let mut progress_guard = self.progress_bar.write().await;
        if let Some(pb) = progress_guard.take() {
            pb.finish_and_clear();
        }

        let mut metadata = self.metadata.lock().unwrap();
        metadata.end_time = Some(SystemTime::now());
        drop(metadata);

        if self.verbosity >= VerbosityLevel::Summary {
            self.print_message("INFO", final_message);
        }
    }

    // Per-item progress, [idx/total] prefixed
    pub fn log_item_start(&self, index: usize, total: usize, url: &str) {
        self.info(&format!("[{}/{}] Processing: {}", index, total, url));
    }

    pub fn log_item_success(&self, index: usize, total: usize, urn: &str) {
        self.record_extraction();
        self.info(&format!("[{}/{}] Found URN: {}", index, total, urn));
    }

    pub fn log_item_failure(&self, index: usize, total: usize, url: &str, class: &'static str, detail: &str) {
        self.record_failure(class);
        self.info(&format!("[{}/{}] Failed ({}): {}", index, total, class, url));
        self.warn(&format!("[{}/{}] {}", index, total, detail));
    }

    pub fn log_delay(&self, seconds: f64) {
        if self.verbosity >= VerbosityLevel::Detailed {
            self.print_message("INFO", &format!("Waiting {:.1}s before next request...", seconds));
        }
    }

    // Metadata recording functions
    pub fn record_target_processed(&self) {
        let mut metadata = self.metadata.lock().unwrap();
        metadata.targets_processed += 1;
    }

    fn record_extraction(&self) {
        let mut metadata = self.metadata.lock().unwrap();
        metadata.records_extracted += 1;
    }

    fn record_failure(&self, class: &'static str) {
        let mut metadata = self.metadata.lock().unwrap();
        *metadata.failures_by_class.entry(class).or_insert(0) += 1;
    }

    pub fn record_output_file(&self, path: &str) {
        let mut metadata = self.metadata.lock().unwrap();
        metadata.output_file = path.to_string();
    }

    // Final summary message
    pub fn print_final_summary(&self) {
        let metadata = self.metadata.lock().unwrap();

        // Clear any remaining progress bar artifacts
        print!("\x1b[2K\r");
        io::stdout().flush().unwrap_or(());

        // Always printed regardless of verbosity level
        println!("\n=== RUN SUMMARY ===");

        if let (Some(start), Some(end)) = (metadata.start_time, metadata.end_time) {
            let duration = end.duration_since(start).unwrap_or_default();
            println!("Duration: {:.2}s", duration.as_secs_f64());
        }

        println!("Targets Processed: {}", metadata.targets_processed);
        println!("URNs Extracted: {}", metadata.records_extracted);

        let total_failures: usize = metadata.failures_by_class.values().sum();
        println!("Failures: {}", total_failures);
        for (class, count) in &metadata.failures_by_class {
            println!("  {}: {}", class, count);
        }

        if !metadata.output_file.is_empty() {
            println!("Results Exported: {}", metadata.output_file);
        }

        println!("===================\n");

        if metadata.records_extracted > 0 {
            println!(
                "✅ Run completed. Extracted {} URN(s) from {} target(s).",
                metadata.records_extracted, metadata.targets_processed
            );
        } else {
            println!("✅ Run completed. No results.");
        }
    }
}
