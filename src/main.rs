use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;

use urnfinder::cli::Args;
use urnfinder::config::AppConfig;
use urnfinder::input;
use urnfinder::logger::{RunLogger, VerbosityLevel};
use urnfinder::scrape::Pipeline;
use urnfinder::session::SessionConfig;
use urnfinder::export;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = args.validate() {
        eprintln!("❌ Invalid arguments: {}", e);
        std::process::exit(1);
    }

    // Load configuration (file if present, compiled-in defaults otherwise)
    let config = match AppConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("❌ Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let verbosity = VerbosityLevel::from_verbose_count(args.verbose);
    let logger = RunLogger::new(verbosity);

    // Pre-flight: resolve the credential and the target list. Every failure
    // here aborts before any network activity.
    let cookie = match input::resolve_cookie(
        args.cookie.as_deref(),
        args.cookie_file.as_deref().map(Path::new),
    ) {
        Ok(cookie) => cookie,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            std::process::exit(1);
        }
    };

    let urls: Vec<String> = if let Some(url) = &args.url {
        vec![url.clone()]
    } else {
        // validate() guarantees --input is present when no URL was given
        let path = args.input.as_ref().expect("input file is required");
        match input::read_targets(Path::new(path)) {
            Ok(urls) => urls,
            Err(e) => {
                eprintln!("❌ {:#}", e);
                std::process::exit(1);
            }
        }
    };

    let delay = args.delay_range(&config.delay);
    if let Err(e) = delay.validate() {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    // Session setup: immutable config, one client for the whole run.
    let mut rng = StdRng::from_entropy();
    let session = SessionConfig::new(&cookie, config.http.clone(), &mut rng);
    logger.debug(&format!(
        "Session: li_at={}, JSESSIONID={}",
        session.redacted_cookie(),
        session.session_token()
    ));

    let client = session.build_client().context("session setup failed")?;

    logger.info(&format!(
        "Processing {} target(s), delay {:.1}-{:.1}s",
        urls.len(),
        delay.min_secs,
        delay.max_secs
    ));

    logger.start_progress(urls.len() as u64).await;

    let mut pipeline = Pipeline::new(client, delay.min_secs, delay.max_secs, rng)
        .with_max_auth_failures(args.max_auth_failures);
    let report = pipeline.run(&urls, &logger).await;

    let finish_message = if report.aborted {
        "Run aborted early on consecutive auth-wall failures"
    } else {
        "Run complete"
    };
    logger.finish_progress(finish_message).await;

    // Export: partial results are still written when some items failed;
    // nothing is written when there are no results at all.
    if report.records.is_empty() {
        logger.info("No results — nothing exported");
    } else {
        match args.output_format.as_str() {
            "json" => export::export_json(&report.records, &args.output)?,
            _ => export::export_csv(&report.records, &args.output)?,
        }
        logger.record_output_file(&args.output);
    }

    logger.print_final_summary();

    Ok(())
}
