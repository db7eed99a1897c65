//! Mnemonic Vanity Address Search CLI
//!
//! Usage:
//!   mnemonic_vanity                        # Most leading zero bytes, m/44'/60'/0'/0/0
//!   mnemonic_vanity -r nibbles -t 8        # Stop at 8 leading zero hex digits
//!   mnemonic_vanity -r run -p bitcoin      # Longest run at either end, coin type 0

use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use mnemonic_vanity::worker::BestState;
use mnemonic_vanity::{Config, Coordinator, Dictionary, Entropy, Improvement, WorkerPool};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();

    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    }

    // Fatal startup checks: the word list and the RNG must both be usable.
    let dictionary = match Dictionary::english() {
        Ok(dictionary) => dictionary,
        Err(e) => {
            error!(error = %e, "word list unusable");
            process::exit(1);
        }
    };
    if let Err(e) = Entropy::generate() {
        error!(error = %e, "cannot start search");
        process::exit(1);
    }

    println!("Mnemonic Vanity Address Search");
    println!("==============================");
    println!("Rule:       {}", config.rule);
    println!("Path:       {}", config.path);
    println!("Workers:    {}", config.worker_count());
    match config.target_score() {
        Some(target) => println!("Target:     score {}", target),
        None => println!("Target:     none (run until stopped)"),
    }
    println!();

    let pool = match WorkerPool::new(
        config.worker_count(),
        config.rule,
        config.path.clone(),
        dictionary,
    ) {
        Ok(pool) => pool,
        Err(e) => {
            error!(error = %e, "failed to start workers");
            process::exit(1);
        }
    };
    let mut coordinator = Coordinator::new(config.rule, pool.best_score(), pool.start_time());

    ctrlc_handler(pool.stop_flag_clone());

    println!("Searching... (Press Ctrl+C to stop)\n");

    let report_interval = Duration::from_secs(config.report_interval);

    loop {
        match pool.wait_for_candidate(report_interval) {
            Some(candidate) => {
                if let Some(update) = coordinator.offer(candidate) {
                    print_improvement(&update);

                    if config.target_score().is_some_and(|t| update.score >= t) {
                        println!("\nTarget reached! Score {}.", update.score);
                        break;
                    }
                }
            }
            None => print_progress(&pool, &coordinator),
        }

        if pool.is_stopped() {
            println!("\nStopped.");
            break;
        }
    }

    println!("\n--- Final Statistics ---");
    println!(
        "Candidates evaluated: {}",
        format_number(pool.stats().total_evaluated())
    );
    println!("Candidates reported:  {}", pool.stats().total_reported());
    println!("Derivation rejects:   {}", pool.stats().total_rejects());
    println!("Time elapsed:         {:.2}s", pool.elapsed().as_secs_f64());
    println!(
        "Average speed:        {}/s",
        format_number(pool.candidates_per_second() as u64)
    );
    print_best(coordinator.best());

    if let Err(e) = pool.join() {
        error!(error = %e, "search aborted");
        process::exit(1);
    }
    info!("search finished");
}

fn print_improvement(update: &Improvement) {
    println!("----");
    if update.strict {
        println!("Score:         {}", update.score);
    } else {
        println!("Score:         {} (tie)", update.score);
    }
    println!("Run time:      {}", format_duration(update.elapsed));
    match update.estimated_next {
        Some(eta) => println!("Next expected: ~{}", format_duration(eta)),
        None => println!("Next expected: unknown"),
    }
    println!("Worker:        {}", update.worker_id);
    println!("Address:       {}", update.address);
    println!("Seed Phrase:   {}", update.phrase);
    println!("----\n");
}

fn print_progress(pool: &WorkerPool, coordinator: &Coordinator) {
    let evaluated = pool.stats().total_evaluated();
    let rate = pool.candidates_per_second();
    let elapsed = pool.elapsed().as_secs();

    println!(
        "[{:>6}s] Evaluated {} mnemonics ({}/s), best score {}",
        elapsed,
        format_number(evaluated),
        format_number(rate as u64),
        coordinator.best().score
    );
}

fn print_best(best: &BestState) {
    if let Some(address) = best.address {
        println!("Best score:           {}", best.score);
        println!("Best address:         {}", address);
        println!("Best seed phrase:     {}", best.phrase);
    }
}

fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs >= 86_400 {
        format!("{:.1}d", secs as f64 / 86_400.0)
    } else if secs >= 3_600 {
        format!("{:.1}h", secs as f64 / 3_600.0)
    } else if secs >= 60 {
        format!("{:.1}m", secs as f64 / 60.0)
    } else {
        format!("{:.1}s", d.as_secs_f64())
    }
}

fn ctrlc_handler(stop_flag: Arc<AtomicBool>) {
    if let Err(e) = ctrlc::set_handler(move || {
        stop_flag.store(true, Ordering::Relaxed);
    }) {
        warn!(error = %e, "Ctrl-C handler unavailable; stop the process externally");
    }
}
