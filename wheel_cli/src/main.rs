#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! `wheel`: command-line front end for the wheel controller.

mod app;
mod cli;
mod error_fmt;
mod logging;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::WrapErr;

use crate::cli::{Cli, Commands, JSON_MODE};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    if let Err(e) = color_eyre::install() {
        eprintln!("color-eyre install failed: {e}");
    }

    let cfg = app::load_config(cli.config.as_deref());
    let guard = match logging::init_tracing(
        cli.json,
        &cli.log_level,
        cfg.as_ref().ok().map(|c| &c.logging),
    ) {
        Ok(g) => g,
        Err(e) => exit_with(&e, None),
    };

    let result = cfg.and_then(|cfg| dispatch(&cli, &cfg));
    match result {
        Ok(()) => {
            drop(guard);
        }
        Err(e) => exit_with(&e, guard),
    }
}

fn exit_with(
    err: &eyre::Report,
    guard: Option<tracing_appender::non_blocking::WorkerGuard>,
) -> ! {
    tracing::error!(error = %format!("{err:#}"), "wheel failed");
    if JSON_MODE.get().copied().unwrap_or(false) {
        eprintln!("{}", error_fmt::format_error_json(err));
    } else {
        eprintln!("{}", error_fmt::humanize(err));
    }
    let code = error_fmt::exit_code_for_error(err);
    drop(guard);
    std::process::exit(code);
}

fn dispatch(cli: &Cli, cfg: &wheel_config::Config) -> eyre::Result<()> {
    match cli.cmd {
        Commands::Run { seed, for_ms } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = shutdown.clone();
            ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
                .wrap_err("install Ctrl-C handler")?;
            let stats = app::run(cfg, seed, for_ms, &shutdown)?;
            if cli.json {
                println!("{}", app::stats_json(&stats));
            } else {
                println!("{}", app::format_stats(&stats));
            }
        }
        Commands::Simulate {
            pulses,
            interval_ms,
            seed,
            all_hours,
        } => {
            let report = app::simulate(
                cfg,
                app::SimulateArgs {
                    pulses,
                    interval_ms,
                    seed,
                    all_hours,
                },
            )?;
            if cli.json {
                println!("{}", app::format_summary_json(&report));
            } else {
                println!("{}", app::format_summary(&report));
            }
        }
        Commands::SelfCheck => {
            app::self_check(cfg)?;
            println!("ok");
        }
    }
    Ok(())
}
