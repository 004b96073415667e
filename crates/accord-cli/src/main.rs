// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use accord_app::AppState;
use accord_store::Store;
use accord_tui::UiOptions;
use anyhow::{Context, Result};
use config::Config;
use runtime::StoreRuntime;
use std::env;
use std::path::{Path, PathBuf};
use tracing::info;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `accord --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let seed_dir = options.seed_dir.clone().or_else(|| config.seed_dir());
    let mut store = load_store(seed_dir.as_deref())?;
    if options.check_only {
        println!(
            "ok: {} dashboard entries, {} accounts, {} contacts, {} reports, {} articles",
            store.dashboard().len(),
            store.accounts().len(),
            store.contacts().len(),
            store.reports().len(),
            store.article_count()
        );
        return Ok(());
    }

    let log_path = config.log_file()?;
    logging::init_logging(&log_path, config.log_level())?;
    info!(
        config = %options.config_path.display(),
        section = config.start_section().as_str(),
        "starting accord"
    );

    let mut state = AppState::starting_at(config.start_section());
    let ui = UiOptions {
        page_size: config.page_size(),
        status_clear: config.status_clear(),
    };
    let mut runtime = StoreRuntime::new(&mut store);
    accord_tui::run_app(&mut state, &mut runtime, ui)
}

fn load_store(seed_dir: Option<&Path>) -> Result<Store> {
    match seed_dir {
        Some(dir) => Store::load_dir(dir).with_context(|| {
            format!(
                "load seed data from {} -- set [data].seed_dir or --seed-dir to a directory with {}",
                dir.display(),
                accord_store::SEED_FILES.join(", ")
            )
        }),
        None => Store::seeded().context("load bundled seed data"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    seed_dir: Option<PathBuf>,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        seed_dir: None,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--seed-dir" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--seed-dir requires a directory path"))?;
                options.seed_dir = Some(PathBuf::from(value.as_ref()));
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("accord");
    println!("  --config <path>          Use a specific config path");
    println!("  --seed-dir <path>        Load seed JSON from a directory instead of the bundled data");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --check                  Validate config + seed data, then exit");
    println!("  --help                   Show this help");
}
