use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;

pub mod cli;
pub mod menu;
pub mod play;
pub mod session;
pub mod signal;

use cli::Command;
use play::PlayRequest;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config
    let config = sy_core::config::load_or_default(&cli.config)?;
    let grid = (config.grid_width, config.grid_height);

    match cli.command {
        Some(Command::Pattern) => {
            menu::write_display_test(&mut io::stdout().lock(), grid.0, grid.1)?;
        }
        Some(Command::Play(args)) => {
            let interrupts = signal::InterruptHub::install()?;
            let report = play::run_play(&args.request(&config), &interrupts)?;
            println!("{report}");
        }
        None => {
            let interrupts = signal::InterruptHub::install()?;
            let request = PlayRequest::from_config(&config);
            menu::run_menu(io::stdin().lock(), io::stdout(), grid, |out| {
                let report = play::run_play(&request, &interrupts)?;
                writeln!(out, "{report}")?;
                Ok(())
            })?;
        }
    }
    Ok(())
}
