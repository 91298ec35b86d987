mod commands;

use std::{env, process};

use chrono::SecondsFormat;
use commands::{Command, CommandError, USAGE};
use draw_engine::{DrawEngine, DrawError, PoolPreview};
use log::debug;
use lottery_types::{AppConfig, ConfigError, PrizeTier, Settings, SettingsError, Winner};
use thiserror::Error;
use winner_ledger::{FileStore, KeyValueStore, LedgerConfig, LedgerError};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("lottery failed: {err}");
        if matches!(err, AppError::Command(_)) {
            eprintln!();
            eprintln!("{USAGE}");
        }
        process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let command = Command::parse(env::args().skip(1))?;
    let config = AppConfig::load()?;
    debug!("loaded config: {config:?}");
    let store = FileStore::open(LedgerConfig::new(config.state_dir.clone()))?;
    let engine = match config.seed {
        Some(seed) => DrawEngine::seeded(store, seed),
        None => DrawEngine::new(store),
    };
    execute(&engine, &config, command)
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Draw(#[from] DrawError),
}

fn execute<S: KeyValueStore>(
    engine: &DrawEngine<S>,
    config: &AppConfig,
    command: Command,
) -> Result<(), AppError> {
    match command {
        Command::Status => print!("{}", engine.summary()?),
        Command::Pool(tier) => {
            let preview = engine.pool_preview(tier, config.preview_len)?;
            let label = engine.load_settings()?.tier(tier).label.clone();
            println!("{label} [{tier}]: {} eligible tickets", preview.total);
            if !preview.tickets.is_empty() {
                println!("  {}", describe_preview(&preview));
            }
        }
        Command::Draw(tier) => {
            let winner = engine.draw(tier)?;
            let settings = engine.load_settings()?;
            let prize = settings.tier(tier);
            println!(
                "{}: ticket {} (drawn {}, id {})",
                prize.label,
                winner.number,
                format_drawn_at(&winner),
                winner.id
            );
            println!(
                "{} remaining for {}",
                engine.remaining_count(tier)?,
                prize.label
            );
        }
        Command::Winners(filter) => {
            let settings = engine.load_settings()?;
            let tiers: Vec<PrizeTier> = match filter {
                Some(tier) => vec![tier],
                None => PrizeTier::ALL.to_vec(),
            };
            let mut any = false;
            for tier in tiers {
                let winners = engine.winners_for_tier(tier)?;
                if winners.is_empty() {
                    continue;
                }
                any = true;
                println!("{} ({})", settings.tier(tier).label, winners.len());
                for winner in &winners {
                    println!("  {}  {}", winner.number, format_drawn_at(winner));
                }
            }
            if !any {
                println!("no winners drawn yet");
            }
        }
        Command::Search(raw) => match engine.find_winner(&raw)? {
            Some(winner) => {
                let settings = engine.load_settings()?;
                println!(
                    "ticket {} won {}",
                    winner.number,
                    settings.tier(winner.tier).label
                );
            }
            None => println!("ticket {} has not won", raw.trim()),
        },
        Command::Clear => {
            let cleared = engine.load_winners()?.len();
            engine.clear_winners()?;
            println!("cleared {cleared} winners; settings kept");
        }
        Command::SetTitle(title) => update_settings(engine, |s| {
            s.set_title(title);
            Ok(())
        })?,
        Command::SetTotal(total) => update_settings(engine, |s| {
            s.set_total_tickets(total);
            Ok(())
        })?,
        Command::SetLabel(tier, label) => update_settings(engine, |s| {
            s.set_label(tier, label);
            Ok(())
        })?,
        Command::SetCount(tier, count) => update_settings(engine, |s| s.set_count(tier, count))?,
        Command::SetRange(tier, start, end) => {
            update_settings(engine, |s| s.set_pool_range(tier, start, end))?
        }
        Command::Exclude(numbers) => update_settings(engine, |s| {
            for raw in &numbers {
                s.exclude_number(raw)?;
            }
            Ok(())
        })?,
        Command::Include(numbers) => update_settings(engine, |s| {
            for raw in &numbers {
                s.include_number(raw)?;
            }
            Ok(())
        })?,
    }
    Ok(())
}

/// Load, edit and save the settings record wholesale. Nothing is saved if the edit fails.
fn update_settings<S, F>(engine: &DrawEngine<S>, edit: F) -> Result<(), AppError>
where
    S: KeyValueStore,
    F: FnOnce(&mut Settings) -> Result<(), SettingsError>,
{
    let mut settings = engine.load_settings()?;
    edit(&mut settings)?;
    settings.validate()?;
    engine.save_settings(&settings)?;
    println!("settings saved");
    print!("{}", engine.summary()?);
    if !settings.excluded_numbers.is_empty() {
        println!("  excluded: {}", settings.excluded_numbers.join(", "));
    }
    Ok(())
}

fn describe_preview(preview: &PoolPreview) -> String {
    let shown = preview.tickets.join(", ");
    match preview.hidden() {
        0 => shown,
        hidden => format!("{shown}, ... (+{hidden} more)"),
    }
}

fn format_drawn_at(winner: &Winner) -> String {
    winner
        .drawn_at()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| format!("{}", winner.timestamp))
}
