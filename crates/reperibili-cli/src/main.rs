//! `reperibili` — who is on call, and who should be.
//!
//! # Usage
//!
//! ```
//! reperibili now
//! reperibili -p VOD assign 20180606 Bregliano --group notte
//! reperibili add-person Alberto Bregliano +393357291533
//! ```
//!
//! Settings come from `reperibili.toml` (or `--config`), then `REPERIBILI_*`
//! environment variables, then command-line flags.

mod settings;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use reperibili_core::{
  assignment::{Assignment, Platform},
  day::{DayKey, DayWindow},
  person::Person,
  service::RotationService,
};
use reperibili_store_sqlite::SqliteStore;
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "reperibili", version, about = "On-call rotation lookup and assignment")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "reperibili.toml")]
  config: PathBuf,

  /// SQLite database file; overrides `store_path` from the config.
  #[arg(long, value_name = "PATH")]
  db: Option<PathBuf>,

  /// Platform whose rotation to read or write; overrides `platform`.
  #[arg(short, long)]
  platform: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Show who is on call right now.
  Now {
    /// Print the day and person as JSON.
    #[arg(long)]
    json: bool,
  },
  /// Show the assignment recorded for a day (YYYYMMDD).
  Show {
    day: DayKey,
    /// List every recorded assignment for the day, newest first.
    #[arg(long)]
    history: bool,
  },
  /// Put a person, by last name, on call for a day (YYYYMMDD).
  Assign {
    day: DayKey,
    cognome: String,
    #[arg(short, long)]
    group: Option<String>,
  },
  /// Register a new on-call person.
  AddPerson {
    nome: String,
    cognome: String,
    /// Mobile number, e.g. +393357291533.
    cellulare: String,
  },
  /// List registered persons.
  People,
  /// Print yesterday, today, tomorrow and the active rotation day.
  Days,
  /// Insert the demo persons into a fresh database.
  Seed,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut settings = Settings::load(&cli.config)?;
  if let Some(db) = cli.db {
    settings.store_path = db;
  }
  if let Some(platform) = cli.platform {
    settings.platform = platform;
  }

  let window = DayWindow::from_hour(settings.cutover_hour)
    .context("invalid cutover_hour in configuration")?;
  let platform = Platform::from(settings.platform.as_str());

  let store = SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;
  let service = RotationService::new(store).with_window(window);

  run(&service, &platform, cli.command).await
}

async fn run(
  service: &RotationService<SqliteStore>,
  platform: &Platform,
  command: Command,
) -> Result<()> {
  match command {
    Command::Now { json } => {
      let on_call = service
        .on_call(platform)
        .await
        .with_context(|| format!("no one on call for {platform}"))?;
      if json {
        println!("{}", serde_json::to_string_pretty(&on_call)?);
      } else {
        println!("{} {}: {}", on_call.day, on_call.platform, describe(&on_call.person));
      }
    }

    Command::Show { day, history } => {
      let rows = if history {
        service.assignment_history(day, platform).await?
      } else {
        service
          .get_assignment(day, platform)
          .await?
          .into_iter()
          .collect()
      };
      if rows.is_empty() {
        println!("{day} {platform}: no assignment");
      }
      for assignment in rows {
        let who = match service.person_info(assignment.person_id).await {
          Ok(person) => describe(&person),
          Err(e) if e.is_not_found() => format!("unknown person #{}", assignment.person_id),
          Err(e) => return Err(e.into()),
        };
        println!("{}", describe_assignment(&assignment, &who));
      }
    }

    Command::Assign { day, cognome, group } => {
      let assignment = service
        .assign(day, &cognome, platform, group.as_deref())
        .await
        .with_context(|| format!("failed to assign {cognome} to {day}"))?;
      println!("{}", describe_assignment(&assignment, &cognome));
    }

    Command::AddPerson { nome, cognome, cellulare } => {
      let person = service
        .add_person(&nome, &cognome, &cellulare)
        .await
        .context("failed to add person")?;
      println!("added #{}: {}", person.id, describe(&person));
    }

    Command::People => {
      for person in service.list_persons().await? {
        println!("#{:<4} {}", person.id, describe(&person));
      }
    }

    Command::Days => {
      let days = service.calendar()?;
      println!("ieri   {}", days.yesterday);
      println!("oggi   {}", days.today);
      println!("domani {}", days.tomorrow);
      println!(
        "attivo {} (cambio alle {})",
        service.active_day()?,
        service.window().cutover().format("%H:%M")
      );
    }

    Command::Seed => {
      let inserted = service.store().seed_fixtures().await?;
      println!("inserted {inserted} fixture person(s)");
    }
  }

  Ok(())
}

fn describe(person: &Person) -> String {
  format!("{} ({})", person.full_name(), person.phone)
}

fn describe_assignment(assignment: &Assignment, who: &str) -> String {
  let group = assignment
    .group
    .as_deref()
    .map(|g| format!(" [{g}]"))
    .unwrap_or_default();
  format!(
    "{} {}{group}: {who} (recorded {})",
    assignment.day,
    assignment.platform,
    assignment.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
  )
}
