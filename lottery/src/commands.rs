use std::str::FromStr;

use lottery_types::{PrizeTier, SettingsError};
use thiserror::Error;

pub const USAGE: &str = "\
usage: lottery <command> [args]

commands:
  status                          per-tier winners, capacity and pool size
  pool <tier>                     eligible tickets for a tier
  draw <tier>                     draw one winner
  winners [tier]                  list winners, most recent first
  search <number>                 which tier a ticket won, if any
  clear                           delete every winner (settings are kept)
  set-title <title>
  set-total <tickets>             informational ticket total
  set-label <tier> <label>
  set-count <tier> <count>
  set-range <tier> <start> <end>
  exclude <number>...             bar tickets from every tier
  include <number>...             lift exclusions

tiers: first | second | third (or 1 | 2 | 3)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Status,
    Pool(PrizeTier),
    Draw(PrizeTier),
    Winners(Option<PrizeTier>),
    Search(String),
    Clear,
    SetTitle(String),
    SetTotal(u32),
    SetLabel(PrizeTier, String),
    SetCount(PrizeTier, u32),
    SetRange(PrizeTier, u32, u32),
    Exclude(Vec<String>),
    Include(Vec<String>),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("no command given")]
    Missing,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("missing argument <{name}> for '{command}'")]
    MissingArgument { command: String, name: &'static str },
    #[error("invalid value '{value}' for <{name}>")]
    InvalidNumber { name: &'static str, value: String },
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

struct Args<I> {
    command: String,
    inner: I,
}

impl<I: Iterator<Item = String>> Args<I> {
    fn required(&mut self, name: &'static str) -> Result<String, CommandError> {
        self.inner.next().ok_or(CommandError::MissingArgument {
            command: self.command.clone(),
            name,
        })
    }

    fn tier(&mut self) -> Result<PrizeTier, CommandError> {
        Ok(PrizeTier::from_str(&self.required("tier")?)?)
    }

    fn number(&mut self, name: &'static str) -> Result<u32, CommandError> {
        let value = self.required(name)?;
        value
            .trim()
            .parse()
            .map_err(|_| CommandError::InvalidNumber { name, value })
    }

    /// Remaining arguments joined with spaces, so titles need no quoting.
    fn text(&mut self, name: &'static str) -> Result<String, CommandError> {
        let words: Vec<String> = self.inner.by_ref().collect();
        if words.is_empty() {
            return Err(CommandError::MissingArgument {
                command: self.command.clone(),
                name,
            });
        }
        Ok(words.join(" "))
    }

    fn numbers(&mut self) -> Result<Vec<String>, CommandError> {
        let numbers: Vec<String> = self.inner.by_ref().collect();
        if numbers.is_empty() {
            return Err(CommandError::MissingArgument {
                command: self.command.clone(),
                name: "number",
            });
        }
        Ok(numbers)
    }
}

impl Command {
    pub fn parse<I>(args: I) -> Result<Self, CommandError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut iter = args.into_iter();
        let name = iter.next().ok_or(CommandError::Missing)?;
        let mut args = Args {
            command: name.clone(),
            inner: iter,
        };

        Ok(match name.as_str() {
            "status" => Command::Status,
            "pool" => Command::Pool(args.tier()?),
            "draw" => Command::Draw(args.tier()?),
            "winners" => match args.inner.next() {
                Some(raw) => Command::Winners(Some(PrizeTier::from_str(&raw)?)),
                None => Command::Winners(None),
            },
            "search" => Command::Search(args.required("number")?),
            "clear" => Command::Clear,
            "set-title" => Command::SetTitle(args.text("title")?),
            "set-total" => Command::SetTotal(args.number("tickets")?),
            "set-label" => {
                let tier = args.tier()?;
                Command::SetLabel(tier, args.text("label")?)
            }
            "set-count" => {
                let tier = args.tier()?;
                Command::SetCount(tier, args.number("count")?)
            }
            "set-range" => {
                let tier = args.tier()?;
                let start = args.number("start")?;
                Command::SetRange(tier, start, args.number("end")?)
            }
            "exclude" => Command::Exclude(args.numbers()?),
            "include" => Command::Include(args.numbers()?),
            _ => return Err(CommandError::Unknown(args.command)),
        })
    }
}
