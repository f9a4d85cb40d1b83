pub mod auth;
pub mod migrate;
pub mod players;
pub mod teams;
pub mod transfer;

use std::io::{BufRead, Write};

use clap::Subcommand;

use crate::{confirm::DeleteTarget, Result};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in with email and password
    Login(auth::LoginArgs),
    /// Sign out and forget the saved session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List, create, rename, and delete teams
    Teams(teams::TeamsArgs),
    /// Manage the players of a team
    Players(players::PlayersArgs),
    /// Import players from a CSV file
    Import(transfer::ImportArgs),
    /// Export players to a CSV file
    Export(transfer::ExportArgs),
    /// Create the tables when connecting to the database directly
    Migrate,
}

pub(crate) fn read_line(input: &mut dyn BufRead) -> Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Show the delete prompt and wait for an answer. `yes` skips the question.
pub(crate) fn ask_confirmation(
    target: &DeleteTarget,
    yes: bool,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> Result<bool> {
    if yes {
        return Ok(true);
    }

    writeln!(out, "{}", target.title())?;
    write!(out, "{} [y/N] ", target.message())?;
    out.flush()?;

    let answer = read_line(input)?.trim().to_lowercase();
    Ok(matches!(answer.as_str(), "y" | "yes" | "j" | "ja"))
}
