use std::{io::Write, path::PathBuf};

use chrono::Local;
use clap::Args;

use crate::{ops, shared_state::State, Result};

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// A CSV file with the columns Team, Vorname, Nachname, Position, Trikotnummer
    pub file: PathBuf,
    /// The team for rows whose Team column doesn't match one of your teams
    #[clap(short, long)]
    pub team: String,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Export only this team. Without it, the players of all teams are exported.
    #[clap(short, long)]
    pub team: Option<String>,
    /// The directory to write the file to
    #[clap(short, long, default_value = ".")]
    pub out: PathBuf,
}

pub async fn import(state: &State, args: ImportArgs, out: &mut dyn Write) -> Result<()> {
    let team = ops::teams::find_team(state, &args.team).await?;
    let data = tokio::fs::read(&args.file).await?;
    let summary = ops::transfer::import_csv(state, &data, &team.id).await?;

    writeln!(out, "{} Spieler*innen importiert", summary.inserted)?;
    if summary.skipped > 0 {
        writeln!(
            out,
            "{} Zeilen ohne Vor- oder Nachname übersprungen",
            summary.skipped
        )?;
    }
    Ok(())
}

pub async fn export(state: &State, args: ExportArgs, out: &mut dyn Write) -> Result<()> {
    let today = Local::now().date_naive();
    let file = match args.team {
        Some(team) => {
            let team = ops::teams::find_team(state, &team).await?;
            ops::transfer::export_team_csv(state, &team, today).await?
        }
        None => ops::transfer::export_all_csv(state, today).await?,
    };

    tokio::fs::create_dir_all(&args.out).await?;
    let path = args.out.join(&file.filename);
    tokio::fs::write(&path, file.contents.as_bytes()).await?;

    writeln!(
        out,
        "{} Spieler*innen exportiert nach {}",
        file.rows,
        path.display()
    )?;
    Ok(())
}
