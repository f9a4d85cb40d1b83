use chrono::NaiveDate;
use roster_convert::{
    all_teams_export_filename, decode_players, encode_all_teams, encode_team, team_export_filename,
};
use roster_db::{object_id::TeamId, teams::Team};
use tracing::{event, instrument, Level};

use crate::{shared_state::State, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// A CSV file ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub contents: String,
    pub rows: usize,
}

/// Import the players in a CSV file. Rows whose team isn't found go to `default_team`, and
/// all the players are inserted together.
#[instrument(skip(state, data), fields(len = data.len()))]
pub async fn import_csv(state: &State, data: &[u8], default_team: &TeamId) -> Result<ImportSummary> {
    state.require_user()?;
    let teams = state.store.list_teams().await?;
    let batch = decode_players(data, &teams, default_team)?;

    let inserted = state
        .store
        .insert_players(batch.players)
        .await
        .map_err(|e| {
            event!(Level::ERROR, error = %e, "Error importing players");
            Error::Import(e)
        })?;

    event!(
        Level::INFO,
        inserted = inserted.len(),
        skipped = batch.skipped,
        "Imported players"
    );
    Ok(ImportSummary {
        inserted: inserted.len(),
        skipped: batch.skipped,
    })
}

/// Export one team's roster.
#[instrument(skip(state, team), fields(team = %team.id))]
pub async fn export_team_csv(state: &State, team: &Team, today: NaiveDate) -> Result<ExportFile> {
    state.require_user()?;
    let players = state.store.list_players(&team.id).await?;
    if players.is_empty() {
        return Err(Error::NothingToExport);
    }

    Ok(ExportFile {
        filename: team_export_filename(&team.name, today),
        contents: encode_team(&team.name, &players)?,
        rows: players.len(),
    })
}

/// Export the players of every team in one file.
#[instrument(skip(state))]
pub async fn export_all_csv(state: &State, today: NaiveDate) -> Result<ExportFile> {
    state.require_user()?;
    let players = state.store.list_all_players().await.map_err(|e| {
        event!(Level::ERROR, error = %e, "Error fetching all players");
        Error::ExportAll(e)
    })?;
    if players.is_empty() {
        return Err(Error::NothingToExport);
    }

    Ok(ExportFile {
        filename: all_teams_export_filename(today),
        contents: encode_all_teams(&players)?,
        rows: players.len(),
    })
}
