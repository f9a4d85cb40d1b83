use std::io::{BufRead, Write};

use clap::{Args, Subcommand};

use crate::{
    confirm::{DeleteFlow, DeleteTarget},
    ops,
    shared_state::State,
    Result,
};

#[derive(Debug, Args)]
pub struct TeamsArgs {
    #[clap(subcommand)]
    pub command: TeamsCommand,
}

#[derive(Debug, Subcommand)]
pub enum TeamsCommand {
    /// List your teams
    List,
    /// Create a team
    Create { name: String },
    /// Change a team's name. The team keeps its ID.
    Rename {
        /// The team's ID or current name
        team: String,
        name: String,
    },
    /// Delete a team and all of its players
    Delete {
        /// The team's ID or name
        team: String,
        /// Don't ask for confirmation
        #[clap(short, long)]
        yes: bool,
    },
}

pub async fn teams_command(
    state: &State,
    args: TeamsArgs,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> Result<()> {
    match args.command {
        TeamsCommand::List => {
            for team in ops::teams::list_teams(state).await? {
                writeln!(out, "{}\t{}", team.id, team.name)?;
            }
        }
        TeamsCommand::Create { name } => {
            let team = ops::teams::create_team(state, &name).await?;
            writeln!(out, "{}\t{}", team.id, team.name)?;
        }
        TeamsCommand::Rename { team, name } => {
            let team = ops::teams::find_team(state, &team).await?;
            let team = ops::teams::rename_team(state, &team.id, &name).await?;
            writeln!(out, "{}\t{}", team.id, team.name)?;
        }
        TeamsCommand::Delete { team, yes } => {
            let team = ops::teams::find_team(state, &team).await?;
            let mut flow = DeleteFlow::default();
            ops::teams::request_team_delete(state, &mut flow, &team).await?;
            delete_pending(state, &mut flow, yes, out, input).await?;
        }
    }

    Ok(())
}

/// Ask about the pending delete and carry it out if the user agrees.
pub(crate) async fn delete_pending(
    state: &State,
    flow: &mut DeleteFlow,
    yes: bool,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> Result<()> {
    let Some(target) = flow.pending() else {
        return Ok(());
    };

    if !super::ask_confirmation(target, yes, out, input)? {
        flow.cancel();
        writeln!(out, "Abgebrochen")?;
        return Ok(());
    }

    match ops::confirm_delete(state, flow).await? {
        Some(DeleteTarget::Team { name, .. }) => writeln!(out, "Team \"{name}\" gelöscht")?,
        Some(DeleteTarget::Player { name, .. }) => writeln!(out, "{name} gelöscht")?,
        None => {}
    }
    Ok(())
}
