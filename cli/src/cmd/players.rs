use std::io::{BufRead, Write};

use clap::{Args, Subcommand};
use roster_convert::normalize_position;
use roster_db::{object_id::PlayerId, players::Player};

use crate::{
    confirm::DeleteFlow,
    ops::{self, players::PlayerInput},
    shared_state::State,
    Result,
};

#[derive(Debug, Args)]
pub struct PlayersArgs {
    #[clap(subcommand)]
    pub command: PlayersCommand,
}

#[derive(Debug, Args)]
pub struct PlayerFields {
    #[clap(long)]
    pub first_name: Option<String>,
    #[clap(long)]
    pub last_name: Option<String>,
    /// A position number from 1 to 5 or a name such as "Stürmer*in" or "goalie"
    #[clap(long)]
    pub position: Option<String>,
    #[clap(long)]
    pub jersey_number: Option<String>,
    /// Remove the jersey number
    #[clap(long, conflicts_with = "jersey_number")]
    pub no_jersey_number: bool,
}

impl PlayerFields {
    /// Apply the given fields on top of `input`.
    fn merge_into(self, mut input: PlayerInput) -> PlayerInput {
        if let Some(first_name) = self.first_name {
            input.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            input.last_name = last_name;
        }
        if let Some(position) = self.position {
            input.position = normalize_position(&position);
        }
        if self.no_jersey_number {
            input.jersey_number = None;
        } else if let Some(jersey_number) = self.jersey_number {
            input.jersey_number = Some(jersey_number);
        }
        input
    }
}

#[derive(Debug, Subcommand)]
pub enum PlayersCommand {
    /// List a team's players
    List {
        /// The team's ID or name
        #[clap(short, long)]
        team: String,
    },
    /// Add a player to a team
    Add {
        #[clap(short, long)]
        team: String,
        #[clap(flatten)]
        fields: PlayerFields,
    },
    /// Change a player. Fields that aren't given keep their value.
    Edit {
        id: PlayerId,
        #[clap(flatten)]
        fields: PlayerFields,
    },
    /// Remove a player from their team
    Delete {
        id: PlayerId,
        #[clap(short, long)]
        yes: bool,
    },
}

fn write_player(out: &mut dyn Write, player: &Player) -> std::io::Result<()> {
    let jersey_number = player
        .jersey_number
        .map(|n| n.to_string())
        .unwrap_or_default();
    writeln!(
        out,
        "{}\t{}\t{}\t{}",
        player.id,
        jersey_number,
        player.display_name(),
        player.position
    )
}

pub async fn players_command(
    state: &State,
    args: PlayersArgs,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> Result<()> {
    match args.command {
        PlayersCommand::List { team } => {
            let team = ops::teams::find_team(state, &team).await?;
            for player in ops::players::list_players(state, &team.id).await? {
                write_player(out, &player)?;
            }
        }
        PlayersCommand::Add { team, fields } => {
            let team = ops::teams::find_team(state, &team).await?;
            let input = fields.merge_into(PlayerInput::default());
            let player = ops::players::create_player(state, &team.id, &input).await?;
            write_player(out, &player)?;
        }
        PlayersCommand::Edit { id, fields } => {
            let existing = ops::players::get_player(state, id).await?;
            let input = fields.merge_into(PlayerInput::from_player(&existing));
            let player = ops::players::update_player(state, id, &input).await?;
            write_player(out, &player)?;
        }
        PlayersCommand::Delete { id, yes } => {
            let mut flow = DeleteFlow::default();
            ops::players::request_player_delete(state, &mut flow, id).await?;
            super::teams::delete_pending(state, &mut flow, yes, out, input).await?;
        }
    }

    Ok(())
}
