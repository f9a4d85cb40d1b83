use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

pub use crate::schema::players::{dsl, table};
use crate::{
    object_id::{PlayerId, TeamId},
    schema::*,
    Position,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = players)]
pub struct Player {
    pub id: PlayerId,
    pub team_id: TeamId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub position: Position,
    pub jersey_number: Option<i32>,
    pub birth_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Player {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Insertable)]
#[diesel(table_name = players)]
pub struct NewPlayer {
    pub team_id: TeamId,
    pub first_name: String,
    pub last_name: String,
    pub position: Position,
    pub jersey_number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
}

/// The editable fields of a player. The team and birth date are not changed by edits.
#[derive(Clone, Debug, PartialEq, Serialize, AsChangeset)]
#[diesel(table_name = players, treat_none_as_null = true)]
pub struct PlayerUpdate {
    pub first_name: String,
    pub last_name: String,
    pub position: Position,
    pub jersey_number: Option<i32>,
}

/// A player together with the name of the team it belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerWithTeam {
    pub player: Player,
    pub team_name: Option<String>,
}

/// Sort players by jersey number, with unnumbered players last.
pub fn sort_by_jersey(players: &mut [Player]) {
    players.sort_by_key(|p| (p.jersey_number.is_none(), p.jersey_number));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(jersey_number: Option<i32>) -> Player {
        Player {
            id: PlayerId::new(),
            team_id: TeamId::from("a"),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            position: Position::Unset,
            jersey_number,
            birth_date: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn sort_puts_unnumbered_last() {
        let mut players = vec![player(None), player(Some(12)), player(Some(3))];
        sort_by_jersey(&mut players);
        let numbers = players.iter().map(|p| p.jersey_number).collect::<Vec<_>>();
        assert_eq!(numbers, vec![Some(3), Some(12), None]);
    }

    #[test]
    fn deserializes_store_row() {
        let json = r#"{
            "id": "0e9b3d8c-8f7c-4a34-9f3f-4b7c3e1c2a11",
            "team_id": "eagles",
            "first_name": "Jane",
            "last_name": "Doe",
            "position": null,
            "jersey_number": 7,
            "birth_date": "2010-04-01",
            "created_at": "2024-03-01T10:00:00+00:00"
        }"#;

        let p: Player = serde_json::from_str(json).unwrap();
        assert_eq!(p.position, Position::Unset);
        assert_eq!(p.jersey_number, Some(7));
        assert_eq!(p.birth_date, NaiveDate::from_ymd_opt(2010, 4, 1));
        assert_eq!(p.display_name(), "Jane Doe");
    }

    #[test]
    fn deserializes_text_position() {
        let json = r#"{
            "id": "0e9b3d8c-8f7c-4a34-9f3f-4b7c3e1c2a11",
            "team_id": "eagles",
            "first_name": "Jane",
            "last_name": "Doe",
            "position": "2",
            "jersey_number": null,
            "birth_date": null,
            "created_at": "2024-03-01T10:00:00+00:00"
        }"#;

        let p: Player = serde_json::from_str(json).unwrap();
        assert_eq!(p.position, Position::Forward);
        assert_eq!(p.jersey_number, None);
    }
}
