use chrono::NaiveDate;
use roster_db::{
    players::{Player, PlayerWithTeam},
    Position,
};

use crate::{columns, Error};

/// One line of an exported roster.
#[derive(Debug, Clone, Copy)]
pub struct ExportRow<'a> {
    pub team_name: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub position: Position,
    pub jersey_number: Option<i32>,
}

impl<'a> ExportRow<'a> {
    pub fn new(team_name: &'a str, player: &'a Player) -> Self {
        ExportRow {
            team_name,
            first_name: &player.first_name,
            last_name: &player.last_name,
            position: player.position,
            jersey_number: player.jersey_number,
        }
    }
}

/// Write the header and one record per row, in the order given.
pub fn encode_rows<'a>(rows: impl IntoIterator<Item = ExportRow<'a>>) -> Result<String, Error> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(columns::ALL)?;
    for row in rows {
        let jersey_number = row
            .jersey_number
            .map(|n| n.to_string())
            .unwrap_or_default();
        writer.write_record([
            row.team_name,
            row.first_name,
            row.last_name,
            row.position.label(),
            jersey_number.as_str(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    // Every field came from a `&str`, so the output is always UTF-8.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Export the roster of a single team.
pub fn encode_team(team_name: &str, players: &[Player]) -> Result<String, Error> {
    encode_rows(players.iter().map(|p| ExportRow::new(team_name, p)))
}

/// Export players from every team. Players whose team could not be resolved get an empty
/// team column.
pub fn encode_all_teams(players: &[PlayerWithTeam]) -> Result<String, Error> {
    encode_rows(
        players
            .iter()
            .map(|p| ExportRow::new(p.team_name.as_deref().unwrap_or_default(), &p.player)),
    )
}

pub fn team_export_filename(team_name: &str, date: NaiveDate) -> String {
    let team_name = team_name.replace(['/', '\\'], "-");
    format!("spieler_{team_name}_{}.csv", date.format("%Y-%m-%d"))
}

pub fn all_teams_export_filename(date: NaiveDate) -> String {
    format!("alle_spieler_{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use roster_db::object_id::{PlayerId, TeamId};

    use super::*;

    fn player(first: &str, last: &str, position: Position, jersey_number: Option<i32>) -> Player {
        Player {
            id: PlayerId::new(),
            team_id: TeamId::from("eagles"),
            first_name: first.to_string(),
            last_name: last.to_string(),
            position,
            jersey_number,
            birth_date: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn header_and_labels() {
        let players = vec![
            player("Jane", "Doe", Position::Forward, Some(7)),
            player("Max", "Muster", Position::Unset, None),
        ];

        let csv = encode_team("Eagles", &players).unwrap();
        let lines = csv.lines().collect::<Vec<_>>();
        assert_eq!(
            lines,
            vec![
                "Team,Vorname,Nachname,Position,Trikotnummer",
                "Eagles,Jane,Doe,Stürmer*in,7",
                "Eagles,Max,Muster,Position nicht gewählt,",
            ]
        );
        assert!(csv.ends_with("\r\n"));
    }

    #[test]
    fn quotes_special_fields() {
        let players = vec![player("Anna, Jr.", "O\"Neil", Position::Goalie, Some(1))];
        let csv = encode_team("Line\nBreak", &players).unwrap();
        assert!(
            csv.ends_with("\"Line\nBreak\",\"Anna, Jr.\",\"O\"\"Neil\",Goali,1\r\n"),
            "{csv:?}"
        );
    }

    #[test]
    fn all_teams_keeps_input_order() {
        let players = vec![
            PlayerWithTeam {
                player: player("B", "Two", Position::Center, Some(2)),
                team_name: Some("Zebras".to_string()),
            },
            PlayerWithTeam {
                player: player("A", "One", Position::Defense, Some(1)),
                team_name: None,
            },
        ];

        let csv = encode_all_teams(&players).unwrap();
        let lines = csv.lines().skip(1).collect::<Vec<_>>();
        assert_eq!(
            lines,
            vec!["Zebras,B,Two,Center*in,2", ",A,One,Verteidiger*in,1"]
        );
    }

    #[test]
    fn empty_roster_is_header_only() {
        let csv = encode_team("Eagles", &[]).unwrap();
        assert_eq!(csv, "Team,Vorname,Nachname,Position,Trikotnummer\r\n");
    }

    #[test]
    fn filenames() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            team_export_filename("U15/U17 Mixed", date),
            "spieler_U15-U17 Mixed_2024-03-09.csv"
        );
        assert_eq!(all_teams_export_filename(date), "alle_spieler_2024-03-09.csv");
    }
}
