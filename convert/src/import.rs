use csv::StringRecord;
use roster_db::{
    object_id::TeamId,
    players::NewPlayer,
    teams::{find_by_name, Team},
};
use tracing::{event, Level};

use crate::{columns, normalize_optional_position, Error};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// The players read from an import file, ready to be inserted in one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportBatch {
    pub players: Vec<NewPlayer>,
    /// Rows dropped because the first or last name was empty.
    pub skipped: usize,
}

/// Column positions for the headers present in the file.
struct ColumnIndexes {
    team: Option<usize>,
    first_name: Option<usize>,
    last_name: Option<usize>,
    position: Option<usize>,
    jersey_number: Option<usize>,
}

impl ColumnIndexes {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h == name);
        ColumnIndexes {
            team: find(columns::TEAM),
            first_name: find(columns::FIRST_NAME),
            last_name: find(columns::LAST_NAME),
            position: find(columns::POSITION),
            jersey_number: find(columns::JERSEY_NUMBER),
        }
    }
}

fn field(record: &StringRecord, index: Option<usize>) -> Option<&str> {
    index.and_then(|i| record.get(i))
}

/// Parse a jersey number. Blank values and values that are not an integer are treated as
/// no number.
pub fn parse_jersey_number(value: &str) -> Option<i32> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    match value.parse::<i32>() {
        Ok(n) => Some(n),
        Err(_) => {
            event!(Level::WARN, %value, "Ignoring jersey number that is not a number");
            None
        }
    }
}

/// Read players from an uploaded roster file.
///
/// Columns are looked up by header name, so their order doesn't matter. Rows without both
/// a first and last name are skipped. Each row is assigned to the team whose name matches
/// the Team column, ignoring case, or to `default_team` when no team matches.
pub fn decode_players(
    input: impl AsRef<[u8]>,
    teams: &[Team],
    default_team: &TeamId,
) -> Result<ImportBatch, Error> {
    let input = input.as_ref();
    let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(input);

    let indexes = ColumnIndexes::from_headers(reader.headers()?);

    let mut players = Vec::new();
    let mut skipped = 0;
    for record in reader.records() {
        let record = record?;

        let first_name = field(&record, indexes.first_name).unwrap_or_default().trim();
        let last_name = field(&record, indexes.last_name).unwrap_or_default().trim();
        if first_name.is_empty() || last_name.is_empty() {
            skipped += 1;
            continue;
        }

        let team_id = field(&record, indexes.team)
            .and_then(|name| find_by_name(teams, name))
            .map(|team| team.id.clone())
            .unwrap_or_else(|| default_team.clone());

        players.push(NewPlayer {
            team_id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            position: normalize_optional_position(field(&record, indexes.position)),
            jersey_number: field(&record, indexes.jersey_number).and_then(parse_jersey_number),
            birth_date: None,
        });
    }

    if players.is_empty() {
        return Err(Error::NoValidRows);
    }

    event!(Level::DEBUG, count = players.len(), skipped, "Decoded roster file");
    Ok(ImportBatch { players, skipped })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;
    use roster_db::{
        object_id::{PlayerId, UserId},
        players::Player,
        Position,
    };

    use super::*;
    use crate::encode_team;

    fn team(name: &str) -> Team {
        Team {
            id: TeamId::from_name(name),
            name: name.to_string(),
            user_id: UserId::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn drops_rows_without_names() {
        let input = "Vorname,Nachname,Position,Trikotnummer\n,Smith,2,\nJane,Doe,Stürmer*in,7\n";
        let default_team = TeamId::from("eagles");
        let batch = decode_players(input, &[], &default_team).unwrap();

        assert_eq!(batch.skipped, 1);
        assert_eq!(
            batch.players,
            vec![NewPlayer {
                team_id: default_team,
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                position: Position::Forward,
                jersey_number: Some(7),
                birth_date: None,
            }]
        );
    }

    #[test]
    fn resolves_team_by_name() {
        let teams = vec![team("Eagles"), team("Red Wings")];
        let default_team = TeamId::from("fallback");
        let input = "Team,Vorname,Nachname\n\
            red wings,A,One\n\
            Unknown Team,B,Two\n\
            ,C,Three\n\
            EAGLES ,D,Four\n";

        let batch = decode_players(input, &teams, &default_team).unwrap();
        let team_ids = batch
            .players
            .iter()
            .map(|p| p.team_id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(team_ids, vec!["red-wings", "fallback", "fallback", "eagles"]);
    }

    #[test]
    fn column_order_does_not_matter() {
        let input = "Trikotnummer,Position,Nachname,Team,Vorname\n12,Goali, Muster ,x, Max\n";
        let batch = decode_players(input, &[], &TeamId::from("t")).unwrap();
        let p = &batch.players[0];
        assert_eq!(p.first_name, "Max");
        assert_eq!(p.last_name, "Muster");
        assert_eq!(p.position, Position::Goalie);
        assert_eq!(p.jersey_number, Some(12));
    }

    #[test]
    fn header_names_are_case_sensitive() {
        let input = "vorname,nachname\nJane,Doe\n";
        let result = decode_players(input, &[], &TeamId::from("t"));
        assert_matches!(result, Err(Error::NoValidRows));
    }

    #[test]
    fn invalid_jersey_numbers_become_none() {
        let input = "Vorname,Nachname,Trikotnummer\nA,B,abc\nC,D,\nE,F, 9 \n";
        let batch = decode_players(input, &[], &TeamId::from("t")).unwrap();
        let numbers = batch
            .players
            .iter()
            .map(|p| p.jersey_number)
            .collect::<Vec<_>>();
        assert_eq!(numbers, vec![None, None, Some(9)]);
    }

    #[test]
    fn missing_position_is_unset() {
        let input = "Vorname,Nachname\nJane,Doe\n";
        let batch = decode_players(input, &[], &TeamId::from("t")).unwrap();
        assert_eq!(batch.players[0].position, Position::Unset);
        assert_eq!(batch.players[0].jersey_number, None);
    }

    #[test]
    fn short_rows_and_bom() {
        let input = "\u{feff}Vorname,Nachname,Position,Trikotnummer\r\nJane,Doe\r\n";
        let batch = decode_players(input, &[], &TeamId::from("t")).unwrap();
        assert_eq!(batch.players.len(), 1);
        assert_eq!(batch.players[0].first_name, "Jane");
    }

    #[test]
    fn no_valid_rows() {
        let input = "Team,Vorname,Nachname,Position,Trikotnummer\nEagles,,Doe,1,\nEagles,  ,  ,,\n";
        let result = decode_players(input, &[], &TeamId::from("t"));
        assert_matches!(result, Err(Error::NoValidRows));

        let header_only = "Team,Vorname,Nachname,Position,Trikotnummer\n";
        assert_matches!(
            decode_players(header_only, &[], &TeamId::from("t")),
            Err(Error::NoValidRows)
        );
    }

    #[test]
    fn round_trip() {
        let eagles = team("Eagles");
        let players = Position::ALL
            .iter()
            .enumerate()
            .map(|(i, position)| Player {
                id: PlayerId::new(),
                team_id: eagles.id.clone(),
                first_name: format!("First, {i}"),
                last_name: format!("Last \"{i}\""),
                position: *position,
                jersey_number: if i % 2 == 0 { Some(i as i32 * 10) } else { None },
                birth_date: None,
                created_at: Utc::now(),
            })
            .collect::<Vec<_>>();

        let csv = encode_team(&eagles.name, &players).unwrap();
        let batch =
            decode_players(&csv, std::slice::from_ref(&eagles), &TeamId::from("other")).unwrap();

        assert_eq!(batch.skipped, 0);
        assert_eq!(batch.players.len(), players.len());
        for (decoded, original) in batch.players.iter().zip(players.iter()) {
            assert_eq!(decoded.team_id, eagles.id);
            assert_eq!(decoded.first_name, original.first_name);
            assert_eq!(decoded.last_name, original.last_name);
            assert_eq!(decoded.position, original.position);
            assert_eq!(decoded.jersey_number, original.jersey_number);
        }
    }
}
