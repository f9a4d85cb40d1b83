use diesel::{
    deserialize::FromSql,
    pg::Pg,
    serialize::{IsNull, Output, ToSql},
    sql_types::Integer,
};
use std::io::Write;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A player's role on the team. The numeric codes are what the store persists.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, Default, AsExpression, FromSqlRow)]
#[diesel(sql_type = Integer)]
pub enum Position {
    #[default]
    Unset = 1,
    Forward = 2,
    Center = 3,
    Defense = 4,
    Goalie = 5,
}

impl Position {
    pub const ALL: [Position; 5] = [
        Position::Unset,
        Position::Forward,
        Position::Center,
        Position::Defense,
        Position::Goalie,
    ];

    pub fn code(&self) -> i32 {
        *self as i32
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Unset),
            2 => Some(Self::Forward),
            3 => Some(Self::Center),
            4 => Some(Self::Defense),
            5 => Some(Self::Goalie),
            _ => None,
        }
    }

    /// The label shown to users and written to exported files.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unset => "Position nicht gewählt",
            Self::Forward => "Stürmer*in",
            Self::Center => "Center*in",
            Self::Defense => "Verteidiger*in",
            Self::Goalie => "Goali",
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Position {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i32(self.code())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPosition {
    Code(i64),
    Text(String),
}

/// Rows written before positions were required carry `null`, which reads as unset. Tables
/// with a text column send the code as a string; text that isn't a code is unset too.
impl<'de> Deserialize<'de> for Position {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawPosition>::deserialize(deserializer)? {
            None => Ok(Position::Unset),
            Some(RawPosition::Code(code)) => Position::from_code(code).ok_or_else(|| {
                serde::de::Error::custom(format!("invalid position code {code}"))
            }),
            Some(RawPosition::Text(text)) => Ok(text
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(Position::from_code)
                .unwrap_or_default()),
        }
    }
}

impl FromSql<Integer, Pg> for Position {
    fn from_sql(bytes: diesel::backend::RawValue<'_, Pg>) -> diesel::deserialize::Result<Self> {
        let code = <i32 as FromSql<Integer, Pg>>::from_sql(bytes)?;
        Position::from_code(i64::from(code))
            .ok_or_else(|| format!("invalid position code {code}").into())
    }
}

impl ToSql<Integer, Pg> for Position {
    fn to_sql(&self, out: &mut Output<Pg>) -> diesel::serialize::Result {
        out.write_all(&self.code().to_be_bytes())?;
        Ok(IsNull::No)
    }
}
