use std::{ops::Deref, str::FromStr};

use diesel::{
    deserialize::FromSql,
    pg::Pg,
    serialize::{Output, ToSql},
    sql_types,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::new_uuid;

/// A team's identifier. It is derived from the team name when the team is created and never
/// changes afterwards, even when the team is renamed.
#[derive(
    Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[serde(transparent)]
#[diesel(sql_type = sql_types::Text)]
pub struct TeamId(String);

impl TeamId {
    /// Lowercase the name and collapse each run of whitespace into a single hyphen.
    pub fn from_name(name: &str) -> Self {
        let lower = name.trim().to_lowercase();
        let slug = lower.split_whitespace().collect::<Vec<_>>().join("-");
        Self(slug)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for TeamId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TeamId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromSql<sql_types::Text, Pg> for TeamId {
    fn from_sql(bytes: diesel::backend::RawValue<'_, Pg>) -> diesel::deserialize::Result<Self> {
        <String as FromSql<sql_types::Text, Pg>>::from_sql(bytes).map(Self)
    }
}

impl ToSql<sql_types::Text, Pg> for TeamId {
    fn to_sql(&self, out: &mut Output<Pg>) -> diesel::serialize::Result {
        <String as ToSql<sql_types::Text, Pg>>::to_sql(&self.0, &mut out.reborrow())
    }
}

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name: ident) => {
        $(#[$meta])*
        #[derive(
            Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize, AsExpression, FromSqlRow,
        )]
        #[serde(transparent)]
        #[diesel(sql_type = sql_types::Uuid)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(new_uuid())
            }

            pub fn from_uuid(u: Uuid) -> Self {
                Self(u)
            }

            pub fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Deref for $name {
            type Target = Uuid;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(u: Uuid) -> Self {
                Self(u)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl FromSql<sql_types::Uuid, Pg> for $name {
            fn from_sql(
                bytes: diesel::backend::RawValue<'_, Pg>,
            ) -> diesel::deserialize::Result<Self> {
                <Uuid as FromSql<sql_types::Uuid, Pg>>::from_sql(bytes).map(Self)
            }
        }

        impl ToSql<sql_types::Uuid, Pg> for $name {
            fn to_sql(&self, out: &mut Output<Pg>) -> diesel::serialize::Result {
                <Uuid as ToSql<sql_types::Uuid, Pg>>::to_sql(&self.0, &mut out.reborrow())
            }
        }
    };
}

uuid_id!(
    /// A player's identifier, assigned when the player is stored.
    PlayerId
);
uuid_id!(
    /// The auth provider's identifier for a user.
    UserId
);
