use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

pub use crate::schema::teams::{dsl, table};
use crate::{
    object_id::{TeamId, UserId},
    schema::*,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = teams)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Insertable)]
#[diesel(table_name = teams)]
pub struct NewTeam {
    pub id: TeamId,
    pub name: String,
    pub user_id: UserId,
}

impl NewTeam {
    /// Build a team from its display name, deriving the ID from the name.
    pub fn from_name(name: &str, user_id: UserId) -> Self {
        let name = name.trim();
        NewTeam {
            id: TeamId::from_name(name),
            name: name.to_string(),
            user_id,
        }
    }
}

/// Find a team by its name, ignoring case and surrounding whitespace.
pub fn find_by_name<'a>(teams: &'a [Team], name: &str) -> Option<&'a Team> {
    let wanted = name.trim().to_lowercase();
    teams.iter().find(|t| t.name.to_lowercase() == wanted)
}
