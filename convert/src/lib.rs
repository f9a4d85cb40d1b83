mod error;
mod export;
mod import;
mod position;

pub use error::*;
pub use export::*;
pub use import::*;
pub use position::*;

/// Column headers shared by exported and imported roster files.
pub mod columns {
    pub const TEAM: &str = "Team";
    pub const FIRST_NAME: &str = "Vorname";
    pub const LAST_NAME: &str = "Nachname";
    pub const POSITION: &str = "Position";
    pub const JERSEY_NUMBER: &str = "Trikotnummer";

    pub const ALL: [&str; 5] = [TEAM, FIRST_NAME, LAST_NAME, POSITION, JERSEY_NUMBER];
}
