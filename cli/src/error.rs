use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub const TEAM_EXISTS: &str = "Ein Team mit diesem Namen existiert bereits.";
pub const GENERIC_FAILURE: &str = "Ein Fehler ist aufgetreten. Bitte versuchen Sie es später erneut.";
pub const NAMES_REQUIRED: &str = "Vor- und Nachname sind erforderlich.";
pub const TEAM_NAME_REQUIRED: &str = "Bitte geben Sie einen Teamnamen ein.";
pub const NO_VALID_ROWS: &str = "Keine gültigen Spielerdaten in der CSV-Datei gefunden.";
pub const IMPORT_FAILED: &str = "Fehler beim Importieren der Spieler.";
pub const EXPORT_ALL_FAILED: &str = "Fehler beim Exportieren aller Spieler.";
pub const NOTHING_TO_EXPORT: &str = "Keine Spieler zum Exportieren gefunden.";
pub const SIGN_IN_REQUIRED: &str = "Bitte melden Sie sich an.";

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid input: {0}")]
    Validation(&'static str),

    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Store error: {0}")]
    Store(#[from] roster_store::Error),

    #[error("Auth error: {0}")]
    Auth(#[from] roster_auth::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] roster_convert::Error),

    #[error("Importing players: {0}")]
    Import(roster_store::Error),

    #[error("Exporting all players: {0}")]
    ExportAll(roster_store::Error),

    #[error("No players to export")]
    NothingToExport,

    #[error("Unknown team {0}")]
    UnknownTeam(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    pub fn error_kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation",
            Error::Unauthenticated => "authn",
            Error::Store(roster_store::Error::Conflict { .. }) => "conflict",
            Error::Store(roster_store::Error::NotFound) => "not_found",
            Error::Store(roster_store::Error::Unauthenticated(_)) => "authn",
            Error::Store(_) => "store",
            Error::Auth(_) => "auth",
            Error::Csv(roster_convert::Error::NoValidRows) => "no_valid_rows",
            Error::Csv(_) => "csv",
            Error::Import(_) => "store",
            Error::ExportAll(_) => "store",
            Error::NothingToExport => "nothing_to_export",
            Error::UnknownTeam(_) => "not_found",
            Error::Migration(_) => "db",
            Error::Config(_) => "config",
            Error::IoError(_) => "io",
        }
    }

    /// The message to show the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation(message) => message.to_string(),
            Error::Unauthenticated | Error::Store(roster_store::Error::Unauthenticated(_)) => {
                SIGN_IN_REQUIRED.to_string()
            }
            Error::Store(e) if e.is_conflict() => TEAM_EXISTS.to_string(),
            Error::Auth(e) => e.user_message(),
            Error::Csv(roster_convert::Error::NoValidRows) => NO_VALID_ROWS.to_string(),
            Error::Import(_) => IMPORT_FAILED.to_string(),
            Error::ExportAll(_) => EXPORT_ALL_FAILED.to_string(),
            Error::NothingToExport => NOTHING_TO_EXPORT.to_string(),
            Error::UnknownTeam(team) => format!("Team \"{team}\" nicht gefunden."),
            Error::Config(message) => message.clone(),
            Error::IoError(e) => e.to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}
