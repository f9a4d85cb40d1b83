use roster_db::object_id::{PlayerId, TeamId};

/// Something the user asked to delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Team {
        id: TeamId,
        name: String,
        has_players: bool,
    },
    Player {
        id: PlayerId,
        name: String,
    },
}

impl DeleteTarget {
    pub fn title(&self) -> &'static str {
        match self {
            DeleteTarget::Team { .. } => "Team löschen",
            DeleteTarget::Player { .. } => "Spieler*in löschen",
        }
    }

    pub fn message(&self) -> String {
        match self {
            DeleteTarget::Team {
                name,
                has_players: true,
                ..
            } => format!(
                "Möchten Sie das Team \"{name}\" wirklich löschen? Alle Spieler*innen in diesem Team werden ebenfalls gelöscht."
            ),
            DeleteTarget::Team { name, .. } => {
                format!("Möchten Sie das Team \"{name}\" wirklich löschen?")
            }
            DeleteTarget::Player { name, .. } => {
                format!("Möchten Sie {name} wirklich aus dem Team entfernen?")
            }
        }
    }
}

/// Destructive actions go through two steps: a request that records what would be deleted,
/// and a confirmation that hands the target over for deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeleteFlow {
    #[default]
    Idle,
    PendingConfirmation(DeleteTarget),
}

impl DeleteFlow {
    /// Ask for confirmation to delete `target`, replacing any earlier pending request.
    pub fn request(&mut self, target: DeleteTarget) {
        *self = DeleteFlow::PendingConfirmation(target);
    }

    pub fn pending(&self) -> Option<&DeleteTarget> {
        match self {
            DeleteFlow::Idle => None,
            DeleteFlow::PendingConfirmation(target) => Some(target),
        }
    }

    /// Return to idle, yielding the target that should now be deleted. Confirming with
    /// nothing pending does nothing.
    pub fn confirm(&mut self) -> Option<DeleteTarget> {
        match std::mem::take(self) {
            DeleteFlow::Idle => None,
            DeleteFlow::PendingConfirmation(target) => Some(target),
        }
    }

    pub fn cancel(&mut self) {
        *self = DeleteFlow::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(has_players: bool) -> DeleteTarget {
        DeleteTarget::Team {
            id: TeamId::from("eagles"),
            name: "Eagles".to_string(),
            has_players,
        }
    }

    #[test]
    fn confirm_returns_target_once() {
        let mut flow = DeleteFlow::default();
        assert_eq!(flow.confirm(), None);

        flow.request(team(false));
        assert_eq!(flow.pending(), Some(&team(false)));
        assert_eq!(flow.confirm(), Some(team(false)));
        assert_eq!(flow, DeleteFlow::Idle);
        assert_eq!(flow.confirm(), None);
    }

    #[test]
    fn cancel_and_replace() {
        let mut flow = DeleteFlow::default();
        flow.request(team(true));
        flow.cancel();
        assert_eq!(flow.pending(), None);

        let player = DeleteTarget::Player {
            id: PlayerId::new(),
            name: "Jane Doe".to_string(),
        };
        flow.request(team(true));
        flow.request(player.clone());
        assert_eq!(flow.confirm(), Some(player));
    }

    #[test]
    fn prompts() {
        assert_eq!(team(false).title(), "Team löschen");
        assert_eq!(
            team(false).message(),
            "Möchten Sie das Team \"Eagles\" wirklich löschen?"
        );
        assert_eq!(
            team(true).message(),
            "Möchten Sie das Team \"Eagles\" wirklich löschen? Alle Spieler*innen in diesem Team werden ebenfalls gelöscht."
        );

        let player = DeleteTarget::Player {
            id: PlayerId::new(),
            name: "Jane Doe".to_string(),
        };
        assert_eq!(player.title(), "Spieler*in löschen");
        assert_eq!(
            player.message(),
            "Möchten Sie Jane Doe wirklich aus dem Team entfernen?"
        );
    }
}
