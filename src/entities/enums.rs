//! Enumerazioni - Tipi enumerati utilizzati nelle entità

use serde::{Deserialize, Serialize};

// ********************* ENUMERAZIONI UTILI **********************//

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "profile_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfileKind {
    DeafUser,
    Interpreter,
}

/// Stato di una richiesta. Nel database è la colonna `request.accepted`:
/// NULL = in attesa, TRUE = accettata, FALSE = rifiutata.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    /// Valore della colonna `accepted` corrispondente allo stato
    pub fn as_column(self) -> Option<bool> {
        match self {
            RequestStatus::Pending => None,
            RequestStatus::Accepted => Some(true),
            RequestStatus::Rejected => Some(false),
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

impl From<Option<bool>> for RequestStatus {
    fn from(accepted: Option<bool>) -> Self {
        match accepted {
            None => RequestStatus::Pending,
            Some(true) => RequestStatus::Accepted,
            Some(false) => RequestStatus::Rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_column_maps_to_status() {
        assert_eq!(RequestStatus::from(None), RequestStatus::Pending);
        assert_eq!(RequestStatus::from(Some(true)), RequestStatus::Accepted);
        assert_eq!(RequestStatus::from(Some(false)), RequestStatus::Rejected);
        assert_eq!(RequestStatus::Rejected.as_column(), Some(false));
        assert!(!RequestStatus::Pending.is_terminal());
    }
}
