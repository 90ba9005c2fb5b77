//! Profile entity - Utente dell'app (persona sorda o interprete)

use super::enums::ProfileKind;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Profile {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub photo: Option<String>,
    pub kind: ProfileKind,
}

impl Profile {
    pub fn is_interpreter(&self) -> bool {
        self.kind == ProfileKind::Interpreter
    }
}
