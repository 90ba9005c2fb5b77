//! Profile DTOs - Data Transfer Objects per profili

use crate::entities::{Profile, ProfileKind};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProfileDTO {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub photo: Option<String>,
    pub kind: ProfileKind,
}

impl From<Profile> for ProfileDTO {
    fn from(value: Profile) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            photo: value.photo,
            kind: value.kind,
        }
    }
}
