//! ProfileRepository - Repository per la lettura dei profili

use super::Read;
use crate::entities::Profile;
use sqlx::{Error, MySqlPool};

// I profili sono di proprietà del backend di autenticazione: qui si leggono e basta
pub struct ProfileRepository {
    connection_pool: MySqlPool,
}

impl ProfileRepository {
    pub fn new(connection_pool: MySqlPool) -> Self {
        Self { connection_pool }
    }

    /// Tutti gli interpreti, in ordine alfabetico
    pub async fn find_interpreters(&self) -> Result<Vec<Profile>, Error> {
        let profiles = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, name, email, photo, kind
            FROM profile
            WHERE kind = 'INTERPRETER'
            ORDER BY name
            "#,
        )
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(profiles)
    }
}

impl Read<Profile, i32> for ProfileRepository {
    async fn read(&self, id: &i32) -> Result<Option<Profile>, Error> {
        let profile = sqlx::query_as::<_, Profile>(
            "SELECT id, name, email, photo, kind FROM profile WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(profile)
    }
}
