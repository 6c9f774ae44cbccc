use crate::db::error::{StoreError, StoreResult};
use crate::entities::{identities, prelude::*};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::debug;

pub struct IdentityRepository {
    conn: DatabaseConnection,
}

impl IdentityRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, username: &str, client_id: &str) -> StoreResult<()> {
        let active_model = identities::ActiveModel {
            username: Set(username.to_string()),
            client_id: Set(client_id.to_string()),
        };

        Identities::insert(active_model)
            .exec_without_returning(&self.conn)
            .await
            .map_err(StoreError::from_insert)?;

        debug!(username, client_id, "Inserted identity");
        Ok(())
    }

    pub async fn find_client_id(&self, username: &str) -> StoreResult<Option<String>> {
        let identity = Identities::find_by_id(username.to_string())
            .one(&self.conn)
            .await?;

        Ok(identity.map(|i| i.client_id))
    }

    pub async fn delete_by_client_id(&self, client_id: &str) -> StoreResult<u64> {
        let result = Identities::delete_many()
            .filter(identities::Column::ClientId.eq(client_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }
}
