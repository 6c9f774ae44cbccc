use crate::db::error::StoreResult;
use crate::entities::{live_connections, prelude::*};
use sea_orm::{DatabaseConnection, EntityTrait, Set};

/// Repository for the set of currently open sessions.
pub struct ConnectionRepository {
    conn: DatabaseConnection,
}

impl ConnectionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Marks a client as connected. Adding an already-live client is a no-op.
    pub async fn add(&self, client_id: &str) -> StoreResult<()> {
        let active_model = live_connections::ActiveModel {
            client_id: Set(client_id.to_string()),
        };

        LiveConnections::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(live_connections::Column::ClientId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn remove(&self, client_id: &str) -> StoreResult<bool> {
        let result = LiveConnections::delete_by_id(client_id.to_string())
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn clear(&self) -> StoreResult<u64> {
        let result = LiveConnections::delete_many().exec(&self.conn).await?;
        Ok(result.rows_affected)
    }
}
