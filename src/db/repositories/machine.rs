use crate::db::error::{StoreError, StoreResult};
use crate::domain::MachineSpec;
use crate::entities::{identities, machines, prelude::*};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::{debug, info};

pub struct MachineRepository {
    conn: DatabaseConnection,
}

impl MachineRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, client_id: &str, spec: &MachineSpec) -> StoreResult<()> {
        let active_model = machines::ActiveModel {
            client_id: Set(client_id.to_string()),
            ram_size: Set(spec.ram_size.clone()),
            cpu_count: Set(spec.cpu_count.clone()),
            hdd_size: Set(spec.hdd_size.clone()),
            hdd_id: Set(spec.hdd_id.clone()),
        };

        Machines::insert(active_model)
            .exec_without_returning(&self.conn)
            .await
            .map_err(StoreError::from_insert)?;

        debug!(client_id, "Inserted machine");
        Ok(())
    }

    /// Overwrites all four attributes. Returns `false` if no such machine exists.
    pub async fn update(&self, client_id: &str, spec: &MachineSpec) -> StoreResult<bool> {
        let result = Machines::update_many()
            .col_expr(
                machines::Column::RamSize,
                sea_orm::sea_query::Expr::value(spec.ram_size.clone()),
            )
            .col_expr(
                machines::Column::CpuCount,
                sea_orm::sea_query::Expr::value(spec.cpu_count.clone()),
            )
            .col_expr(
                machines::Column::HddSize,
                sea_orm::sea_query::Expr::value(spec.hdd_size.clone()),
            )
            .col_expr(
                machines::Column::HddId,
                sea_orm::sea_query::Expr::value(spec.hdd_id.clone()),
            )
            .filter(machines::Column::ClientId.eq(client_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn delete(&self, client_id: &str) -> StoreResult<u64> {
        let result = Machines::delete_by_id(client_id.to_string())
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }

    /// Deletes the machine and its owning identity in one transaction.
    pub async fn remove_with_identity(&self, client_id: &str) -> StoreResult<bool> {
        let txn = self.conn.begin().await?;

        let machine = Machines::delete_by_id(client_id.to_string())
            .exec(&txn)
            .await?;

        let identity = Identities::delete_many()
            .filter(identities::Column::ClientId.eq(client_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        let removed = machine.rows_affected > 0 || identity.rows_affected > 0;
        if removed {
            info!(client_id, "Removed virtual machine");
        }
        Ok(removed)
    }

    pub async fn exists(&self, client_id: &str) -> StoreResult<bool> {
        let count = Machines::find()
            .filter(machines::Column::ClientId.eq(client_id))
            .count(&self.conn)
            .await?;

        Ok(count > 0)
    }

    pub async fn list_all(&self) -> StoreResult<Vec<machines::Model>> {
        Ok(Machines::find().all(&self.conn).await?)
    }
}
