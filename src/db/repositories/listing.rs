use crate::db::error::StoreResult;
use crate::entities::{identities, live_connections, machines, prelude::*};
use sea_orm::{
    DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryOrder, QuerySelect,
    RelationDef, Select,
};

/// Read-only joins over identities, machines and live connections.
pub struct ListingRepository {
    conn: DatabaseConnection,
}

// Ownership is not modelled as an entity relation (no foreign keys in the
// schema), so joins are spelled out on client_id.
fn identity_to_machine() -> RelationDef {
    Identities::belongs_to(Machines)
        .from(identities::Column::ClientId)
        .to(machines::Column::ClientId)
        .into()
}

fn identity_to_live_connection() -> RelationDef {
    Identities::belongs_to(LiveConnections)
        .from(identities::Column::ClientId)
        .to(live_connections::Column::ClientId)
        .into()
}

impl ListingRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn client_rows(machine_join: JoinType) -> Select<Identities> {
        Identities::find()
            .select_only()
            .column(identities::Column::Username)
            .column(identities::Column::ClientId)
            .column(machines::Column::RamSize)
            .column(machines::Column::CpuCount)
            .column(machines::Column::HddSize)
            .column(machines::Column::HddId)
            .join(machine_join, identity_to_machine())
            .order_by_asc(identities::Column::Username)
    }

    /// Every known identity, with machine attributes when the machine exists.
    pub async fn ever_connected(&self) -> StoreResult<Vec<ClientRow>> {
        let rows = Self::client_rows(JoinType::LeftJoin)
            .into_model::<ClientRow>()
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn currently_connected(&self) -> StoreResult<Vec<ClientRow>> {
        let rows = Self::client_rows(JoinType::InnerJoin)
            .join(JoinType::InnerJoin, identity_to_live_connection())
            .into_model::<ClientRow>()
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn hard_disks(&self) -> StoreResult<Vec<HardDiskRow>> {
        let rows = Identities::find()
            .select_only()
            .column(identities::Column::Username)
            .column(machines::Column::HddSize)
            .join(JoinType::InnerJoin, identity_to_machine())
            .order_by_asc(identities::Column::Username)
            .into_model::<HardDiskRow>()
            .all(&self.conn)
            .await?;

        Ok(rows)
    }
}

/// One identity joined with its machine. Machine columns are `None` when the
/// machine row is missing.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct ClientRow {
    pub username: String,
    pub client_id: String,
    pub ram_size: Option<String>,
    pub cpu_count: Option<String>,
    pub hdd_size: Option<String>,
    pub hdd_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct HardDiskRow {
    pub username: String,
    pub hdd_size: String,
}
