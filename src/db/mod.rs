use crate::domain::{MachineSpec, TotalStats};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod error;
pub mod migrator;
pub mod repositories;

pub use error::{StoreError, StoreResult};
pub use repositories::listing::{ClientRow, HardDiskRow};

/// The record store: identities, machines and live connections in SQLite.
///
/// Every method runs as its own short transaction; nothing is held open
/// between calls.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> StoreResult<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn identity_repo(&self) -> repositories::identity::IdentityRepository {
        repositories::identity::IdentityRepository::new(self.conn.clone())
    }

    fn machine_repo(&self) -> repositories::machine::MachineRepository {
        repositories::machine::MachineRepository::new(self.conn.clone())
    }

    fn connection_repo(&self) -> repositories::connection::ConnectionRepository {
        repositories::connection::ConnectionRepository::new(self.conn.clone())
    }

    fn listing_repo(&self) -> repositories::listing::ListingRepository {
        repositories::listing::ListingRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Identities
    // ========================================================================

    pub async fn insert_identity(&self, username: &str, client_id: &str) -> StoreResult<()> {
        self.identity_repo().insert(username, client_id).await
    }

    pub async fn find_identity_by_username(&self, username: &str) -> StoreResult<Option<String>> {
        self.identity_repo().find_client_id(username).await
    }

    pub async fn delete_identity(&self, client_id: &str) -> StoreResult<()> {
        self.identity_repo().delete_by_client_id(client_id).await?;
        Ok(())
    }

    // ========================================================================
    // Machines
    // ========================================================================

    pub async fn insert_machine(&self, client_id: &str, spec: &MachineSpec) -> StoreResult<()> {
        self.machine_repo().insert(client_id, spec).await
    }

    pub async fn update_machine(&self, client_id: &str, spec: &MachineSpec) -> StoreResult<bool> {
        self.machine_repo().update(client_id, spec).await
    }

    pub async fn delete_machine(&self, client_id: &str) -> StoreResult<()> {
        self.machine_repo().delete(client_id).await?;
        Ok(())
    }

    pub async fn remove_machine_cascade(&self, client_id: &str) -> StoreResult<bool> {
        self.machine_repo().remove_with_identity(client_id).await
    }

    pub async fn machine_exists(&self, client_id: &str) -> StoreResult<bool> {
        self.machine_repo().exists(client_id).await
    }

    pub async fn total_stats(&self) -> StoreResult<TotalStats> {
        let machines = self.machine_repo().list_all().await?;

        Ok(TotalStats::from_machines(
            machines.len() as u64,
            machines
                .iter()
                .map(|m| (m.ram_size.as_str(), m.cpu_count.as_str())),
        ))
    }

    // ========================================================================
    // Live connections
    // ========================================================================

    pub async fn add_live_connection(&self, client_id: &str) -> StoreResult<()> {
        self.connection_repo().add(client_id).await
    }

    pub async fn remove_live_connection(&self, client_id: &str) -> StoreResult<()> {
        self.connection_repo().remove(client_id).await?;
        Ok(())
    }

    pub async fn clear_live_connections(&self) -> StoreResult<u64> {
        self.connection_repo().clear().await
    }

    // ========================================================================
    // Listings
    // ========================================================================

    pub async fn list_all_ever_connected(&self) -> StoreResult<Vec<ClientRow>> {
        self.listing_repo().ever_connected().await
    }

    pub async fn list_currently_connected(&self) -> StoreResult<Vec<ClientRow>> {
        self.listing_repo().currently_connected().await
    }

    pub async fn list_hard_disks(&self) -> StoreResult<Vec<HardDiskRow>> {
        self.listing_repo().hard_disks().await
    }
}
