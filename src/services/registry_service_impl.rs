//! `SeaORM` implementation of the `Registry` trait.

use crate::db::{ClientRow, HardDiskRow, Store};
use crate::domain::{ClientId, IdentityOrigin, MachineSpec, TotalStats};
use crate::services::registry_service::{Registry, RegistryError};
use async_trait::async_trait;
use tracing::{debug, info};

pub struct SeaOrmRegistry {
    store: Store,
}

impl SeaOrmRegistry {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Registry for SeaOrmRegistry {
    async fn resolve_or_create_identity(
        &self,
        username: &str,
    ) -> Result<(ClientId, IdentityOrigin), RegistryError> {
        if username.is_empty() {
            return Err(RegistryError::Validation(
                "Username must not be empty".to_string(),
            ));
        }

        if let Some(client_id) = self.store.find_identity_by_username(username).await? {
            debug!(username, client_id, "Resolved returning user");
            return Ok((ClientId::from(client_id), IdentityOrigin::Returning));
        }

        // A concurrent session may insert the same username first; the store
        // reports that as a conflict.
        let client_id = ClientId::generate();
        self.store
            .insert_identity(username, client_id.as_str())
            .await?;

        info!(username, client_id = %client_id, "Created new identity");
        Ok((client_id, IdentityOrigin::Created))
    }

    async fn provision_machine(
        &self,
        client_id: &ClientId,
        spec: &MachineSpec,
    ) -> Result<(), RegistryError> {
        self.store.insert_machine(client_id.as_str(), spec).await?;
        info!(client_id = %client_id, "Provisioned virtual machine");
        Ok(())
    }

    async fn abandon_identity(&self, client_id: &ClientId) -> Result<(), RegistryError> {
        self.store.delete_identity(client_id.as_str()).await?;
        info!(client_id = %client_id, "Abandoned unprovisioned identity");
        Ok(())
    }

    async fn remove_virtual_machine(&self, client_id: &ClientId) -> Result<(), RegistryError> {
        self.store.remove_machine_cascade(client_id.as_str()).await?;
        Ok(())
    }

    async fn machine_exists(&self, client_id: &ClientId) -> Result<bool, RegistryError> {
        Ok(self.store.machine_exists(client_id.as_str()).await?)
    }

    async fn update_machine(
        &self,
        client_id: &ClientId,
        spec: &MachineSpec,
    ) -> Result<(), RegistryError> {
        let updated = self.store.update_machine(client_id.as_str(), spec).await?;

        if !updated {
            return Err(RegistryError::NotFound(client_id.clone()));
        }

        info!(client_id = %client_id, "Updated virtual machine");
        Ok(())
    }

    async fn mark_connected(&self, client_id: &ClientId) -> Result<(), RegistryError> {
        self.store.add_live_connection(client_id.as_str()).await?;
        Ok(())
    }

    async fn mark_disconnected(&self, client_id: &ClientId) -> Result<(), RegistryError> {
        self.store.remove_live_connection(client_id.as_str()).await?;
        Ok(())
    }

    async fn clear_live_connections(&self) -> Result<u64, RegistryError> {
        Ok(self.store.clear_live_connections().await?)
    }

    async fn stats(&self) -> Result<TotalStats, RegistryError> {
        Ok(self.store.total_stats().await?)
    }

    async fn ever_connected(&self) -> Result<Vec<ClientRow>, RegistryError> {
        Ok(self.store.list_all_ever_connected().await?)
    }

    async fn currently_connected(&self) -> Result<Vec<ClientRow>, RegistryError> {
        Ok(self.store.list_currently_connected().await?)
    }

    async fn hard_disks(&self) -> Result<Vec<HardDiskRow>, RegistryError> {
        Ok(self.store.list_hard_disks().await?)
    }
}
