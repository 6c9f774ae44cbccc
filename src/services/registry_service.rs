//! Domain service for virtual machine registration and connection tracking.
//!
//! Sits between sessions and the record store: resolves usernames to client
//! ids, provisions and removes machines, and answers the listing queries.

use crate::db::{ClientRow, HardDiskRow, StoreError};
use crate::domain::{ClientId, IdentityOrigin, MachineSpec, TotalStats};
use thiserror::Error;

/// Errors specific to registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("No virtual machine found for client {0}")]
    NotFound(ClientId),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::Unavailable(e) => Self::StoreUnavailable(e.to_string()),
        }
    }
}

/// Domain service trait for the machine registry.
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Looks up a username, creating a new identity with a fresh client id if
    /// it is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Conflict`] if another session registered the
    /// same username between the lookup and the insert.
    async fn resolve_or_create_identity(
        &self,
        username: &str,
    ) -> Result<(ClientId, IdentityOrigin), RegistryError>;

    /// Creates the machine record for a freshly created identity.
    async fn provision_machine(
        &self,
        client_id: &ClientId,
        spec: &MachineSpec,
    ) -> Result<(), RegistryError>;

    /// Drops an identity whose machine was never provisioned, so the username
    /// can be registered again. Idempotent.
    async fn abandon_identity(&self, client_id: &ClientId) -> Result<(), RegistryError>;

    /// Deletes the machine and then its identity. Idempotent.
    async fn remove_virtual_machine(&self, client_id: &ClientId) -> Result<(), RegistryError>;

    async fn machine_exists(&self, client_id: &ClientId) -> Result<bool, RegistryError>;

    /// Overwrites the machine attributes.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if the client has no machine.
    async fn update_machine(
        &self,
        client_id: &ClientId,
        spec: &MachineSpec,
    ) -> Result<(), RegistryError>;

    async fn mark_connected(&self, client_id: &ClientId) -> Result<(), RegistryError>;

    async fn mark_disconnected(&self, client_id: &ClientId) -> Result<(), RegistryError>;

    /// Drops every live connection, returning how many were stale.
    async fn clear_live_connections(&self) -> Result<u64, RegistryError>;

    async fn stats(&self) -> Result<TotalStats, RegistryError>;

    async fn ever_connected(&self) -> Result<Vec<ClientRow>, RegistryError>;

    async fn currently_connected(&self) -> Result<Vec<ClientRow>, RegistryError>;

    async fn hard_disks(&self) -> Result<Vec<HardDiskRow>, RegistryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_conflict_maps_to_conflict() {
        let err: RegistryError = StoreError::Conflict("UNIQUE".to_string()).into();
        assert!(matches!(err, RegistryError::Conflict(_)));
    }

    #[test]
    fn store_failure_maps_to_unavailable() {
        let db_err = sea_orm::DbErr::Custom("disk gone".to_string());
        let err: RegistryError = StoreError::Unavailable(db_err).into();
        assert!(matches!(err, RegistryError::StoreUnavailable(_)));
    }

    #[test]
    fn not_found_mentions_client() {
        let err = RegistryError::NotFound(ClientId::from("id1"));
        assert_eq!(err.to_string(), "No virtual machine found for client id1");
    }
}
