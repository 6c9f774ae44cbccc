//! Domain types for the virtual machine registry.
//!
//! Identifiers are wrapped in newtypes so a username can never be passed where
//! a client id is expected.

pub mod stats;

pub use stats::TotalStats;

use std::fmt;
use uuid::Uuid;

/// Identifier of a client and of the machine it owns.
///
/// Generated as a UUID v4 when a username is first provisioned, but any string
/// read back from storage or typed by a peer is accepted as-is.
///
/// # Examples
///
/// ```rust
/// use vmhost::domain::ClientId;
///
/// let id = ClientId::from("test_id");
/// assert_eq!(id.as_str(), "test_id");
/// assert_eq!(id.to_string(), "test_id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientId(String);

impl ClientId {
    /// Creates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ClientId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ClientId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for ClientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The four user-supplied machine attributes, stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MachineSpec {
    pub ram_size: String,
    pub cpu_count: String,
    pub hdd_size: String,
    pub hdd_id: String,
}

impl MachineSpec {
    #[must_use]
    pub fn new(
        ram_size: impl Into<String>,
        cpu_count: impl Into<String>,
        hdd_size: impl Into<String>,
        hdd_id: impl Into<String>,
    ) -> Self {
        Self {
            ram_size: ram_size.into(),
            cpu_count: cpu_count.into(),
            hdd_size: hdd_size.into(),
            hdd_id: hdd_id.into(),
        }
    }
}

/// Result of resolving a username at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityOrigin {
    /// The username was already registered.
    Returning,
    /// A new identity was just created; its machine still has to be provisioned.
    Created,
}
