pub use super::identities::Entity as Identities;
pub use super::live_connections::Entity as LiveConnections;
pub use super::machines::Entity as Machines;
