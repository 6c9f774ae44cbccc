pub mod prelude;

pub mod identities;
pub mod live_connections;
pub mod machines;
