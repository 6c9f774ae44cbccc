pub mod registry_service;
pub mod registry_service_impl;
pub use registry_service::{Registry, RegistryError};
pub use registry_service_impl::SeaOrmRegistry;
