pub mod analysis;
pub mod auth;
pub mod health;
pub mod leases;
pub mod properties;
pub mod tenants;
