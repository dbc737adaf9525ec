//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the rental management application here:
//! users and their roles, properties, tenants, leases and the saved
//! return analysis of each property.

pub mod lease;
pub mod property;
pub mod property_analysis;
pub mod tenant;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::lease::Entity as Lease;
    pub use super::property::Entity as Property;
    pub use super::property_analysis::Entity as PropertyAnalysis;
    pub use super::tenant::Entity as Tenant;
    pub use super::user::Entity as User;
}
