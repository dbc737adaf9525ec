use model::entities::{property, user::Role};
use sea_orm::{DatabaseConnection, EntityTrait};
use tracing::{trace, warn};

use super::Identity;
use crate::errors::ApiError;

/// Whether `identity` may read or change `property` and everything attached
/// to it: only its owner, and only while acting in the owner role.
pub fn can_access_property(identity: &Identity, property: &property::Model) -> bool {
    identity.role == Role::Owner && property.owner_id == identity.user_id
}

/// Property routes are reserved to the owner role.
pub fn require_owner(identity: &Identity) -> Result<(), ApiError> {
    if identity.role == Role::Owner {
        Ok(())
    } else {
        warn!(user_id = identity.user_id, role = %identity.role, "Non-owner denied access to property routes");
        Err(ApiError::Forbidden("Only property owners can access this resource".to_string()))
    }
}

/// Loads a property the caller is allowed to access.
///
/// Fails with 403 for a non-owner role or someone else's property and with
/// 404 when the property does not exist.
pub async fn authorize_property(
    db: &DatabaseConnection,
    identity: &Identity,
    property_id: i32,
) -> Result<property::Model, ApiError> {
    trace!("Authorizing user {} for property {}", identity.user_id, property_id);
    require_owner(identity)?;

    let property = property::Entity::find_by_id(property_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            warn!("Property with ID {} not found", property_id);
            ApiError::NotFound("Property not found".to_string())
        })?;

    if !can_access_property(identity, &property) {
        warn!(
            "User {} denied access to property {} owned by {}",
            identity.user_id, property.id, property.owner_id
        );
        return Err(ApiError::Forbidden("You do not have access to this property".to_string()));
    }

    Ok(property)
}
