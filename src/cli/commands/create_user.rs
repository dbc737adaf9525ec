use anyhow::{Result, anyhow, bail};
use chrono::Utc;
use model::entities::user::{self, Role};
use sea_orm::{ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::{debug, info, trace};

use crate::auth::password::hash_password;
use crate::config::Settings;

/// Creates a user directly in the database. Unlike self registration this
/// accepts every role, so it is how admin accounts come into existence.
pub async fn create_user(
    settings: &Settings,
    email: &str,
    password: String,
    role: &str,
    name: Option<String>,
) -> Result<()> {
    trace!("Entering create_user function");
    let db = Database::connect(&settings.database_url).await?;
    let user_model = insert_user(&db, email, password, role, name, settings.bcrypt_cost).await?;

    info!("Created {} user {} with ID {}", user_model.role, user_model.email, user_model.id);
    println!("Created {} user {} (id {})", user_model.role, user_model.email, user_model.id);
    Ok(())
}

async fn insert_user(
    db: &DatabaseConnection,
    email: &str,
    password: String,
    role: &str,
    name: Option<String>,
    bcrypt_cost: u32,
) -> Result<user::Model> {
    let email = email.trim().to_lowercase();
    let role: Role = role.parse().map_err(|e: String| anyhow!(e))?;
    if password.len() < 8 {
        bail!("Password must be at least 8 characters");
    }

    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .one(db)
        .await?;
    if existing.is_some() {
        bail!("A user with email {} already exists", email);
    }

    debug!("Hashing password for {}", email);
    let password_hash = hash_password(password, bcrypt_cost).await?;
    let user_model = user::ActiveModel {
        email: Set(email),
        name: Set(name),
        password_hash: Set(password_hash),
        role: Set(role),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(user_model)
}
