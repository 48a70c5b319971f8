//! User accounts and profile management.
//!
//! There is no authentication here: a user is created once and then
//! identified by id on every request. Deactivated users keep their data but
//! are no longer resolved by [`UserService::find_active_user`].

use std::sync::Arc;

use shared::{CreateUserRequest, UpdateProfileRequest, User};
use tracing::{info, warn};

use crate::domain::clock::Clock;
use crate::domain::errors::{validate_percentage, DomainError, DomainResult};
use crate::storage::UserStorage;

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStorage>,
    clock: Arc<dyn Clock>,
    default_target_percentage: f64,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserStorage>,
        clock: Arc<dyn Clock>,
        default_target_percentage: f64,
    ) -> Self {
        Self {
            users,
            clock,
            default_target_percentage,
        }
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> DomainResult<User> {
        info!("Creating user: {}", request.email);

        let email = normalize_email(&request.email)?;
        let full_name = normalize_name(&request.full_name)?;
        let target = request
            .target_percentage
            .unwrap_or(self.default_target_percentage);
        validate_percentage(target, "target_percentage")?;

        if self.users.get_user_by_email(&email).await?.is_some() {
            warn!("Email already registered: {}", email);
            return Err(DomainError::conflict("Email already registered"));
        }

        let user = self
            .users
            .insert_user(&email, &full_name, target, self.clock.now())
            .await?;

        info!("Created user {}", user.id);
        Ok(user)
    }

    pub async fn get_user(&self, user_id: i64) -> DomainResult<User> {
        self.users
            .get_user(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User {} not found", user_id)))
    }

    /// The user with this id, if it exists and is active
    pub async fn find_active_user(&self, user_id: i64) -> DomainResult<Option<User>> {
        let user = self.users.get_user(user_id).await?;
        Ok(user.filter(|u| u.is_active))
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        request: UpdateProfileRequest,
    ) -> DomainResult<User> {
        info!("Updating profile for user {}", user_id);
        let mut user = self.get_user(user_id).await?;

        if let Some(email) = request.email {
            let email = normalize_email(&email)?;
            if email != user.email {
                if let Some(existing) = self.users.get_user_by_email(&email).await? {
                    if existing.id != user.id {
                        return Err(DomainError::conflict("Email already registered"));
                    }
                }
                user.email = email;
            }
        }
        if let Some(full_name) = request.full_name {
            user.full_name = normalize_name(&full_name)?;
        }
        if let Some(target) = request.target_percentage {
            validate_percentage(target, "target_percentage")?;
            user.target_percentage = target;
        }

        user.updated_at = self.clock.now();
        self.users.update_user(&user).await?;
        Ok(user)
    }
}

fn normalize_email(email: &str) -> DomainResult<String> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    };
    if !valid {
        return Err(DomainError::validation("A valid email address is required"));
    }
    Ok(email)
}

fn normalize_name(name: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("Full name cannot be empty"));
    }
    Ok(name.to_string())
}
