//! User Service
//!
//! Registration and credential validation on top of a [`UserRepository`].
//! Passwords are hashed here, before anything reaches the store.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::CatalogConfig;
use crate::domain::entity::user::{NewUser, User, UserUpdate};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{CatalogError, CatalogResult};

/// Register user input
pub struct RegisterUserInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Update user input. Empty strings count as "not provided".
pub struct UpdateUserInput {
    pub id: UserId,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// User service
pub struct UserService<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<CatalogConfig>,
}

impl<U> UserService<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<CatalogConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Check a username/password pair against the active user of that name
    ///
    /// Unknown users and wrong passwords both yield `InvalidCredentials`.
    pub async fn validate_user(&self, username: &str, password: &str) -> CatalogResult<UserId> {
        tracing::debug!(username = %username, "Validating user");

        let Ok(user_name) = UserName::new(username) else {
            return Err(CatalogError::InvalidCredentials);
        };

        let user = match self.user_repo.find_by_username(&user_name).await {
            Ok(user) => user,
            Err(CatalogError::UserNotFound) => {
                tracing::warn!(username = %user_name, "User not found");
                return Err(CatalogError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        let raw_password =
            RawPassword::new(password.to_string()).map_err(|_| CatalogError::InvalidCredentials)?;

        if !user.password.verify(&raw_password, self.config.pepper()) {
            tracing::warn!(username = %user_name, "Password comparison failed");
            return Err(CatalogError::InvalidCredentials);
        }

        Ok(user.id)
    }

    /// Register a new user with a hashed password
    ///
    /// An active user with the same username and email is rejected here with
    /// `UsernameOrEmailTaken`; any other active holder of the username is
    /// rejected by the store with `UsernameTaken`. A soft-deleted holder is
    /// purged by the store.
    pub async fn register_user(&self, input: RegisterUserInput) -> CatalogResult<User> {
        let username =
            UserName::new(&input.username).map_err(|e| CatalogError::Validation(e.to_string()))?;
        let email = Email::new(&input.email).map_err(|e| CatalogError::Validation(e.to_string()))?;

        match self.user_repo.find_by_username(&username).await {
            Ok(existing) if existing.email == email => {
                return Err(CatalogError::UsernameOrEmailTaken);
            }
            Ok(_) | Err(CatalogError::UserNotFound) => {}
            Err(e) => return Err(e),
        }

        let password = self.hash_password(input.password)?;

        let user = self
            .user_repo
            .create_user(&NewUser {
                username,
                email,
                password,
            })
            .await?;

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            "User registered"
        );

        Ok(user)
    }

    /// Change username and/or password; omitted or empty fields are kept
    pub async fn update_user(&self, input: UpdateUserInput) -> CatalogResult<User> {
        let mut update = UserUpdate::new(input.id);

        if let Some(name) = input.username.filter(|s| !s.is_empty()) {
            update.username =
                Some(UserName::new(name).map_err(|e| CatalogError::Validation(e.to_string()))?);
        }

        if let Some(password) = input.password.filter(|s| !s.is_empty()) {
            update.password = Some(self.hash_password(password)?);
        }

        let user = self.user_repo.update_user(&update).await?;

        tracing::info!(user_id = %user.id, "User updated");

        Ok(user)
    }

    /// Soft delete
    pub async fn delete_user(&self, user_id: UserId) -> CatalogResult<()> {
        self.user_repo.delete_user(user_id).await
    }

    pub async fn get_all_users(&self) -> CatalogResult<Vec<User>> {
        self.user_repo.get_all_users().await
    }

    pub async fn get_user_by_username(&self, username: &str) -> CatalogResult<User> {
        let user_name =
            UserName::new(username).map_err(|e| CatalogError::Validation(e.to_string()))?;
        self.user_repo.find_by_username(&user_name).await
    }

    fn hash_password(&self, password: String) -> CatalogResult<UserPassword> {
        let raw = RawPassword::new(password)?;
        UserPassword::from_raw(&raw, self.config.pepper(), self.config.hashing_cost)
    }
}
