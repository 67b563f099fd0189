use crate::domain::repositories::{UserRepository, UserStore, UserTransaction};
use crate::domain::user::User;
use crate::service::dto::UserDto;
use crate::service::errors::{ServiceError, ServiceResult};

/// Service for working with users
///
/// Creates, updates, looks up and deletes users, and converts between the
/// wire representation and the stored entity. Every mutating operation runs
/// inside a single store transaction.
pub struct UserService<S> {
    store: S,
}

impl<S: UserStore> UserService<S> {
    /// Creates a new UserService over the given store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates a new user
    ///
    /// Any caller-supplied id is discarded; the store assigns one.
    ///
    /// # Errors
    /// * `ServiceError::AlreadyExists` - If another user already has the email
    pub async fn create_user(&self, user_dto: UserDto) -> ServiceResult<UserDto> {
        let mut user = User::from(user_dto);
        user.id = None;

        let tx = self.store.begin().await?;

        if tx.exists_by_email(&user.email).await? {
            tracing::warn!(email = %user.email, "rejected create: email taken");
            return Err(ServiceError::AlreadyExists { email: user.email });
        }

        let created = tx.save(user).await?;
        tx.commit().await?;

        tracing::info!(user_id = ?created.id, "user created");
        Ok(UserDto::from(created))
    }

    /// Returns every user in the store
    pub async fn find_all_users(&self) -> ServiceResult<Vec<UserDto>> {
        let users = self.store.find_all().await?;
        tracing::debug!(count = users.len(), "listed users");

        Ok(users.into_iter().map(UserDto::from).collect())
    }

    /// Returns a user by identifier
    ///
    /// # Errors
    /// * `ServiceError::NotFound` - If no user has this id
    pub async fn find_user_by_id(&self, id: i32) -> ServiceResult<UserDto> {
        let user = find_or_fail(&self.store, id).await?;
        Ok(UserDto::from(user))
    }

    /// Replaces every mutable field of an existing user
    ///
    /// The id in the path wins over any id in the payload. Changing the
    /// email to one held by another user is rejected.
    ///
    /// # Errors
    /// * `ServiceError::NotFound` - If no user has this id
    /// * `ServiceError::AlreadyExists` - If the new email belongs to another user
    pub async fn update_user(&self, id: i32, updated_user_dto: UserDto) -> ServiceResult<UserDto> {
        let tx = self.store.begin().await?;
        let mut user = find_or_fail(&tx, id).await?;

        let replacement = User::from(updated_user_dto);
        if replacement.email != user.email && tx.exists_by_email(&replacement.email).await? {
            tracing::warn!(user_id = id, email = %replacement.email, "rejected update: email taken");
            return Err(ServiceError::AlreadyExists {
                email: replacement.email,
            });
        }

        user.replace_fields(replacement);
        let updated = tx.save(user).await?;
        tx.commit().await?;

        tracing::info!(user_id = id, "user updated");
        Ok(UserDto::from(updated))
    }

    /// Permanently removes a user
    ///
    /// # Errors
    /// * `ServiceError::NotFound` - If no user has this id
    pub async fn delete_user_by_id(&self, id: i32) -> ServiceResult<()> {
        let tx = self.store.begin().await?;
        find_or_fail(&tx, id).await?;

        tx.delete_by_id(id).await?;
        tx.commit().await?;

        tracing::info!(user_id = id, "user deleted");
        Ok(())
    }
}

/// Looks a user up or fails with `NotFound`
async fn find_or_fail<R: UserRepository>(repo: &R, id: i32) -> ServiceResult<User> {
    repo.find_by_id(id).await?.ok_or_else(|| {
        tracing::debug!(user_id = id, "user not found");
        ServiceError::NotFound { id }
    })
}
