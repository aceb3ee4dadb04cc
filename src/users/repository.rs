use super::{NewUser, User, UserId};
use crate::database::SqliteRepository;
use anyhow::Result;
use rocket::async_trait;

#[async_trait]
pub(crate) trait UserRepository: Send {
    async fn user_by_id(&mut self, id: UserId) -> Result<Option<User>>;

    async fn user_by_username(&mut self, username: &str) -> Result<Option<User>>;

    /// Adds a user. The very first user becomes the superuser.
    async fn add_user(&mut self, user: NewUser) -> Result<User>;

    async fn has_users(&mut self) -> Result<bool>;

    async fn count_users(&mut self) -> Result<u64>;

    /// All users ordered by username.
    async fn all_users(&mut self) -> Result<Vec<User>>;
}

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn user_by_id(&mut self, id: UserId) -> Result<Option<User>> {
        Ok(sqlx::query_as("SELECT * FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *self.0)
            .await?)
    }

    async fn user_by_username(&mut self, username: &str) -> Result<Option<User>> {
        Ok(sqlx::query_as("SELECT * FROM users WHERE username = ?1")
            .bind(username)
            .fetch_optional(&mut *self.0)
            .await?)
    }

    async fn add_user(&mut self, user: NewUser) -> Result<User> {
        Ok(sqlx::query_as(
            "INSERT INTO users (username, first_name, last_name, email_address, password_hash, role)
             VALUES (?1, ?2, ?3, ?4, ?5,
                     CASE WHEN EXISTS (SELECT 1 FROM users) THEN 'member' ELSE 'superuser' END)
             RETURNING *",
        )
        .bind(user.username)
        .bind(user.first_name)
        .bind(user.last_name)
        .bind(user.email_address)
        .bind(user.password_hash)
        .fetch_one(&mut *self.0)
        .await?)
    }

    async fn has_users(&mut self) -> Result<bool> {
        Ok(self.count_users().await? >= 1)
    }

    async fn count_users(&mut self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT count(1) FROM users")
            .fetch_one(&mut *self.0)
            .await?;
        Ok(u64::try_from(count)?)
    }

    async fn all_users(&mut self) -> Result<Vec<User>> {
        Ok(sqlx::query_as("SELECT * FROM users ORDER BY username, id")
            .fetch_all(&mut *self.0)
            .await?)
    }
}
