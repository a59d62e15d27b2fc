use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::users::repo_types::{User, UserStatus};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: &mut User) -> anyhow::Result<()>;
    async fn get(&self, id: i64) -> anyhow::Result<Option<User>>;
    async fn update(&self, user: &User) -> anyhow::Result<()>;
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
    async fn find_by_status(&self, status: UserStatus) -> anyhow::Result<Vec<User>>;
    async fn find_by_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> anyhow::Result<Option<User>>;
}

#[async_trait]
impl UserStore for MySqlPool {
    async fn insert(&self, user: &mut User) -> anyhow::Result<()> {
        user.save(self).await
    }

    async fn get(&self, id: i64) -> anyhow::Result<Option<User>> {
        User::get(self, id).await
    }

    async fn update(&self, user: &User) -> anyhow::Result<()> {
        user.update(self).await
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        User::delete(self, id).await
    }

    async fn find_by_status(&self, status: UserStatus) -> anyhow::Result<Vec<User>> {
        User::find_by_status(self, status).await
    }

    async fn find_by_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> anyhow::Result<Option<User>> {
        User::find_by_email_and_password(self, email, password).await
    }
}
