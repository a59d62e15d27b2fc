use anyhow::Context;
use sqlx::MySqlPool;

use crate::users::repo_types::{User, UserRow, UserStatus};

const QUERY_INSERT_USER: &str = r#"
    INSERT INTO users (first_name, last_name, email, date_created, status, password)
    VALUES (?, ?, ?, ?, ?, ?)
"#;
const QUERY_GET_USER: &str = r#"
    SELECT id, first_name, last_name, email, date_created, status
    FROM users
    WHERE id = ?
"#;
const QUERY_UPDATE_USER: &str = r#"
    UPDATE users SET first_name = ?, last_name = ?, email = ?
    WHERE id = ?
"#;
const QUERY_DELETE_USER: &str = r#"DELETE FROM users WHERE id = ?"#;
const QUERY_FIND_BY_STATUS: &str = r#"
    SELECT id, first_name, last_name, email, date_created, status
    FROM users
    WHERE status = ?
"#;
const QUERY_FIND_BY_EMAIL_AND_PASSWORD: &str = r#"
    SELECT id, first_name, last_name, email, date_created, status
    FROM users
    WHERE email = ? AND password = ? AND status = ?
"#;

impl User {
    /// Insert the record and assign the generated id back onto it.
    pub async fn save(&mut self, db: &MySqlPool) -> anyhow::Result<()> {
        let res = sqlx::query(QUERY_INSERT_USER)
            .bind(&self.first_name)
            .bind(&self.last_name)
            .bind(&self.email)
            .bind(self.date_created)
            .bind(self.status.as_str())
            .bind(&self.password)
            .execute(db)
            .await
            .context("insert user")?;

        self.id = i64::try_from(res.last_insert_id()).context("last insert id out of range")?;
        Ok(())
    }

    pub async fn get(db: &MySqlPool, id: i64) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(QUERY_GET_USER)
            .bind(id)
            .fetch_optional(db)
            .await
            .context("get user by id")?;
        row.map(User::try_from).transpose()
    }

    /// Only name and email are writable after creation.
    pub async fn update(&self, db: &MySqlPool) -> anyhow::Result<()> {
        sqlx::query(QUERY_UPDATE_USER)
            .bind(&self.first_name)
            .bind(&self.last_name)
            .bind(&self.email)
            .bind(self.id)
            .execute(db)
            .await
            .context("update user")?;
        Ok(())
    }

    /// Returns false when no row had that id.
    pub async fn delete(db: &MySqlPool, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query(QUERY_DELETE_USER)
            .bind(id)
            .execute(db)
            .await
            .context("delete user")?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn find_by_status(db: &MySqlPool, status: UserStatus) -> anyhow::Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(QUERY_FIND_BY_STATUS)
            .bind(status.as_str())
            .fetch_all(db)
            .await
            .context("find users by status")?;
        rows.into_iter().map(User::try_from).collect()
    }

    /// Credential lookup restricted to active accounts.
    pub async fn find_by_email_and_password(
        db: &MySqlPool,
        email: &str,
        password: &str,
    ) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(QUERY_FIND_BY_EMAIL_AND_PASSWORD)
            .bind(email)
            .bind(password)
            .bind(UserStatus::Active.as_str())
            .fetch_optional(db)
            .await
            .context("find user by email and password")?;
        row.map(User::try_from).transpose()
    }
}
