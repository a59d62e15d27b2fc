use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, AtomicI64, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use time::OffsetDateTime;

use super::{
    repo_types::{User, UserStatus},
    store::UserStore,
};

/// In-memory store with the same read semantics as the MySQL queries
/// (reads drop the password). Ids are never reused, like AUTO_INCREMENT.
/// `fail()` makes every call error.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<BTreeMap<i64, User>>,
    last_id: AtomicI64,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Stores an `inactive` row directly; the service only ever creates active users.
    pub fn insert_inactive(&self, email: &str, password: &str) -> i64 {
        let id = self.next_id();
        let user = User {
            id,
            first_name: "Dormant".into(),
            last_name: "User".into(),
            email: email.into(),
            date_created: OffsetDateTime::UNIX_EPOCH,
            status: UserStatus::Inactive,
            password: password.into(),
        };
        self.rows.lock().unwrap().insert(id, user);
        id
    }

    fn next_id(&self) -> i64 {
        self.last_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("connection refused");
        }
        Ok(())
    }
}

fn public(user: &User) -> User {
    User {
        password: String::new(),
        ..user.clone()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: &mut User) -> anyhow::Result<()> {
        self.check()?;
        user.id = self.next_id();
        self.rows.lock().unwrap().insert(user.id, user.clone());
        Ok(())
    }

    async fn get(&self, id: i64) -> anyhow::Result<Option<User>> {
        self.check()?;
        Ok(self.rows.lock().unwrap().get(&id).map(public))
    }

    async fn update(&self, user: &User) -> anyhow::Result<()> {
        self.check()?;
        if let Some(row) = self.rows.lock().unwrap().get_mut(&user.id) {
            row.first_name = user.first_name.clone();
            row.last_name = user.last_name.clone();
            row.email = user.email.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        self.check()?;
        Ok(self.rows.lock().unwrap().remove(&id).is_some())
    }

    async fn find_by_status(&self, status: UserStatus) -> anyhow::Result<Vec<User>> {
        self.check()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.status == status)
            .map(public)
            .collect())
    }

    async fn find_by_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> anyhow::Result<Option<User>> {
        self.check()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email && u.password == password && u.status == UserStatus::Active)
            .map(public))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn user(email: &str) -> User {
        User {
            id: 0,
            first_name: "Ken".into(),
            last_name: "Thompson".into(),
            email: email.into(),
            date_created: datetime!(2024-01-01 0:00 UTC),
            status: UserStatus::Active,
            password: "unix".into(),
        }
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = MemoryStore::default();
        let mut first = user("a@example.com");
        let mut second = user("b@example.com");
        store.insert(&mut first).await.unwrap();
        store.insert(&mut second).await.unwrap();
        assert_eq!((first.id, second.id), (1, 2));

        assert!(store.delete(second.id).await.unwrap());
        let mut third = user("c@example.com");
        store.insert(&mut third).await.unwrap();
        assert_eq!(third.id, 3);
    }

    #[tokio::test]
    async fn inactive_rows_share_the_id_sequence() {
        let store = MemoryStore::default();
        let dormant = store.insert_inactive("z@example.com", "pw");
        let mut active = user("a@example.com");
        store.insert(&mut active).await.unwrap();

        assert_eq!(dormant, 1);
        assert_eq!(active.id, 2);
        let stored = store.get(dormant).await.unwrap().unwrap();
        assert_eq!(stored.status, UserStatus::Inactive);
        assert!(stored.password.is_empty());
    }
}
