use std::sync::Arc;

use anyhow::anyhow;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use uuid::Uuid;

use arbor_types::{ErrorReporter, NewUser, Selector, StoreError, UserEntry, UserPatch, UserRecord};

use crate::{OpError, Store, run_op};

const TREE: &str = "users";

/// Credential store adapter: the sole mutator of user records.
///
/// Existence checks and the writes that follow them are not atomic across
/// concurrent requests on the same username; callers get best-effort, not
/// linearizable, semantics.
pub struct Users {
    store: Arc<Store>,
    reporter: Arc<dyn ErrorReporter>,
    hash_cost: u32,
}

impl Users {
    pub fn new(store: Arc<Store>, reporter: Arc<dyn ErrorReporter>, hash_cost: u32) -> Self {
        Self {
            store,
            reporter,
            hash_cost,
        }
    }

    async fn run<T, F>(&self, tag: &'static str, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Store) -> Result<T, OpError> + Send + 'static,
        T: Send + 'static,
    {
        run_op(&self.store, &self.reporter, tag, f).await
    }

    /// Create a user record, hashing the password first. `Conflict` when
    /// the username is already taken.
    pub async fn register(&self, user: NewUser) -> Result<(), StoreError> {
        let hash_cost = self.hash_cost;
        self.run("users.register", move |store| {
            let tree = store.tree(TREE);
            if tree.exists(&user.username)? {
                return Err(StoreError::Conflict.into());
            }
            let record = UserRecord {
                first_name: user.first_name,
                last_name: user.last_name,
                email: user.email,
                password: hash_password(&user.password, hash_cost)?,
                col_no: user.col_no,
                avatar: user.avatar,
                sessionkey: None,
            };
            tree.put(&user.username, &record)?;
            Ok(())
        })
        .await
    }

    /// Verify the password and issue a fresh session token. A later login
    /// overwrites the previous token — one active session per user.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<String, StoreError> {
        let username = username.to_string();
        let password = password.to_string();
        self.run("users.login", move |store| {
            let tree = store.tree(TREE);
            let Some(doc) = tree.get(&username)? else {
                return Err(StoreError::NotFound.into());
            };
            let record: UserRecord = serde_json::from_value(doc)?;
            if !verify_password(&password, &record.password)? {
                return Err(StoreError::Forbidden.into());
            }
            let sessionkey = Uuid::new_v4().to_string();
            tree.merge(&username, &serde_json::json!({ "sessionkey": sessionkey }))?;
            Ok(sessionkey)
        })
        .await
    }

    /// Clear the session token selected by username or by the token itself.
    /// By token, every matching record is cleared (duplicates are handled
    /// defensively even though the data model intends uniqueness). No match
    /// is still success — logout is idempotent.
    pub async fn invalidate_session(&self, selector: Selector) -> Result<(), StoreError> {
        self.run("users.logout", move |store| {
            let tree = store.tree(TREE);
            match selector {
                Selector::ByUsername(username) => tree.clear_field(&username, "sessionkey")?,
                Selector::BySessionKey(key) => tree.clear_field_matching("sessionkey", &key)?,
            }
            Ok(())
        })
        .await
    }

    /// Partial-patch update gated on the old password. Only fields present
    /// in the patch are touched; a new password is re-hashed.
    pub async fn edit(
        &self,
        username: &str,
        mut patch: UserPatch,
        old_password: &str,
    ) -> Result<(), StoreError> {
        let username = username.to_string();
        let old_password = old_password.to_string();
        let hash_cost = self.hash_cost;
        self.run("users.edit", move |store| {
            let tree = store.tree(TREE);
            let Some(doc) = tree.get(&username)? else {
                return Err(StoreError::NotFound.into());
            };
            let record: UserRecord = serde_json::from_value(doc)?;
            if !verify_password(&old_password, &record.password)? {
                return Err(StoreError::Forbidden.into());
            }
            if let Some(new_password) = patch.password.take() {
                patch.password = Some(hash_password(&new_password, hash_cost)?);
            }
            tree.merge(&username, &patch)?;
            Ok(())
        })
        .await
    }

    /// Destroy the record, gated on the password.
    pub async fn delete(&self, username: &str, password: &str) -> Result<(), StoreError> {
        let username = username.to_string();
        let password = password.to_string();
        self.run("users.delete", move |store| {
            let tree = store.tree(TREE);
            let Some(doc) = tree.get(&username)? else {
                return Err(StoreError::NotFound.into());
            };
            let record: UserRecord = serde_json::from_value(doc)?;
            if !verify_password(&password, &record.password)? {
                return Err(StoreError::Forbidden.into());
            }
            tree.remove(&username)?;
            Ok(())
        })
        .await
    }

    /// Resolve a user by either selector, joined with the username it
    /// resolved to. By session key the first match wins.
    pub async fn fetch(&self, selector: Selector) -> Result<UserEntry, StoreError> {
        self.run("users.fetch", move |store| {
            let tree = store.tree(TREE);
            let (username, doc) = match selector {
                Selector::ByUsername(username) => {
                    let Some(doc) = tree.get(&username)? else {
                        return Err(StoreError::NotFound.into());
                    };
                    (username, doc)
                }
                Selector::BySessionKey(key) => {
                    let mut matches = tree.find_by_field("sessionkey", &key)?;
                    if matches.is_empty() {
                        return Err(StoreError::NotFound.into());
                    }
                    matches.swap_remove(0)
                }
            };
            let record: UserRecord = serde_json::from_value(doc)?;
            Ok(UserEntry { username, record })
        })
        .await
    }

    /// Existence check; never `NotFound`, the boolean is the answer.
    pub async fn exists(&self, selector: Selector) -> Result<bool, StoreError> {
        self.run("users.exists", move |store| {
            let tree = store.tree(TREE);
            Ok(match selector {
                Selector::ByUsername(username) => tree.exists(&username)?,
                Selector::BySessionKey(key) => {
                    !tree.find_by_field("sessionkey", &key)?.is_empty()
                }
            })
        })
        .await
    }
}

fn hash_password(password: &str, t_cost: u32) -> Result<String, OpError> {
    let params = Params::new(Params::DEFAULT_M_COST, t_cost, Params::DEFAULT_P_COST, None)
        .map_err(|e| anyhow!("invalid argon2 params: {}", e))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hashing failed: {}", e))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, stored_hash: &str) -> Result<bool, OpError> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|e| anyhow!("stored hash unparsable: {}", e))?;
    // The hash string carries its own params, so the default verifier works
    // regardless of the configured cost.
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow!("password verification failed: {}", e).into()),
    }
}
