use anyhow::Result;
use rusqlite::OptionalExtension;
use serde::Serialize;
use serde_json::Value;

use crate::Store;

/// Handle to one top-level tree of the record store (`users`, `posts`).
///
/// Documents are JSON objects. `merge` follows JSON Merge Patch semantics
/// via SQLite's `json_patch`: supplied fields overwrite, `null` deletes a
/// key, everything else is left untouched.
pub struct Tree<'a> {
    store: &'a Store,
    name: &'static str,
}

impl<'a> Tree<'a> {
    pub(crate) fn new(store: &'a Store, name: &'static str) -> Self {
        Self { store, name }
    }

    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        self.store.with_conn(|conn| {
            let doc: Option<String> = conn
                .query_row(
                    "SELECT doc FROM records WHERE tree = ?1 AND key = ?2",
                    (self.name, key),
                    |row| row.get(0),
                )
                .optional()?;
            Ok(doc.map(|d| serde_json::from_str(&d)).transpose()?)
        })
    }

    /// Full-record write; an existing record under `key` is replaced.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let doc = serde_json::to_string(value)?;
        self.store.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO records (tree, key, doc) VALUES (?1, ?2, ?3)",
                (self.name, key, &doc),
            )?;
            Ok(())
        })
    }

    /// Merge-patch `patch` into the record under `key`, creating it when
    /// absent.
    pub fn merge<T: Serialize>(&self, key: &str, patch: &T) -> Result<()> {
        let doc = serde_json::to_string(patch)?;
        self.store.with_conn(|conn| {
            conn.execute(
                "INSERT INTO records (tree, key, doc) VALUES (?1, ?2, json(?3))
                 ON CONFLICT (tree, key) DO UPDATE SET doc = json_patch(doc, excluded.doc)",
                (self.name, key, &doc),
            )?;
            Ok(())
        })
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.store.with_conn(|conn| {
            conn.execute(
                "DELETE FROM records WHERE tree = ?1 AND key = ?2",
                (self.name, key),
            )?;
            Ok(())
        })
    }

    pub fn exists(&self, key: &str) -> Result<bool> {
        self.store.with_conn(|conn| {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM records WHERE tree = ?1 AND key = ?2",
                    (self.name, key),
                    |row| row.get(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
    }

    /// All records of the tree joined with their keys, in store order
    /// (unspecified, not sorted).
    pub fn all(&self) -> Result<Vec<(String, Value)>> {
        self.store.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT key, doc FROM records WHERE tree = ?1")?;
            let rows = stmt
                .query_map([self.name], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows.into_iter()
                .map(|(key, doc)| Ok((key, serde_json::from_str(&doc)?)))
                .collect()
        })
    }

    /// Secondary-key lookup: every record whose top-level `field` equals
    /// `value`. A linear scan over the tree today — an indexed store can
    /// replace this body without changing callers.
    pub fn find_by_field(&self, field: &str, value: &str) -> Result<Vec<(String, Value)>> {
        let path = format!("$.{field}");
        self.store.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT key, doc FROM records WHERE tree = ?1 AND json_extract(doc, ?2) = ?3",
            )?;
            let rows = stmt
                .query_map((self.name, &path, value), |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows.into_iter()
                .map(|(key, doc)| Ok((key, serde_json::from_str(&doc)?)))
                .collect()
        })
    }

    /// Delete `field` from the record under `key`. A no-op when the record
    /// is absent — this never creates a record.
    pub fn clear_field(&self, key: &str, field: &str) -> Result<()> {
        let path = format!("$.{field}");
        self.store.with_conn(|conn| {
            conn.execute(
                "UPDATE records SET doc = json_remove(doc, ?3) WHERE tree = ?1 AND key = ?2",
                (self.name, key, &path),
            )?;
            Ok(())
        })
    }

    /// Delete `field` from every record where it equals `value`. Zero
    /// matches is success.
    pub fn clear_field_matching(&self, field: &str, value: &str) -> Result<()> {
        let path = format!("$.{field}");
        self.store.with_conn(|conn| {
            conn.execute(
                "UPDATE records SET doc = json_remove(doc, ?2)
                 WHERE tree = ?1 AND json_extract(doc, ?2) = ?3",
                (self.name, &path, value),
            )?;
            Ok(())
        })
    }
}
