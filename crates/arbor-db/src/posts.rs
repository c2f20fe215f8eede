use std::sync::Arc;

use arbor_types::{ErrorReporter, Post, PostEntry, PostPatch, StoreError};

use crate::{OpError, Store, run_op};

const TREE: &str = "posts";

/// Post store adapter, keyed by slug. Slug derivation is the caller's job;
/// a valid slug is assumed here.
pub struct Posts {
    store: Arc<Store>,
    reporter: Arc<dyn ErrorReporter>,
}

impl Posts {
    pub fn new(store: Arc<Store>, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self { store, reporter }
    }

    async fn run<T, F>(&self, tag: &'static str, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Store) -> Result<T, OpError> + Send + 'static,
        T: Send + 'static,
    {
        run_op(&self.store, &self.reporter, tag, f).await
    }

    /// Every post joined with its slug, in store order.
    pub async fn list(&self) -> Result<Vec<PostEntry>, StoreError> {
        self.run("posts.list", move |store| {
            store
                .tree(TREE)
                .all()?
                .into_iter()
                .map(|(slug, doc)| {
                    let post: Post = serde_json::from_value(doc)?;
                    Ok(PostEntry { slug, post })
                })
                .collect()
        })
        .await
    }

    /// Unconditional write: a colliding slug silently overwrites.
    pub async fn create(&self, slug: &str, post: Post) -> Result<(), StoreError> {
        let slug = slug.to_string();
        self.run("posts.create", move |store| {
            store.tree(TREE).put(&slug, &post)?;
            Ok(())
        })
        .await
    }

    pub async fn fetch(&self, slug: &str) -> Result<Post, StoreError> {
        let slug = slug.to_string();
        self.run("posts.fetch", move |store| {
            let Some(doc) = store.tree(TREE).get(&slug)? else {
                return Err(StoreError::NotFound.into());
            };
            Ok(serde_json::from_value(doc)?)
        })
        .await
    }

    /// Partial-patch update: only fields present in the patch are touched.
    pub async fn edit(&self, slug: &str, patch: PostPatch) -> Result<(), StoreError> {
        let slug = slug.to_string();
        self.run("posts.edit", move |store| {
            let tree = store.tree(TREE);
            if !tree.exists(&slug)? {
                return Err(StoreError::NotFound.into());
            }
            tree.merge(&slug, &patch)?;
            Ok(())
        })
        .await
    }

    pub async fn delete(&self, slug: &str) -> Result<(), StoreError> {
        let slug = slug.to_string();
        self.run("posts.delete", move |store| {
            let tree = store.tree(TREE);
            if !tree.exists(&slug)? {
                return Err(StoreError::NotFound.into());
            }
            tree.remove(&slug)?;
            Ok(())
        })
        .await
    }
}
