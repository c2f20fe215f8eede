pub mod api;
pub mod error;
pub mod models;

pub use error::{ErrorReporter, Selector, StoreError};
pub use models::{
    NewUser, Post, PostEntry, PostPatch, PublicUser, UserEntry, UserPatch, UserRecord,
};
