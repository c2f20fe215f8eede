use serde::{Deserialize, Serialize};

/// Stored user document, keyed by username in the `users` tree.
/// `password` holds an argon2 hash, never plaintext. `sessionkey` is only
/// present while a login session is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub col_no: u32,
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessionkey: Option<String>,
}

/// Registration input. The password is still plaintext here; the credential
/// adapter hashes it before anything touches the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub col_no: u32,
    pub avatar: String,
}

/// A user record joined with the username it resolved from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntry {
    pub username: String,
    #[serde(flatten)]
    pub record: UserRecord,
}

/// Client-facing view of a user. Credential material (password hash,
/// session token) never leaves the process.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub col_no: u32,
    pub avatar: String,
}

impl From<UserEntry> for PublicUser {
    fn from(entry: UserEntry) -> Self {
        Self {
            username: entry.username,
            first_name: entry.record.first_name,
            last_name: entry.record.last_name,
            email: entry.record.email,
            col_no: entry.record.col_no,
            avatar: entry.record.avatar,
        }
    }
}

/// Partial update for a user record. `None` means "leave unchanged" —
/// unset fields are skipped during serialization so the merge never sees
/// them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_no: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Stored post document, keyed by slug in the `posts` tree.
/// `datetime` is whatever string the caller supplied; it is not validated
/// server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub author: String,
    pub datetime: String,
    pub feature_img: String,
    pub content: String,
}

/// A post joined with its slug, as returned by list/fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostEntry {
    pub slug: String,
    #[serde(flatten)]
    pub post: Post,
}

/// Partial update for a post record, same skip-unset semantics as
/// [`UserPatch`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct PostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_img: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}
