//! Data models for the library server

pub mod book;
pub mod member;
pub mod pagination;

// Re-export commonly used types
pub use book::{Book, BookQuery, CreateBook, UpdateBook};
pub use member::{Member, MemberClaims, MemberQuery, RegisterMember, UpdateMember};
pub use pagination::{Page, PageRequest};

use serde::{Deserialize, Deserializer};

/// Deserialize a patch field that, when present, must carry a value.
///
/// Used with `#[serde(default)]`: an omitted key stays `None`, while an explicit
/// `null` is rejected because every patchable column is `NOT NULL`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
