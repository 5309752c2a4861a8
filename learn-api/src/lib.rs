use chrono::Utc;
use serde::{Deserialize, Deserializer};

pub type Time = chrono::DateTime<Utc>;

macro_rules! id_type {
    ($name:ident) => {
        #[derive(
            Clone,
            Debug,
            Eq,
            Hash,
            Ord,
            PartialEq,
            PartialOrd,
            serde::Deserialize,
            serde::Serialize,
        )]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> $name {
                $name(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> $name {
                $name(String::from(s))
            }
        }
    };
}
pub(crate) use id_type;

mod auth;
pub use auth::AuthToken;

mod category;
pub use category::{Category, CategoryId, CategoryPatch, NewCategory};

mod comment;
pub use comment::{Comment, CommentId, CommentPatch, NewComment};

mod error;
pub use error::Error;

mod gateway;
pub use gateway::{Gateway, Resource};

mod level;
pub use level::{Kind, Level};

mod subject;
pub use subject::{NewSubject, Subject, SubjectId, SubjectPatch};

mod subtopic;
pub use subtopic::{NewSubtopic, Subtopic, SubtopicId, SubtopicPatch};

mod topic;
pub use topic::{NewTopic, Topic, TopicId, TopicPatch};

/// Fails with `Error::Required(field)` if `s` is empty once trimmed
pub fn require(field: &'static str, s: &str) -> Result<(), Error> {
    if s.trim().is_empty() {
        return Err(Error::Required(String::from(field)));
    }
    Ok(())
}

/// Fails with `Error::SelectParent(parent)` if the parent id is empty
pub fn require_parent(parent: Level, id: &str) -> Result<(), Error> {
    if id.trim().is_empty() {
        return Err(Error::SelectParent(parent));
    }
    Ok(())
}

// The server may send either no child list or a `null` one, both mean "no children"
pub(crate) fn null_as_empty<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(d)?.unwrap_or_default())
}

pub(crate) fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

pub(crate) fn null_as_zero<'de, D>(d: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(d)?.unwrap_or(0))
}
