use std::{fmt, str::FromStr};

use crate::Error;

/// One of the four levels of the content hierarchy, root first
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Categories,
    Subjects,
    Topics,
    Subtopics,
}

impl Level {
    pub const ALL: [Level; 4] = [
        Level::Categories,
        Level::Subjects,
        Level::Topics,
        Level::Subtopics,
    ];

    pub fn parent(self) -> Option<Level> {
        match self {
            Level::Categories => None,
            Level::Subjects => Some(Level::Categories),
            Level::Topics => Some(Level::Subjects),
            Level::Subtopics => Some(Level::Topics),
        }
    }

    pub fn child(self) -> Option<Level> {
        match self {
            Level::Categories => Some(Level::Subjects),
            Level::Subjects => Some(Level::Topics),
            Level::Topics => Some(Level::Subtopics),
            Level::Subtopics => None,
        }
    }

    /// Name of one item of this level, eg. "category"
    pub fn singular(self) -> &'static str {
        Kind::from(self).singular()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Kind::from(*self).path())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Level, Error> {
        match Kind::from_str(s)? {
            Kind::Categories => Ok(Level::Categories),
            Kind::Subjects => Ok(Level::Subjects),
            Kind::Topics => Ok(Level::Topics),
            Kind::Subtopics => Ok(Level::Subtopics),
            Kind::Comments => Err(Error::Unknown(format!("{s:?} is not a hierarchy level"))),
        }
    }
}

/// Every kind of entity the REST API exposes a collection for
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Categories,
    Subjects,
    Topics,
    Subtopics,
    Comments,
}

impl Kind {
    /// Collection segment in the REST urls
    pub fn path(self) -> &'static str {
        match self {
            Kind::Categories => "categories",
            Kind::Subjects => "subjects",
            Kind::Topics => "topics",
            Kind::Subtopics => "subtopics",
            Kind::Comments => "comments",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            Kind::Categories => "category",
            Kind::Subjects => "subject",
            Kind::Topics => "topic",
            Kind::Subtopics => "subtopic",
            Kind::Comments => "comment",
        }
    }
}

impl From<Level> for Kind {
    fn from(l: Level) -> Kind {
        match l {
            Level::Categories => Kind::Categories,
            Level::Subjects => Kind::Subjects,
            Level::Topics => Kind::Topics,
            Level::Subtopics => Kind::Subtopics,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Kind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Kind, Error> {
        match s {
            "categories" | "category" => Ok(Kind::Categories),
            "subjects" | "subject" => Ok(Kind::Subjects),
            "topics" | "topic" => Ok(Kind::Topics),
            "subtopics" | "subtopic" => Ok(Kind::Subtopics),
            "comments" | "comment" => Ok(Kind::Comments),
            _ => Err(Error::Unknown(format!("unknown kind {s:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_order() {
        assert_eq!(Level::Categories.parent(), None);
        assert_eq!(Level::Subtopics.child(), None);
        for w in Level::ALL.windows(2) {
            assert!(w[0] < w[1]);
            assert_eq!(w[0].child(), Some(w[1]));
            assert_eq!(w[1].parent(), Some(w[0]));
        }
    }

    #[test]
    fn parse_kinds() {
        assert_eq!("topic".parse::<Kind>(), Ok(Kind::Topics));
        assert_eq!("subtopics".parse::<Level>(), Ok(Level::Subtopics));
        assert!("comments".parse::<Level>().is_err());
        assert!("lessons".parse::<Kind>().is_err());
    }
}
