use crate::{Comment, Error, Kind, Level, Resource, Time, TopicId};

crate::id_type!(SubtopicId);

/// Leaf of the hierarchy: the actual lesson content
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Subtopic {
    pub id: SubtopicId,
    pub title: String,
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "crate::null_as_zero")]
    pub likes: u64,
    #[serde(default, deserialize_with = "crate::null_as_zero")]
    pub dislikes: u64,
    #[serde(default, deserialize_with = "crate::null_as_empty")]
    pub comments: Vec<Comment>,
    pub created_at: Time,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<TopicId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by_name: Option<String>,
}

impl Resource for Subtopic {
    const KIND: Kind = Kind::Subtopics;

    type Id = SubtopicId;
    type New = NewSubtopic;
    type Patch = SubtopicPatch;

    fn id(&self) -> &SubtopicId {
        &self.id
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewSubtopic {
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub topic_id: TopicId,
}

impl NewSubtopic {
    pub fn validate(&self) -> Result<(), Error> {
        crate::require_parent(Level::Topics, self.topic_id.as_str())?;
        crate::require("Title", &self.title)?;
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SubtopicPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<TopicId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_default_to_zero() {
        let s: Subtopic = serde_json::from_str(
            r#"{"id": "st1", "title": "Intro", "created_at": "2024-01-01T00:00:00Z",
                "likes": null, "comments": null}"#,
        )
        .unwrap();
        assert_eq!((s.likes, s.dislikes), (0, 0));
        assert_eq!(s.content, "");
        assert!(s.comments.is_empty());
    }

    #[test]
    fn null_content_reads_as_empty() {
        let s: Subtopic = serde_json::from_str(
            r#"{"id": "st1", "title": "Intro", "created_at": "2024-01-01T00:00:00Z",
                "content": null}"#,
        )
        .unwrap();
        assert_eq!(s.content, "");

        let c: crate::Category = serde_json::from_str(
            r#"{"id": "c1", "name": "Maths", "slug": "maths", "subjects": [
                {"id": "s1", "name": "Algebra", "slug": "algebra", "topics": [
                    {"id": "t1", "title": "Groups", "slug": "groups", "subtopics": [
                        {"id": "st1", "title": "Intro", "content": null,
                         "created_at": "2024-01-01T00:00:00Z"}
                    ]}
                ]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(c.subtopic_count(), 1);
    }

    #[test]
    fn negative_counters_are_rejected() {
        assert!(serde_json::from_str::<Subtopic>(
            r#"{"id": "st1", "title": "Intro", "created_at": "2024-01-01T00:00:00Z", "likes": -1}"#,
        )
        .is_err());
    }

    #[test]
    fn content_is_optional_but_title_is_not() {
        let new = NewSubtopic {
            title: String::new(),
            content: String::from("body"),
            topic_id: TopicId::new("t1"),
        };
        assert_eq!(new.validate(), Err(Error::Required(String::from("Title"))));
    }
}
