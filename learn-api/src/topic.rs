use crate::{Error, Kind, Level, Resource, SubjectId, Subtopic, Time};

crate::id_type!(TopicId);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Topic {
    pub id: TopicId,
    pub title: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "crate::null_as_empty")]
    pub subtopics: Vec<Subtopic>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<SubjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by_name: Option<String>,
}

impl Resource for Topic {
    const KIND: Kind = Kind::Topics;

    type Id = TopicId;
    type New = NewTopic;
    type Patch = TopicPatch;

    fn id(&self) -> &TopicId {
        &self.id
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewTopic {
    pub title: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub subject_id: SubjectId,
}

impl NewTopic {
    pub fn validate(&self) -> Result<(), Error> {
        crate::require_parent(Level::Subjects, self.subject_id.as_str())?;
        crate::require("Title", &self.title)?;
        crate::require("Slug", &self.slug)?;
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct TopicPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<SubjectId>,
}
