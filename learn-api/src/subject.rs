use crate::{CategoryId, Error, Kind, Level, Resource, Time, Topic};

crate::id_type!(SubjectId);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "crate::null_as_empty")]
    pub topics: Vec<Topic>,

    // Denormalized for display, nothing navigates through these
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by_name: Option<String>,
}

impl Subject {
    /// Number of subtopics across all the topics of this subject
    pub fn subtopic_count(&self) -> usize {
        self.topics.iter().map(|t| t.subtopics.len()).sum()
    }
}

impl Resource for Subject {
    const KIND: Kind = Kind::Subjects;

    type Id = SubjectId;
    type New = NewSubject;
    type Patch = SubjectPatch;

    fn id(&self) -> &SubjectId {
        &self.id
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewSubject {
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category_id: CategoryId,
}

impl NewSubject {
    pub fn validate(&self) -> Result<(), Error> {
        crate::require_parent(Level::Categories, self.category_id.as_str())?;
        crate::require("Name", &self.name)?;
        crate::require("Slug", &self.slug)?;
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SubjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}
