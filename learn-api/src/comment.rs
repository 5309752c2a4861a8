use crate::{Error, Kind, Level, Resource, SubtopicId, Time};

crate::id_type!(CommentId);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub user_name: String,
    pub text: String,
    #[serde(default, deserialize_with = "crate::null_as_zero")]
    pub likes: u64,
    #[serde(default, deserialize_with = "crate::null_as_zero")]
    pub dislikes: u64,
    pub created_at: Time,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtopic_id: Option<SubtopicId>,
}

impl Resource for Comment {
    const KIND: Kind = Kind::Comments;

    type Id = CommentId;
    type New = NewComment;
    type Patch = CommentPatch;

    fn id(&self) -> &CommentId {
        &self.id
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewComment {
    pub subtopic_id: SubtopicId,
    pub text: String,
}

impl NewComment {
    pub fn validate(&self) -> Result<(), Error> {
        crate::require_parent(Level::Subtopics, self.subtopic_id.as_str())?;
        crate::require("Text", &self.text)?;
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CommentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}
