use crate::{Error, Kind, Resource, Subject, Time};

crate::id_type!(CategoryId);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "crate::null_as_empty")]
    pub subjects: Vec<Subject>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by_name: Option<String>,
}

impl Category {
    /// Number of topics across all the subjects of this category
    pub fn topic_count(&self) -> usize {
        self.subjects.iter().map(|s| s.topics.len()).sum()
    }

    /// Number of subtopics across the whole subtree of this category
    pub fn subtopic_count(&self) -> usize {
        self.subjects.iter().map(Subject::subtopic_count).sum()
    }
}

impl Resource for Category {
    const KIND: Kind = Kind::Categories;

    type Id = CategoryId;
    type New = NewCategory;
    type Patch = CategoryPatch;

    fn id(&self) -> &CategoryId {
        &self.id
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewCategory {
    pub fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() || self.slug.trim().is_empty() {
            return Err(Error::Required(String::from("Name & Slug")));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CategoryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_null_children_are_empty() {
        let c: Category =
            serde_json::from_str(r#"{"id": "c1", "name": "Maths", "slug": "maths"}"#).unwrap();
        assert!(c.subjects.is_empty());
        assert_eq!(c.description, None);

        let c: Category = serde_json::from_str(
            r#"{"id": "c1", "name": "Maths", "slug": "maths", "subjects": null}"#,
        )
        .unwrap();
        assert!(c.subjects.is_empty());
        assert_eq!(c.topic_count(), 0);
        assert_eq!(c.subtopic_count(), 0);
    }

    #[test]
    fn nested_tree_rollups() {
        let c: Category = serde_json::from_str(
            r#"{
                "id": "c1", "name": "Maths", "slug": "maths",
                "created_at": "2024-03-01T10:00:00+01:00",
                "subjects": [
                    {"id": "s1", "name": "Algebra", "slug": "algebra", "topics": [
                        {"id": "t1", "title": "Groups", "slug": "groups", "subtopics": [
                            {"id": "st1", "title": "Definition", "content": "",
                             "created_at": "2024-03-01T10:00:00Z"},
                            {"id": "st2", "title": "Examples", "content": "",
                             "created_at": "2024-03-01T10:00:00Z", "likes": 3}
                        ]},
                        {"id": "t2", "title": "Rings", "slug": "rings"}
                    ]},
                    {"id": "s2", "name": "Analysis", "slug": "analysis", "topics": null}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(c.subjects.len(), 2);
        assert_eq!(c.topic_count(), 2);
        assert_eq!(c.subtopic_count(), 2);
        assert_eq!(c.subjects[0].topics[0].subtopics[1].likes, 3);
        assert_eq!(c.subjects[0].topics[0].subtopics[1].dislikes, 0);
        assert_eq!(
            c.created_at.unwrap().to_rfc3339(),
            "2024-03-01T09:00:00+00:00"
        );
    }

    #[test]
    fn patch_only_sends_set_fields() {
        let patch = CategoryPatch {
            name: Some(String::from("Mathematics")),
            ..CategoryPatch::default()
        };
        assert_eq!(
            serde_json::to_string(&patch).unwrap(),
            r#"{"name":"Mathematics"}"#
        );
    }

    #[test]
    fn validation() {
        let mut new = NewCategory {
            name: String::from("Maths"),
            slug: String::new(),
            description: None,
        };
        assert_eq!(
            new.validate(),
            Err(Error::Required(String::from("Name & Slug")))
        );
        new.slug = String::from("maths");
        assert_eq!(new.validate(), Ok(()));
    }
}
