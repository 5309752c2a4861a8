use std::sync::Arc;

use crate::{
    api::{Category, CategoryId, Subject, SubjectId, Topic, TopicId},
    Analytics,
};

/// The category tree as last fetched from the server.
///
/// This is a disposable cache: it is never edited in place, every mutation
/// is followed by a full refetch that replaces it wholesale. All the lookups
/// the views need go through here, with the same rules everywhere: an
/// unselected scope (`None`) means "everything", a scope whose id no longer
/// exists yields nothing.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ContentTree {
    categories: Arc<Vec<Category>>,
}

impl ContentTree {
    pub fn new(categories: Vec<Category>) -> ContentTree {
        ContentTree {
            categories: Arc::new(categories),
        }
    }

    pub fn empty() -> ContentTree {
        ContentTree::default()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Whether `other` is the very same fetch as `self`
    pub fn same_fetch(&self, other: &ContentTree) -> bool {
        Arc::ptr_eq(&self.categories, &other.categories)
    }

    pub fn analytics(&self) -> Analytics {
        Analytics::compute(&self.categories)
    }

    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == *id)
    }

    pub fn subjects(&self, category: Option<&CategoryId>) -> Vec<&Subject> {
        match category {
            None => self
                .categories
                .iter()
                .flat_map(|c| c.subjects.iter())
                .collect(),
            Some(id) => self
                .category(id)
                .map(|c| c.subjects.iter().collect())
                .unwrap_or_default(),
        }
    }

    pub fn subject(&self, category: Option<&CategoryId>, id: &SubjectId) -> Option<&Subject> {
        self.subjects(category).into_iter().find(|s| s.id == *id)
    }

    pub fn topics(&self, category: Option<&CategoryId>, subject: Option<&SubjectId>) -> Vec<&Topic> {
        match subject {
            None => self
                .subjects(category)
                .into_iter()
                .flat_map(|s| s.topics.iter())
                .collect(),
            Some(id) => self
                .subject(category, id)
                .map(|s| s.topics.iter().collect())
                .unwrap_or_default(),
        }
    }

    pub fn topic(
        &self,
        category: Option<&CategoryId>,
        subject: Option<&SubjectId>,
        id: &TopicId,
    ) -> Option<&Topic> {
        self.topics(category, subject)
            .into_iter()
            .find(|t| t.id == *id)
    }
}

impl From<Vec<Category>> for ContentTree {
    fn from(categories: Vec<Category>) -> ContentTree {
        ContentTree::new(categories)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::{Subtopic, SubtopicId};

    pub fn subtopic(id: &str) -> Subtopic {
        Subtopic {
            id: SubtopicId::new(id),
            title: format!("Subtopic {id}"),
            content: String::new(),
            likes: 0,
            dislikes: 0,
            comments: Vec::new(),
            created_at: "2024-01-01T00:00:00Z".parse().unwrap(),
            topic_id: None,
            topic_title: None,
            updated_at: None,
            updated_by_name: None,
        }
    }

    pub fn topic(id: &str, subtopics: Vec<Subtopic>) -> Topic {
        Topic {
            id: TopicId::new(id),
            title: format!("Topic {id}"),
            slug: id.to_lowercase(),
            description: None,
            subtopics,
            subject_id: None,
            subject_name: None,
            created_at: None,
            updated_at: None,
            updated_by_name: None,
        }
    }

    pub fn subject(id: &str, topics: Vec<Topic>) -> Subject {
        Subject {
            id: SubjectId::new(id),
            name: format!("Subject {id}"),
            slug: id.to_lowercase(),
            description: None,
            topics,
            category_id: None,
            category_name: None,
            created_at: None,
            updated_at: None,
            updated_by_name: None,
        }
    }

    pub fn category(id: &str, subjects: Vec<Subject>) -> Category {
        Category {
            id: CategoryId::new(id),
            name: format!("Category {id}"),
            slug: id.to_lowercase(),
            description: None,
            subjects,
            created_at: None,
            updated_at: None,
            updated_by_name: None,
        }
    }

    /// c1 > {s1 > {t1 > [st1, st2], t2 > []}, s2 > {t3 > [st3]}}, c2 > {s3 > {}}, c3 > {}
    pub fn example_tree() -> ContentTree {
        ContentTree::new(vec![
            category(
                "c1",
                vec![
                    subject(
                        "s1",
                        vec![
                            topic("t1", vec![subtopic("st1"), subtopic("st2")]),
                            topic("t2", vec![]),
                        ],
                    ),
                    subject("s2", vec![topic("t3", vec![subtopic("st3")])]),
                ],
            ),
            category("c2", vec![subject("s3", vec![])]),
            category("c3", vec![]),
        ])
    }

    fn ids<'a, T: 'a, I: std::fmt::Display + 'a>(
        items: impl IntoIterator<Item = &'a T>,
        id: impl Fn(&'a T) -> &'a I,
    ) -> Vec<String> {
        items.into_iter().map(|t| id(t).to_string()).collect()
    }

    #[test]
    fn unscoped_lookups_pool_everything() {
        let tree = example_tree();
        assert_eq!(ids(tree.subjects(None), |s| &s.id), ["s1", "s2", "s3"]);
        assert_eq!(ids(tree.topics(None, None), |t| &t.id), ["t1", "t2", "t3"]);
        assert!(tree.subject(None, &SubjectId::new("s3")).is_some());
    }

    #[test]
    fn scoped_lookups_stay_in_scope() {
        let tree = example_tree();
        let c1 = CategoryId::new("c1");
        let c2 = CategoryId::new("c2");
        assert_eq!(ids(tree.subjects(Some(&c1)), |s| &s.id), ["s1", "s2"]);
        assert_eq!(ids(tree.topics(Some(&c1), None), |t| &t.id), ["t1", "t2", "t3"]);
        assert_eq!(
            ids(tree.topics(Some(&c1), Some(&SubjectId::new("s2"))), |t| &t.id),
            ["t3"]
        );
        assert!(tree.subject(Some(&c2), &SubjectId::new("s1")).is_none());
        assert!(tree.topics(Some(&c2), Some(&SubjectId::new("s1"))).is_empty());
        assert!(tree
            .topic(Some(&c1), Some(&SubjectId::new("s1")), &TopicId::new("t3"))
            .is_none());
    }

    #[test]
    fn vanished_scope_yields_nothing() {
        let tree = example_tree();
        let gone = CategoryId::new("deleted");
        assert!(tree.subjects(Some(&gone)).is_empty());
        assert!(tree.topics(Some(&gone), None).is_empty());
        assert!(tree
            .topics(None, Some(&SubjectId::new("deleted")))
            .is_empty());
    }

    #[test]
    fn clones_share_the_fetch() {
        let tree = example_tree();
        assert!(tree.same_fetch(&tree.clone()));
        assert!(!tree.same_fetch(&example_tree()));
    }
}
