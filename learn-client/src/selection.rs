use crate::{
    api::{CategoryId, Level, Subject, SubjectId, Subtopic, Topic, TopicId},
    ContentTree, Row, Table,
};

/// Filter state of the flat list sections.
///
/// Unlike the `Explorer`, nothing here is required: an unset filter lists
/// the items of every parent in scope.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Selection {
    category: Option<CategoryId>,
    subject: Option<SubjectId>,
    topic: Option<TopicId>,
}

impl Selection {
    pub fn category(&self) -> Option<&CategoryId> {
        self.category.as_ref()
    }

    pub fn subject(&self) -> Option<&SubjectId> {
        self.subject.as_ref()
    }

    pub fn topic_id(&self) -> Option<&TopicId> {
        self.topic.as_ref()
    }

    pub fn select_category(&mut self, id: Option<CategoryId>) {
        self.category = id.filter(|id| !id.as_str().is_empty());
        self.subject = None;
        self.topic = None;
    }

    pub fn select_subject(&mut self, id: Option<SubjectId>) {
        self.subject = id.filter(|id| !id.as_str().is_empty());
        self.topic = None;
    }

    pub fn select_topic(&mut self, id: Option<TopicId>) {
        self.topic = id.filter(|id| !id.as_str().is_empty());
    }

    pub fn subjects<'a>(&self, tree: &'a ContentTree) -> Vec<&'a Subject> {
        tree.subjects(self.category())
    }

    pub fn topics<'a>(&self, tree: &'a ContentTree) -> Vec<&'a Topic> {
        tree.topics(self.category(), self.subject())
    }

    /// The selected topic, if there is one and it still exists
    pub fn topic<'a>(&self, tree: &'a ContentTree) -> Option<&'a Topic> {
        tree.topic(self.category(), self.subject(), self.topic_id()?)
    }

    /// Subtopics are only ever listed for one topic at a time
    pub fn subtopics<'a>(&self, tree: &'a ContentTree) -> &'a [Subtopic] {
        self.topic(tree).map(|t| &t.subtopics[..]).unwrap_or(&[])
    }

    /// The flat list of `level` under the current filters
    pub fn table(&self, level: Level, tree: &ContentTree) -> Table {
        let row = |key: String, cells: Vec<String>| Row {
            key,
            cells,
            drillable: false,
        };
        match level {
            Level::Categories => Table {
                title: String::from("Categories"),
                columns: &["Name", "Slug", "Subjects"],
                rows: tree
                    .categories()
                    .iter()
                    .map(|c| {
                        row(
                            c.id.to_string(),
                            vec![c.name.clone(), c.slug.clone(), c.subjects.len().to_string()],
                        )
                    })
                    .collect(),
            },
            Level::Subjects => Table {
                title: String::from("Subjects"),
                columns: &["Name", "Slug", "Topics"],
                rows: self
                    .subjects(tree)
                    .into_iter()
                    .map(|s| {
                        row(
                            s.id.to_string(),
                            vec![s.name.clone(), s.slug.clone(), s.topics.len().to_string()],
                        )
                    })
                    .collect(),
            },
            Level::Topics => Table {
                title: String::from("Topics"),
                columns: &["Title", "Slug", "Subtopics"],
                rows: self
                    .topics(tree)
                    .into_iter()
                    .map(|t| {
                        row(
                            t.id.to_string(),
                            vec![t.title.clone(), t.slug.clone(), t.subtopics.len().to_string()],
                        )
                    })
                    .collect(),
            },
            Level::Subtopics => Table {
                title: String::from("Subtopics"),
                columns: &["Title", "Likes", "Dislikes", "Comments"],
                rows: self
                    .subtopics(tree)
                    .iter()
                    .map(|st| {
                        row(
                            st.id.to_string(),
                            vec![
                                st.title.clone(),
                                st.likes.to_string(),
                                st.dislikes.to_string(),
                                st.comments.len().to_string(),
                            ],
                        )
                    })
                    .collect(),
            },
        }
    }
}
