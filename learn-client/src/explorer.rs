use crate::{
    api::{Category, CategoryId, Level, Subject, SubjectId, Topic, TopicId},
    ContentTree,
};

/// Drill-down navigation through the hierarchy.
///
/// The variant is the level currently displayed, its fields are the
/// ancestors selected to get there.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Explorer {
    #[default]
    Categories,
    Subjects {
        category: CategoryId,
    },
    Topics {
        category: CategoryId,
        subject: SubjectId,
    },
    Subtopics {
        category: CategoryId,
        subject: SubjectId,
        topic: TopicId,
    },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExplorerMsg {
    OpenCategory(CategoryId),
    OpenSubject(SubjectId),
    OpenTopic(TopicId),
    Back,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Row {
    pub key: String,
    pub cells: Vec<String>,
    /// Whether selecting this row opens the next level
    pub drillable: bool,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Table {
    pub title: String,
    pub columns: &'static [&'static str],
    pub rows: Vec<Row>,
}

impl Explorer {
    pub fn update(self, msg: ExplorerMsg) -> Explorer {
        match (self, msg) {
            // Opening a category from anywhere drops whatever was selected below it
            (_, ExplorerMsg::OpenCategory(category)) => Explorer::Subjects { category },
            (
                Explorer::Subjects { category }
                | Explorer::Topics { category, .. }
                | Explorer::Subtopics { category, .. },
                ExplorerMsg::OpenSubject(subject),
            ) => Explorer::Topics { category, subject },
            (
                Explorer::Topics { category, subject }
                | Explorer::Subtopics {
                    category, subject, ..
                },
                ExplorerMsg::OpenTopic(topic),
            ) => Explorer::Subtopics {
                category,
                subject,
                topic,
            },
            (Explorer::Categories, ExplorerMsg::Back) => Explorer::Categories,
            (Explorer::Subjects { .. }, ExplorerMsg::Back) => Explorer::Categories,
            (Explorer::Topics { category, .. }, ExplorerMsg::Back) => {
                Explorer::Subjects { category }
            }
            (
                Explorer::Subtopics {
                    category, subject, ..
                },
                ExplorerMsg::Back,
            ) => Explorer::Topics { category, subject },
            (this, msg) => {
                tracing::warn!(?msg, level = ?this.level(), "ignoring explorer message with no selected parent");
                this
            }
        }
    }

    pub fn level(&self) -> Level {
        match self {
            Explorer::Categories => Level::Categories,
            Explorer::Subjects { .. } => Level::Subjects,
            Explorer::Topics { .. } => Level::Topics,
            Explorer::Subtopics { .. } => Level::Subtopics,
        }
    }

    pub fn category(&self) -> Option<&CategoryId> {
        match self {
            Explorer::Categories => None,
            Explorer::Subjects { category }
            | Explorer::Topics { category, .. }
            | Explorer::Subtopics { category, .. } => Some(category),
        }
    }

    pub fn subject(&self) -> Option<&SubjectId> {
        match self {
            Explorer::Topics { subject, .. } | Explorer::Subtopics { subject, .. } => Some(subject),
            _ => None,
        }
    }

    pub fn topic(&self) -> Option<&TopicId> {
        match self {
            Explorer::Subtopics { topic, .. } => Some(topic),
            _ => None,
        }
    }

    pub fn selected_category<'a>(&self, tree: &'a ContentTree) -> Option<&'a Category> {
        tree.category(self.category()?)
    }

    pub fn selected_subject<'a>(&self, tree: &'a ContentTree) -> Option<&'a Subject> {
        tree.subject(Some(self.category()?), self.subject()?)
    }

    pub fn selected_topic<'a>(&self, tree: &'a ContentTree) -> Option<&'a Topic> {
        tree.topic(Some(self.category()?), Some(self.subject()?), self.topic()?)
    }

    /// The rows to display at the current level. If an ancestor vanished
    /// from the tree the table is simply empty.
    pub fn table(&self, tree: &ContentTree) -> Table {
        match self {
            Explorer::Categories => Table {
                title: String::from("Categories"),
                columns: &["Name", "Slug", "Subjects"],
                rows: tree
                    .categories()
                    .iter()
                    .map(|c| Row {
                        key: c.id.to_string(),
                        cells: vec![c.name.clone(), c.slug.clone(), c.subjects.len().to_string()],
                        drillable: true,
                    })
                    .collect(),
            },
            Explorer::Subjects { category } => {
                let selected = self.selected_category(tree);
                Table {
                    title: format!(
                        "Subjects in {}",
                        selected.map(|c| c.name.as_str()).unwrap_or(category.as_str())
                    ),
                    columns: &["Name", "Slug", "Topics"],
                    rows: selected
                        .into_iter()
                        .flat_map(|c| &c.subjects)
                        .map(|s| Row {
                            key: s.id.to_string(),
                            cells: vec![s.name.clone(), s.slug.clone(), s.topics.len().to_string()],
                            drillable: true,
                        })
                        .collect(),
                }
            }
            Explorer::Topics { subject, .. } => {
                let selected = self.selected_subject(tree);
                Table {
                    title: format!(
                        "Topics in {}",
                        selected.map(|s| s.name.as_str()).unwrap_or(subject.as_str())
                    ),
                    columns: &["Title", "Slug", "Subtopics"],
                    rows: selected
                        .into_iter()
                        .flat_map(|s| &s.topics)
                        .map(|t| Row {
                            key: t.id.to_string(),
                            cells: vec![
                                t.title.clone(),
                                t.slug.clone(),
                                t.subtopics.len().to_string(),
                            ],
                            drillable: true,
                        })
                        .collect(),
                }
            }
            Explorer::Subtopics { topic, .. } => {
                let selected = self.selected_topic(tree);
                Table {
                    title: format!(
                        "Subtopics in {}",
                        selected.map(|t| t.title.as_str()).unwrap_or(topic.as_str())
                    ),
                    columns: &["Title", "Likes", "Dislikes"],
                    rows: selected
                        .into_iter()
                        .flat_map(|t| &t.subtopics)
                        .map(|st| Row {
                            key: st.id.to_string(),
                            cells: vec![
                                st.title.clone(),
                                st.likes.to_string(),
                                st.dislikes.to_string(),
                            ],
                            drillable: false,
                        })
                        .collect(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::tests::example_tree;

    fn open(path: &[&str]) -> Explorer {
        let msgs: [fn(&str) -> ExplorerMsg; 3] = [
            |id: &str| ExplorerMsg::OpenCategory(CategoryId::new(id)),
            |id: &str| ExplorerMsg::OpenSubject(SubjectId::new(id)),
            |id: &str| ExplorerMsg::OpenTopic(TopicId::new(id)),
        ];
        path.iter()
            .zip(msgs)
            .fold(Explorer::default(), |e, (id, msg)| e.update(msg(id)))
    }

    fn keys(t: &Table) -> Vec<&str> {
        t.rows.iter().map(|r| r.key.as_str()).collect()
    }

    #[test]
    fn starts_at_categories() {
        let tree = example_tree();
        let e = Explorer::default();
        assert_eq!(e.level(), Level::Categories);
        assert_eq!(e.category(), None);
        let t = e.table(&tree);
        assert_eq!(t.title, "Categories");
        assert_eq!(keys(&t), ["c1", "c2", "c3"]);
        assert_eq!(t.rows[0].cells, ["Category c1", "c1", "2"]);
        assert!(t.rows.iter().all(|r| r.drillable));
    }

    #[test]
    fn drill_down_to_subtopics() {
        let tree = example_tree();
        let e = open(&["c1", "s1", "t1"]);
        assert_eq!(e.level(), Level::Subtopics);
        let t = e.table(&tree);
        assert_eq!(t.title, "Subtopics in Topic t1");
        assert_eq!(t.columns, ["Title", "Likes", "Dislikes"]);
        let expected = tree.categories()[0].subjects[0].topics[0]
            .subtopics
            .iter()
            .map(|s| s.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(keys(&t), expected);
        assert_eq!(keys(&t), ["st1", "st2"]);
        assert!(t.rows.iter().all(|r| !r.drillable));
    }

    #[test]
    fn back_clears_the_level_left() {
        let e = open(&["c1", "s1", "t1"]).update(ExplorerMsg::Back);
        assert_eq!(
            e,
            Explorer::Topics {
                category: CategoryId::new("c1"),
                subject: SubjectId::new("s1"),
            }
        );
        assert_eq!(e.topic(), None);
        let e = e.update(ExplorerMsg::Back);
        assert_eq!(e.level(), Level::Subjects);
        assert_eq!(e.subject(), None);
        let e = e.update(ExplorerMsg::Back).update(ExplorerMsg::Back);
        assert_eq!(e, Explorer::Categories);
    }

    #[test]
    fn changing_ancestor_drops_descendants() {
        let e = open(&["c1", "s1", "t1"]).update(ExplorerMsg::OpenCategory(CategoryId::new("c2")));
        assert_eq!(
            e,
            Explorer::Subjects {
                category: CategoryId::new("c2")
            }
        );
        let e = open(&["c1", "s1", "t1"]).update(ExplorerMsg::OpenSubject(SubjectId::new("s2")));
        assert_eq!(e.level(), Level::Topics);
        assert_eq!(e.subject(), Some(&SubjectId::new("s2")));
        assert_eq!(e.topic(), None);
    }

    #[test]
    fn opening_without_parent_is_ignored() {
        let e = Explorer::Categories.update(ExplorerMsg::OpenSubject(SubjectId::new("s1")));
        assert_eq!(e, Explorer::Categories);
        let e = open(&["c1"]).update(ExplorerMsg::OpenTopic(TopicId::new("t1")));
        assert_eq!(e, open(&["c1"]));
    }

    #[test]
    fn vanished_ancestor_shows_empty_table() {
        let tree = example_tree();
        let t = open(&["gone", "s1"]).table(&tree);
        assert_eq!(t.title, "Topics in s1");
        assert!(t.rows.is_empty());
        let e = open(&["c2", "s1", "t1"]);
        assert!(e.selected_topic(&tree).is_none());
        assert!(e.table(&tree).rows.is_empty());
        let t = open(&["gone"]).table(&tree);
        assert_eq!(t.title, "Subjects in gone");
        assert!(t.rows.is_empty());
    }

    #[test]
    fn subject_rows_count_topics() {
        let tree = example_tree();
        let t = open(&["c1"]).table(&tree);
        assert_eq!(t.title, "Subjects in Category c1");
        assert_eq!(t.rows[0].cells, ["Subject s1", "s1", "2"]);
        assert_eq!(t.rows[1].cells, ["Subject s2", "s2", "1"]);
    }
}
