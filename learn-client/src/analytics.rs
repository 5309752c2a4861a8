use std::cmp::Reverse;

use crate::api::{Category, CategoryId, SubjectId, TopicId};

/// How many entries the "most coverage" rankings keep
pub const TOP_N: usize = 5;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Serialize)]
pub struct Totals {
    pub categories: usize,
    pub subjects: usize,
    pub topics: usize,
    pub subtopics: usize,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
pub struct CategoryRollup {
    pub id: CategoryId,
    pub name: String,
    pub subjects: usize,
    pub topics: usize,
    pub subtopics: usize,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
pub struct SubjectCoverage {
    pub id: SubjectId,
    pub name: String,
    /// Name of the owning category
    pub category: String,
    pub topics: usize,
    pub subtopics: usize,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
pub struct TopicCoverage {
    pub id: TopicId,
    pub title: String,
    pub subject: String,
    pub category: String,
    pub subtopics: usize,
}

/// Summary of a category tree: totals, one rollup row per category, and the
/// subjects and topics with the most content.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Serialize)]
pub struct Analytics {
    pub totals: Totals,
    pub categories: Vec<CategoryRollup>,
    pub top_subjects: Vec<SubjectCoverage>,
    pub top_topics: Vec<TopicCoverage>,
}

impl Analytics {
    pub fn compute(categories: &[Category]) -> Analytics {
        let rollups = categories
            .iter()
            .map(|c| CategoryRollup {
                id: c.id.clone(),
                name: c.name.clone(),
                subjects: c.subjects.len(),
                topics: c.topic_count(),
                subtopics: c.subtopic_count(),
            })
            .collect::<Vec<_>>();

        let totals = rollups.iter().fold(
            Totals {
                categories: rollups.len(),
                ..Totals::default()
            },
            |acc, r| Totals {
                subjects: acc.subjects + r.subjects,
                topics: acc.topics + r.topics,
                subtopics: acc.subtopics + r.subtopics,
                ..acc
            },
        );

        // sort_by_key is stable, so equal keys keep the tree order
        let mut top_subjects = categories
            .iter()
            .flat_map(|c| {
                c.subjects.iter().map(move |s| SubjectCoverage {
                    id: s.id.clone(),
                    name: s.name.clone(),
                    category: c.name.clone(),
                    topics: s.topics.len(),
                    subtopics: s.subtopic_count(),
                })
            })
            .collect::<Vec<_>>();
        top_subjects.sort_by_key(|s| Reverse((s.subtopics, s.topics)));
        top_subjects.truncate(TOP_N);

        let mut top_topics = categories
            .iter()
            .flat_map(|c| {
                c.subjects.iter().flat_map(move |s| {
                    s.topics.iter().map(move |t| TopicCoverage {
                        id: t.id.clone(),
                        title: t.title.clone(),
                        subject: s.name.clone(),
                        category: c.name.clone(),
                        subtopics: t.subtopics.len(),
                    })
                })
            })
            .collect::<Vec<_>>();
        top_topics.sort_by_key(|t| Reverse(t.subtopics));
        top_topics.truncate(TOP_N);

        Analytics {
            totals,
            categories: rollups,
            top_subjects,
            top_topics,
        }
    }

    /// No content at all yet
    pub fn is_empty(&self) -> bool {
        self.totals.categories == 0
    }
}
