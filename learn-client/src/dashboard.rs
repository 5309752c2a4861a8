use anyhow::Context;

use crate::{
    api::{
        Category, CategoryId, CategoryPatch, Comment, CommentId, CommentPatch, Error as ApiError,
        Gateway, Kind, Level, NewCategory, NewComment, NewSubject, NewSubtopic, NewTopic,
        Resource, Subject, SubjectId, SubjectPatch, Subtopic, SubtopicId, SubtopicPatch, Topic,
        TopicId, TopicPatch,
    },
    Analytics, ContentTree, Error, Explorer, ExplorerMsg, Selection, Table,
};

/// Fields of the "create subtopic" form. The parent topic is the one
/// currently selected in the sections.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SubtopicForm {
    pub title: String,
    pub content: String,
}

/// Something that can be deleted
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Target {
    Category(CategoryId),
    Subject(SubjectId),
    Topic(TopicId),
    Subtopic(SubtopicId),
    Comment(CommentId),
}

impl Target {
    pub fn kind(&self) -> Kind {
        match self {
            Target::Category(_) => Kind::Categories,
            Target::Subject(_) => Kind::Subjects,
            Target::Topic(_) => Kind::Topics,
            Target::Subtopic(_) => Kind::Subtopics,
            Target::Comment(_) => Kind::Comments,
        }
    }

    /// Question to ask before deleting
    pub fn prompt(&self) -> String {
        format!("Delete this {}?", self.kind().singular())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Removal {
    Removed,
    /// The user answered no, nothing was sent
    Declined,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Update {
    Category(CategoryId, CategoryPatch),
    Subject(SubjectId, SubjectPatch),
    Topic(TopicId, TopicPatch),
    Subtopic(SubtopicId, SubtopicPatch),
    Comment(CommentId, CommentPatch),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Updated {
    Category(Category),
    Subject(Subject),
    Topic(Topic),
    Subtopic(Subtopic),
    Comment(Comment),
}

/// State of the admin page: the last fetched tree and everything the views
/// derive from it.
///
/// Every mutation is sent to the gateway, then the whole tree is fetched
/// again. A failed validation or mutation leaves the state untouched, a
/// failed fetch leaves an empty tree.
pub struct Dashboard<G> {
    gateway: G,
    tree: ContentTree,
    analytics: Analytics,
    tab: Level,
    selection: Selection,
    explorer: Explorer,
}

impl<G: Gateway> Dashboard<G> {
    pub fn new(gateway: G) -> Dashboard<G> {
        Dashboard {
            gateway,
            tree: ContentTree::empty(),
            analytics: Analytics::default(),
            tab: Level::Categories,
            selection: Selection::default(),
            explorer: Explorer::default(),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    pub fn tree(&self) -> &ContentTree {
        &self.tree
    }

    pub fn analytics(&self) -> &Analytics {
        &self.analytics
    }

    pub fn tab(&self) -> Level {
        self.tab
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn explorer(&self) -> &Explorer {
        &self.explorer
    }

    fn replace_tree(&mut self, tree: ContentTree) {
        self.analytics = tree.analytics();
        self.tree = tree;
    }

    pub async fn refresh(&mut self) -> Result<(), Error> {
        match self
            .gateway
            .list::<Category>()
            .await
            .context("Failed to load data")
        {
            Ok(categories) => {
                tracing::debug!(categories = categories.len(), "fetched category tree");
                self.replace_tree(ContentTree::new(categories));
                Ok(())
            }
            Err(err) => {
                tracing::debug!(?err, "failed fetching category tree");
                self.replace_tree(ContentTree::empty());
                Err(err.into())
            }
        }
    }

    async fn create<R: Resource>(&mut self, data: &R::New) -> Result<R, Error> {
        let created = self
            .gateway
            .create::<R>(data)
            .await
            .with_context(|| format!("Failed to create {}", R::KIND.singular()))?;
        tracing::debug!(kind = %R::KIND, id = %created.id(), "created");
        self.refresh().await?;
        Ok(created)
    }

    pub async fn create_category(&mut self, new: NewCategory) -> Result<Category, Error> {
        new.validate()?;
        self.create::<Category>(&new).await
    }

    pub async fn create_subject(&mut self, new: NewSubject) -> Result<Subject, Error> {
        new.validate()?;
        self.create::<Subject>(&new).await
    }

    pub async fn create_topic(&mut self, new: NewTopic) -> Result<Topic, Error> {
        new.validate()?;
        self.create::<Topic>(&new).await
    }

    pub async fn create_subtopic(&mut self, form: SubtopicForm) -> Result<Subtopic, Error> {
        let topic_id = self
            .selection
            .topic_id()
            .cloned()
            .ok_or(ApiError::SelectParent(Level::Topics))?;
        let new = NewSubtopic {
            title: form.title,
            content: form.content,
            topic_id,
        };
        new.validate()?;
        self.create::<Subtopic>(&new).await
    }

    pub async fn create_comment(&mut self, new: NewComment) -> Result<Comment, Error> {
        new.validate()?;
        self.create::<Comment>(&new).await
    }

    async fn patch<R: Resource>(&mut self, id: &R::Id, patch: &R::Patch) -> Result<R, Error> {
        let updated = self
            .gateway
            .update::<R>(id, patch)
            .await
            .with_context(|| format!("Failed to update {}", R::KIND.singular()))?;
        tracing::debug!(kind = %R::KIND, %id, "updated");
        Ok(updated)
    }

    pub async fn update(&mut self, update: Update) -> Result<Updated, Error> {
        let updated = match update {
            Update::Category(id, p) => Updated::Category(self.patch(&id, &p).await?),
            Update::Subject(id, p) => Updated::Subject(self.patch(&id, &p).await?),
            Update::Topic(id, p) => Updated::Topic(self.patch(&id, &p).await?),
            Update::Subtopic(id, p) => Updated::Subtopic(self.patch(&id, &p).await?),
            Update::Comment(id, p) => Updated::Comment(self.patch(&id, &p).await?),
        };
        self.refresh().await?;
        Ok(updated)
    }

    /// Deletes `target` if `confirm` agrees to the question it is asked
    pub async fn remove(
        &mut self,
        target: Target,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<Removal, Error> {
        if !confirm(&target.prompt()) {
            tracing::debug!(?target, "deletion declined");
            return Ok(Removal::Declined);
        }
        let res = match &target {
            Target::Category(id) => self.gateway.remove::<Category>(id).await,
            Target::Subject(id) => self.gateway.remove::<Subject>(id).await,
            Target::Topic(id) => self.gateway.remove::<Topic>(id).await,
            Target::Subtopic(id) => self.gateway.remove::<Subtopic>(id).await,
            Target::Comment(id) => self.gateway.remove::<Comment>(id).await,
        };
        res.with_context(|| format!("Failed to delete {}", target.kind().singular()))?;
        tracing::debug!(?target, "removed");
        self.refresh().await?;
        Ok(Removal::Removed)
    }

    pub fn set_tab(&mut self, tab: Level) {
        self.tab = tab;
    }

    /// The list shown under the active tab, filtered by the selection
    pub fn section(&self) -> Table {
        self.selection.table(self.tab, &self.tree)
    }

    pub fn select_category(&mut self, id: Option<CategoryId>) {
        self.selection.select_category(id);
    }

    pub fn select_subject(&mut self, id: Option<SubjectId>) {
        self.selection.select_subject(id);
    }

    pub fn select_topic(&mut self, id: Option<TopicId>) {
        self.selection.select_topic(id);
    }

    pub fn explore(&mut self, msg: ExplorerMsg) {
        self.explorer = std::mem::take(&mut self.explorer).update(msg);
    }
}

#[cfg(test)]
mod tests {
    use learn_mock_server::MockServer;

    use super::*;

    async fn dashboard() -> Dashboard<MockServer> {
        let mut d = Dashboard::new(MockServer::new());
        d.refresh().await.unwrap();
        d
    }

    fn new_category(name: &str) -> NewCategory {
        NewCategory {
            name: String::from(name),
            slug: name.to_lowercase(),
            description: None,
        }
    }

    /// Creates c > s > t and returns their ids
    async fn chain(d: &mut Dashboard<MockServer>) -> (CategoryId, SubjectId, TopicId) {
        let c = d.create_category(new_category("Maths")).await.unwrap();
        let s = d
            .create_subject(NewSubject {
                name: String::from("Algebra"),
                slug: String::from("algebra"),
                description: None,
                category_id: c.id.clone(),
            })
            .await
            .unwrap();
        let t = d
            .create_topic(NewTopic {
                title: String::from("Groups"),
                slug: String::from("groups"),
                description: Some(String::from("Sets with an operation")),
                subject_id: s.id.clone(),
            })
            .await
            .unwrap();
        (c.id, s.id, t.id)
    }

    #[tokio::test]
    async fn created_entities_show_up_after_refetch() {
        let mut d = dashboard().await;
        assert!(d.analytics().is_empty());
        let (c, s, t) = chain(&mut d).await;
        d.select_category(Some(c.clone()));
        d.select_subject(Some(s.clone()));
        d.select_topic(Some(t.clone()));
        d.create_subtopic(SubtopicForm {
            title: String::from("Definition"),
            content: String::from("A group is..."),
        })
        .await
        .unwrap();
        d.create_subtopic(SubtopicForm {
            title: String::from("Examples"),
            content: String::new(),
        })
        .await
        .unwrap();

        let totals = d.analytics().totals;
        assert_eq!(
            (totals.categories, totals.subjects, totals.topics, totals.subtopics),
            (1, 1, 1, 2)
        );
        let titles = d
            .selection()
            .subtopics(d.tree())
            .iter()
            .map(|s| s.title.as_str())
            .collect::<Vec<_>>();
        assert_eq!(titles, ["Definition", "Examples"]);
    }

    #[tokio::test]
    async fn explorer_drills_down_the_refetched_tree() {
        let mut d = dashboard().await;
        let (c, s, t) = chain(&mut d).await;
        d.explore(ExplorerMsg::OpenCategory(c));
        d.explore(ExplorerMsg::OpenSubject(s));
        d.explore(ExplorerMsg::OpenTopic(t.clone()));
        assert_eq!(d.explorer().level(), Level::Subtopics);
        assert_eq!(d.explorer().table(d.tree()).title, "Subtopics in Groups");

        d.remove(Target::Topic(t), |_| true).await.unwrap();
        let table = d.explorer().table(d.tree());
        assert!(table.rows.is_empty());
        assert_eq!(d.explorer().level(), Level::Subtopics);
    }

    #[tokio::test]
    async fn section_follows_tab_and_selection() {
        let mut d = dashboard().await;
        let (c, s, t) = chain(&mut d).await;
        assert_eq!(d.tab(), Level::Categories);
        assert_eq!(d.section().title, "Categories");
        assert_eq!(d.section().rows[0].key, c.to_string());

        d.set_tab(Level::Topics);
        d.select_category(Some(c));
        d.select_subject(Some(s));
        let section = d.section();
        assert_eq!(section.title, "Topics");
        assert_eq!(section.rows[0].key, t.to_string());
        assert_eq!(section.rows[0].cells, ["Groups", "groups", "0"]);

        d.set_tab(Level::Subtopics);
        assert!(d.section().rows.is_empty());
        d.select_topic(Some(t));
        d.create_subtopic(SubtopicForm {
            title: String::from("Definition"),
            content: String::new(),
        })
        .await
        .unwrap();
        assert_eq!(d.section().rows[0].cells[0], "Definition");
        assert_eq!(d.tab(), Level::Subtopics);
    }

    #[tokio::test]
    async fn validation_happens_before_any_request() {
        let mut d = dashboard().await;
        let before = d.gateway().requests();
        let err = d.create_category(new_category("")).await.unwrap_err();
        assert_eq!(err.message(), "Name & Slug required");
        let err = d
            .create_subtopic(SubtopicForm {
                title: String::from("Orphan"),
                content: String::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Select a topic");
        assert_eq!(d.gateway().requests(), before);
    }

    #[tokio::test]
    async fn failed_creation_keeps_the_tree() {
        let mut d = dashboard().await;
        d.create_category(new_category("Maths")).await.unwrap();
        let tree = d.tree().clone();

        let err = d.create_category(new_category("Maths")).await.unwrap_err();
        assert_eq!(
            err.message(),
            "Failed to create category: Slug already used maths"
        );
        assert_eq!(
            err.api_error(),
            Some(&ApiError::SlugAlreadyUsed(String::from("maths")))
        );
        assert!(d.tree().same_fetch(&tree));
    }

    #[tokio::test]
    async fn failed_refresh_empties_the_tree() {
        let mut d = dashboard().await;
        chain(&mut d).await;
        assert!(!d.tree().is_empty());

        d.gateway_mut()
            .fail_next(ApiError::Unknown(String::from("upstream timeout")));
        let err = d.refresh().await.unwrap_err();
        assert_eq!(err.message(), "Failed to load data: upstream timeout");
        assert!(d.tree().is_empty());
        assert!(d.analytics().is_empty());

        d.refresh().await.unwrap();
        assert_eq!(d.tree().categories().len(), 1);
    }

    #[tokio::test]
    async fn declined_delete_sends_nothing() {
        let mut d = dashboard().await;
        let (c, _, _) = chain(&mut d).await;
        let before = d.gateway().requests();
        let mut asked = None;
        let res = d
            .remove(Target::Category(c), |q| {
                asked = Some(String::from(q));
                false
            })
            .await
            .unwrap();
        assert_eq!(res, Removal::Declined);
        assert_eq!(asked.as_deref(), Some("Delete this category?"));
        assert_eq!(d.gateway().requests(), before);
        assert_eq!(d.analytics().totals.topics, 1);
    }

    #[tokio::test]
    async fn deleting_a_category_drops_its_subtree() {
        let mut d = dashboard().await;
        let (c, _, _) = chain(&mut d).await;
        d.create_category(new_category("Physics")).await.unwrap();
        assert_eq!(d.analytics().totals.topics, 1);

        let res = d.remove(Target::Category(c), |_| true).await.unwrap();
        assert_eq!(res, Removal::Removed);
        let a = d.analytics();
        assert_eq!(
            (a.totals.categories, a.totals.subjects, a.totals.topics),
            (1, 0, 0)
        );
        assert!(a.top_subjects.is_empty());
        assert_eq!(d.gateway().subjects().len(), 0);
    }

    #[tokio::test]
    async fn deleting_something_gone_reports_it() {
        let mut d = dashboard().await;
        let err = d
            .remove(Target::Subtopic(SubtopicId::new("nope")), |_| true)
            .await
            .unwrap_err();
        assert_eq!(
            err.message(),
            "Failed to delete subtopic: No subtopic with id nope"
        );
    }

    #[tokio::test]
    async fn updates_are_refetched() {
        let mut d = dashboard().await;
        let (c, s, _) = chain(&mut d).await;
        let updated = d
            .update(Update::Subject(
                s,
                SubjectPatch {
                    name: Some(String::from("Linear algebra")),
                    ..SubjectPatch::default()
                },
            ))
            .await
            .unwrap();
        match updated {
            Updated::Subject(s) => assert_eq!(s.name, "Linear algebra"),
            other => panic!("unexpected update result {other:?}"),
        }
        assert_eq!(d.analytics().top_subjects[0].name, "Linear algebra");
        assert_eq!(d.tree().category(&c).unwrap().subjects[0].slug, "algebra");
    }

    #[tokio::test]
    async fn comments_hang_off_subtopics() {
        let mut d = dashboard().await;
        let (_, _, t) = chain(&mut d).await;
        d.select_topic(Some(t));
        let st = d
            .create_subtopic(SubtopicForm {
                title: String::from("Definition"),
                content: String::new(),
            })
            .await
            .unwrap();
        let comment = d
            .create_comment(NewComment {
                subtopic_id: st.id.clone(),
                text: String::from("Nice explanation"),
            })
            .await
            .unwrap();
        let subtopic = &d.selection().subtopics(d.tree())[0];
        assert_eq!(subtopic.comments.len(), 1);
        assert_eq!(subtopic.comments[0].id, comment.id);

        d.remove(Target::Comment(comment.id), |_| true)
            .await
            .unwrap();
        assert!(d.selection().subtopics(d.tree())[0].comments.is_empty());
    }
}
