use std::collections::VecDeque;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use learn_api::{
    AuthToken, Category, CategoryId, CategoryPatch, Comment, CommentId, CommentPatch, Error,
    Gateway, Kind, NewCategory, NewComment, NewSubject, NewSubtopic, NewTopic, Resource, Subject,
    SubjectId, SubjectPatch, Subtopic, SubtopicId, SubtopicPatch, Topic, TopicId, TopicPatch,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use uuid::Uuid;

mod serve;
pub use serve::{router, spawn, SharedServer};

/// Name recorded as the author of every change
const ADMIN_NAME: &str = "admin";

/// In-memory stand-in for the REST API.
///
/// Rows are stored flat with their parent id, and nested on the way out the
/// same way the real API nests them when listing categories.
#[derive(Debug, Default)]
pub struct MockServer {
    categories: Vec<Category>,
    subjects: Vec<Subject>,
    topics: Vec<Topic>,
    subtopics: Vec<Subtopic>,
    comments: Vec<Comment>,
    token: Option<AuthToken>,
    failures: VecDeque<Error>,
    requests: usize,
}

/// One call against the API, with its JSON body
#[derive(Clone, Debug)]
pub enum Request {
    List(Kind),
    Create(Kind, Value),
    Update(Kind, String, Value),
    Remove(Kind, String),
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn position<R: Resource>(items: &[R], id: &R::Id) -> Result<usize, Error> {
    items
        .iter()
        .position(|i| i.id() == id)
        .ok_or_else(|| Error::not_found(R::KIND, id))
}

fn to_json<T: Serialize>(v: &T) -> Result<Value, Error> {
    serde_json::to_value(v).map_err(|e| Error::Unknown(format!("serializing response: {e}")))
}

fn from_json<T: DeserializeOwned>(v: Value) -> Result<T, Error> {
    serde_json::from_value(v).map_err(|e| Error::Unknown(format!("invalid request body: {e}")))
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer::default()
    }

    /// A server that rejects every request not carrying `token`
    pub fn with_token(token: AuthToken) -> MockServer {
        MockServer {
            token: Some(token),
            ..MockServer::default()
        }
    }

    pub fn check_auth(&self, given: Option<&AuthToken>) -> Result<(), Error> {
        match &self.token {
            Some(expected) if given != Some(expected) => Err(Error::PermissionDenied),
            _ => Ok(()),
        }
    }

    /// Make the next request fail with `err`, whatever it is
    pub fn fail_next(&mut self, err: Error) {
        self.failures.push_back(err);
    }

    /// Number of requests received so far, failed ones included
    pub fn requests(&self) -> usize {
        self.requests
    }

    pub fn handle(&mut self, req: Request) -> Result<Value, Error> {
        self.requests += 1;
        if let Some(err) = self.failures.pop_front() {
            tracing::debug!(?req, %err, "failing request as asked");
            return Err(err);
        }
        match req {
            Request::List(kind) => match kind {
                Kind::Categories => to_json(&self.categories()),
                Kind::Subjects => to_json(&self.subjects()),
                Kind::Topics => to_json(&self.topics()),
                Kind::Subtopics => to_json(&self.subtopics()),
                Kind::Comments => to_json(&self.comments),
            },
            Request::Create(kind, body) => match kind {
                Kind::Categories => to_json(&self.create_category(from_json(body)?)?),
                Kind::Subjects => to_json(&self.create_subject(from_json(body)?)?),
                Kind::Topics => to_json(&self.create_topic(from_json(body)?)?),
                Kind::Subtopics => to_json(&self.create_subtopic(from_json(body)?)?),
                Kind::Comments => to_json(&self.create_comment(from_json(body)?)?),
            },
            Request::Update(kind, id, body) => match kind {
                Kind::Categories => {
                    to_json(&self.update_category(&CategoryId(id), from_json(body)?)?)
                }
                Kind::Subjects => to_json(&self.update_subject(&SubjectId(id), from_json(body)?)?),
                Kind::Topics => to_json(&self.update_topic(&TopicId(id), from_json(body)?)?),
                Kind::Subtopics => {
                    to_json(&self.update_subtopic(&SubtopicId(id), from_json(body)?)?)
                }
                Kind::Comments => to_json(&self.update_comment(&CommentId(id), from_json(body)?)?),
            },
            Request::Remove(kind, id) => {
                match kind {
                    Kind::Categories => self.remove_category(&CategoryId(id))?,
                    Kind::Subjects => self.remove_subject(&SubjectId(id))?,
                    Kind::Topics => self.remove_topic(&TopicId(id))?,
                    Kind::Subtopics => self.remove_subtopic(&SubtopicId(id))?,
                    Kind::Comments => self.remove_comment(&CommentId(id))?,
                }
                Ok(Value::Null)
            }
        }
    }

    fn nest_category(&self, c: &Category) -> Category {
        Category {
            subjects: self
                .subjects
                .iter()
                .filter(|s| s.category_id.as_ref() == Some(&c.id))
                .map(|s| self.nest_subject(s))
                .collect(),
            ..c.clone()
        }
    }

    fn nest_subject(&self, s: &Subject) -> Subject {
        Subject {
            topics: self
                .topics
                .iter()
                .filter(|t| t.subject_id.as_ref() == Some(&s.id))
                .map(|t| self.nest_topic(t))
                .collect(),
            category_name: self
                .categories
                .iter()
                .find(|c| s.category_id.as_ref() == Some(&c.id))
                .map(|c| c.name.clone()),
            ..s.clone()
        }
    }

    fn nest_topic(&self, t: &Topic) -> Topic {
        Topic {
            subtopics: self
                .subtopics
                .iter()
                .filter(|st| st.topic_id.as_ref() == Some(&t.id))
                .map(|st| self.nest_subtopic(st))
                .collect(),
            subject_name: self
                .subjects
                .iter()
                .find(|s| t.subject_id.as_ref() == Some(&s.id))
                .map(|s| s.name.clone()),
            ..t.clone()
        }
    }

    fn nest_subtopic(&self, st: &Subtopic) -> Subtopic {
        Subtopic {
            comments: self
                .comments
                .iter()
                .filter(|c| c.subtopic_id.as_ref() == Some(&st.id))
                .cloned()
                .collect(),
            topic_title: self
                .topics
                .iter()
                .find(|t| st.topic_id.as_ref() == Some(&t.id))
                .map(|t| t.title.clone()),
            ..st.clone()
        }
    }

    /// The full tree, as listing categories returns it
    pub fn categories(&self) -> Vec<Category> {
        self.categories
            .iter()
            .map(|c| self.nest_category(c))
            .collect()
    }

    pub fn subjects(&self) -> Vec<Subject> {
        self.subjects.iter().map(|s| self.nest_subject(s)).collect()
    }

    pub fn topics(&self) -> Vec<Topic> {
        self.topics.iter().map(|t| self.nest_topic(t)).collect()
    }

    pub fn subtopics(&self) -> Vec<Subtopic> {
        self.subtopics
            .iter()
            .map(|st| self.nest_subtopic(st))
            .collect()
    }

    fn check_category_slug(&self, slug: &str, except: Option<&CategoryId>) -> Result<(), Error> {
        if self
            .categories
            .iter()
            .any(|c| c.slug == slug && Some(&c.id) != except)
        {
            return Err(Error::SlugAlreadyUsed(String::from(slug)));
        }
        Ok(())
    }

    /// Subject slugs only need to be unique within their category
    fn check_subject_slug(
        &self,
        category: &CategoryId,
        slug: &str,
        except: Option<&SubjectId>,
    ) -> Result<(), Error> {
        if self.subjects.iter().any(|s| {
            s.category_id.as_ref() == Some(category) && s.slug == slug && Some(&s.id) != except
        }) {
            return Err(Error::SlugAlreadyUsed(String::from(slug)));
        }
        Ok(())
    }

    fn check_topic_slug(
        &self,
        subject: &SubjectId,
        slug: &str,
        except: Option<&TopicId>,
    ) -> Result<(), Error> {
        if self.topics.iter().any(|t| {
            t.subject_id.as_ref() == Some(subject) && t.slug == slug && Some(&t.id) != except
        }) {
            return Err(Error::SlugAlreadyUsed(String::from(slug)));
        }
        Ok(())
    }

    pub fn create_category(&mut self, new: NewCategory) -> Result<Category, Error> {
        new.validate()?;
        self.check_category_slug(&new.slug, None)?;
        let now = Utc::now();
        let c = Category {
            id: CategoryId(new_id()),
            name: new.name,
            slug: new.slug,
            description: new.description,
            subjects: Vec::new(),
            created_at: Some(now),
            updated_at: Some(now),
            updated_by_name: Some(String::from(ADMIN_NAME)),
        };
        self.categories.push(c.clone());
        Ok(c)
    }

    pub fn create_subject(&mut self, new: NewSubject) -> Result<Subject, Error> {
        new.validate()?;
        position(&self.categories, &new.category_id)?;
        self.check_subject_slug(&new.category_id, &new.slug, None)?;
        let now = Utc::now();
        let s = Subject {
            id: SubjectId(new_id()),
            name: new.name,
            slug: new.slug,
            description: new.description,
            topics: Vec::new(),
            category_id: Some(new.category_id),
            category_name: None,
            created_at: Some(now),
            updated_at: Some(now),
            updated_by_name: Some(String::from(ADMIN_NAME)),
        };
        self.subjects.push(s.clone());
        Ok(self.nest_subject(&s))
    }

    pub fn create_topic(&mut self, new: NewTopic) -> Result<Topic, Error> {
        new.validate()?;
        position(&self.subjects, &new.subject_id)?;
        self.check_topic_slug(&new.subject_id, &new.slug, None)?;
        let now = Utc::now();
        let t = Topic {
            id: TopicId(new_id()),
            title: new.title,
            slug: new.slug,
            description: new.description,
            subtopics: Vec::new(),
            subject_id: Some(new.subject_id),
            subject_name: None,
            created_at: Some(now),
            updated_at: Some(now),
            updated_by_name: Some(String::from(ADMIN_NAME)),
        };
        self.topics.push(t.clone());
        Ok(self.nest_topic(&t))
    }

    pub fn create_subtopic(&mut self, new: NewSubtopic) -> Result<Subtopic, Error> {
        new.validate()?;
        position(&self.topics, &new.topic_id)?;
        let now = Utc::now();
        let st = Subtopic {
            id: SubtopicId(new_id()),
            title: new.title,
            content: new.content,
            likes: 0,
            dislikes: 0,
            comments: Vec::new(),
            created_at: now,
            topic_id: Some(new.topic_id),
            topic_title: None,
            updated_at: Some(now),
            updated_by_name: Some(String::from(ADMIN_NAME)),
        };
        self.subtopics.push(st.clone());
        Ok(self.nest_subtopic(&st))
    }

    pub fn create_comment(&mut self, new: NewComment) -> Result<Comment, Error> {
        new.validate()?;
        position(&self.subtopics, &new.subtopic_id)?;
        let c = Comment {
            id: CommentId(new_id()),
            user_name: String::from(ADMIN_NAME),
            text: new.text,
            likes: 0,
            dislikes: 0,
            created_at: Utc::now(),
            subtopic_id: Some(new.subtopic_id),
        };
        self.comments.push(c.clone());
        Ok(c)
    }

    pub fn update_category(
        &mut self,
        id: &CategoryId,
        patch: CategoryPatch,
    ) -> Result<Category, Error> {
        let i = position(&self.categories, id)?;
        if let Some(name) = &patch.name {
            learn_api::require("Name", name)?;
        }
        if let Some(slug) = &patch.slug {
            learn_api::require("Slug", slug)?;
            self.check_category_slug(slug, Some(id))?;
        }
        let c = &mut self.categories[i];
        if let Some(name) = patch.name {
            c.name = name;
        }
        if let Some(slug) = patch.slug {
            c.slug = slug;
        }
        if let Some(description) = patch.description {
            c.description = Some(description);
        }
        c.updated_at = Some(Utc::now());
        Ok(self.nest_category(&self.categories[i]))
    }

    pub fn update_subject(&mut self, id: &SubjectId, patch: SubjectPatch) -> Result<Subject, Error> {
        let i = position(&self.subjects, id)?;
        if let Some(name) = &patch.name {
            learn_api::require("Name", name)?;
        }
        if let Some(category) = &patch.category_id {
            position(&self.categories, category)?;
        }
        let category = patch
            .category_id
            .clone()
            .or_else(|| self.subjects[i].category_id.clone());
        if let Some(slug) = &patch.slug {
            learn_api::require("Slug", slug)?;
        }
        if patch.slug.is_some() || patch.category_id.is_some() {
            let slug = patch.slug.as_ref().unwrap_or(&self.subjects[i].slug);
            if let Some(category) = &category {
                self.check_subject_slug(category, slug, Some(id))?;
            }
        }
        let s = &mut self.subjects[i];
        if let Some(name) = patch.name {
            s.name = name;
        }
        if let Some(slug) = patch.slug {
            s.slug = slug;
        }
        if let Some(description) = patch.description {
            s.description = Some(description);
        }
        s.category_id = category;
        s.updated_at = Some(Utc::now());
        Ok(self.nest_subject(&self.subjects[i]))
    }

    pub fn update_topic(&mut self, id: &TopicId, patch: TopicPatch) -> Result<Topic, Error> {
        let i = position(&self.topics, id)?;
        if let Some(title) = &patch.title {
            learn_api::require("Title", title)?;
        }
        if let Some(subject) = &patch.subject_id {
            position(&self.subjects, subject)?;
        }
        let subject = patch
            .subject_id
            .clone()
            .or_else(|| self.topics[i].subject_id.clone());
        if let Some(slug) = &patch.slug {
            learn_api::require("Slug", slug)?;
        }
        if patch.slug.is_some() || patch.subject_id.is_some() {
            let slug = patch.slug.as_ref().unwrap_or(&self.topics[i].slug);
            if let Some(subject) = &subject {
                self.check_topic_slug(subject, slug, Some(id))?;
            }
        }
        let t = &mut self.topics[i];
        if let Some(title) = patch.title {
            t.title = title;
        }
        if let Some(slug) = patch.slug {
            t.slug = slug;
        }
        if let Some(description) = patch.description {
            t.description = Some(description);
        }
        t.subject_id = subject;
        t.updated_at = Some(Utc::now());
        Ok(self.nest_topic(&self.topics[i]))
    }

    pub fn update_subtopic(
        &mut self,
        id: &SubtopicId,
        patch: SubtopicPatch,
    ) -> Result<Subtopic, Error> {
        let i = position(&self.subtopics, id)?;
        if let Some(title) = &patch.title {
            learn_api::require("Title", title)?;
        }
        if let Some(topic) = &patch.topic_id {
            position(&self.topics, topic)?;
        }
        let st = &mut self.subtopics[i];
        if let Some(title) = patch.title {
            st.title = title;
        }
        if let Some(content) = patch.content {
            st.content = content;
        }
        if let Some(topic) = patch.topic_id {
            st.topic_id = Some(topic);
        }
        st.updated_at = Some(Utc::now());
        Ok(self.nest_subtopic(&self.subtopics[i]))
    }

    pub fn update_comment(&mut self, id: &CommentId, patch: CommentPatch) -> Result<Comment, Error> {
        let i = position(&self.comments, id)?;
        if let Some(text) = patch.text {
            learn_api::require("Text", &text)?;
            self.comments[i].text = text;
        }
        Ok(self.comments[i].clone())
    }

    /// Removes the category and everything below it
    pub fn remove_category(&mut self, id: &CategoryId) -> Result<(), Error> {
        let i = position(&self.categories, id)?;
        self.categories.remove(i);
        let children = self
            .subjects
            .iter()
            .filter(|s| s.category_id.as_ref() == Some(id))
            .map(|s| s.id.clone())
            .collect::<Vec<_>>();
        for s in children {
            self.remove_subject(&s)?;
        }
        Ok(())
    }

    pub fn remove_subject(&mut self, id: &SubjectId) -> Result<(), Error> {
        let i = position(&self.subjects, id)?;
        self.subjects.remove(i);
        let children = self
            .topics
            .iter()
            .filter(|t| t.subject_id.as_ref() == Some(id))
            .map(|t| t.id.clone())
            .collect::<Vec<_>>();
        for t in children {
            self.remove_topic(&t)?;
        }
        Ok(())
    }

    pub fn remove_topic(&mut self, id: &TopicId) -> Result<(), Error> {
        let i = position(&self.topics, id)?;
        self.topics.remove(i);
        let children = self
            .subtopics
            .iter()
            .filter(|st| st.topic_id.as_ref() == Some(id))
            .map(|st| st.id.clone())
            .collect::<Vec<_>>();
        for st in children {
            self.remove_subtopic(&st)?;
        }
        Ok(())
    }

    pub fn remove_subtopic(&mut self, id: &SubtopicId) -> Result<(), Error> {
        let i = position(&self.subtopics, id)?;
        self.subtopics.remove(i);
        self.comments
            .retain(|c| c.subtopic_id.as_ref() != Some(id));
        Ok(())
    }

    pub fn remove_comment(&mut self, id: &CommentId) -> Result<(), Error> {
        let i = position(&self.comments, id)?;
        self.comments.remove(i);
        Ok(())
    }
}

#[async_trait]
impl Gateway for MockServer {
    async fn list<R: Resource>(&mut self) -> anyhow::Result<Vec<R>> {
        let res = self.handle(Request::List(R::KIND))?;
        serde_json::from_value(res).with_context(|| format!("parsing {} list", R::KIND))
    }

    async fn create<R: Resource>(&mut self, data: &R::New) -> anyhow::Result<R> {
        let body = serde_json::to_value(data).context("serializing request body")?;
        let res = self.handle(Request::Create(R::KIND, body))?;
        serde_json::from_value(res)
            .with_context(|| format!("parsing created {}", R::KIND.singular()))
    }

    async fn update<R: Resource>(&mut self, id: &R::Id, patch: &R::Patch) -> anyhow::Result<R> {
        let body = serde_json::to_value(patch).context("serializing request body")?;
        let res = self.handle(Request::Update(R::KIND, id.to_string(), body))?;
        serde_json::from_value(res)
            .with_context(|| format!("parsing updated {} {id}", R::KIND.singular()))
    }

    async fn remove<R: Resource>(&mut self, id: &R::Id) -> anyhow::Result<()> {
        self.handle(Request::Remove(R::KIND, id.to_string()))?;
        Ok(())
    }
}
