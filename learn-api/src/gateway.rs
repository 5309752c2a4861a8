use std::fmt::Display;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::Kind;

/// An entity kind the REST API exposes as a collection
pub trait Resource: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    const KIND: Kind;

    type Id: Clone + Display + Eq + Send + Sync + Serialize + DeserializeOwned + 'static;
    type New: Send + Sync + Serialize + DeserializeOwned + 'static;
    type Patch: Send + Sync + Serialize + DeserializeOwned + 'static;

    fn id(&self) -> &Self::Id;
}

/// List/create/update/remove against the remote store, one collection per
/// `Resource`. Listing categories returns the whole nested tree, listing any
/// other kind returns a flat list.
///
/// Failures reported by the server are returned as a `crate::Error` wrapped
/// in the `anyhow::Error`.
#[async_trait]
pub trait Gateway: Send {
    async fn list<R: Resource>(&mut self) -> anyhow::Result<Vec<R>>;
    async fn create<R: Resource>(&mut self, data: &R::New) -> anyhow::Result<R>;
    async fn update<R: Resource>(&mut self, id: &R::Id, patch: &R::Patch) -> anyhow::Result<R>;
    async fn remove<R: Resource>(&mut self, id: &R::Id) -> anyhow::Result<()>;
}
