use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};

use crate::{
    api::{self, Gateway, Resource},
    Config,
};

/// `Gateway` talking JSON to the REST API at `{base}/learn/{kind}/`
#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: reqwest::Client,
    config: Config,
}

impl HttpGateway {
    pub fn new(config: Config) -> HttpGateway {
        HttpGateway {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn request<R: Resource>(&self, method: Method, id: Option<&R::Id>) -> RequestBuilder {
        let url = match id {
            None => format!("{}/learn/{}/", self.config.base, R::KIND.path()),
            Some(id) => format!("{}/learn/{}/{}/", self.config.base, R::KIND.path(), id),
        };
        tracing::debug!(%method, %url, "sending request");
        let req = self.client.request(method, url);
        match &self.config.token {
            Some(tok) => req.bearer_auth(&tok.0),
            None => req,
        }
    }
}

/// Turns a non-success response into the api error it carries, falling back
/// to the raw body text, or to the status if there is no body at all
async fn check(resp: Response) -> anyhow::Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp
        .bytes()
        .await
        .with_context(|| format!("reading body of {status} response"))?;
    tracing::debug!(%status, "server returned an error");
    if let Ok(err) = api::Error::parse(&body) {
        return Err(err.into());
    }
    let text = String::from_utf8_lossy(&body);
    let text = text.trim();
    if text.is_empty() {
        return Err(anyhow!("server answered {status}"));
    }
    Err(api::Error::Unknown(String::from(text)).into())
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn list<R: Resource>(&mut self) -> anyhow::Result<Vec<R>> {
        let resp = self
            .request::<R>(Method::GET, None)
            .send()
            .await
            .with_context(|| format!("listing {}", R::KIND))?;
        check(resp)
            .await?
            .json()
            .await
            .with_context(|| format!("parsing {} list", R::KIND))
    }

    async fn create<R: Resource>(&mut self, data: &R::New) -> anyhow::Result<R> {
        let resp = self
            .request::<R>(Method::POST, None)
            .json(data)
            .send()
            .await
            .with_context(|| format!("creating {}", R::KIND.singular()))?;
        check(resp)
            .await?
            .json()
            .await
            .with_context(|| format!("parsing created {}", R::KIND.singular()))
    }

    async fn update<R: Resource>(&mut self, id: &R::Id, patch: &R::Patch) -> anyhow::Result<R> {
        let resp = self
            .request::<R>(Method::PATCH, Some(id))
            .json(patch)
            .send()
            .await
            .with_context(|| format!("updating {} {id}", R::KIND.singular()))?;
        check(resp)
            .await?
            .json()
            .await
            .with_context(|| format!("parsing updated {} {id}", R::KIND.singular()))
    }

    async fn remove<R: Resource>(&mut self, id: &R::Id) -> anyhow::Result<()> {
        let resp = self
            .request::<R>(Method::DELETE, Some(id))
            .send()
            .await
            .with_context(|| format!("removing {} {id}", R::KIND.singular()))?;
        // the body of a successful delete, if any, is of no interest
        check(resp).await?;
        Ok(())
    }
}
