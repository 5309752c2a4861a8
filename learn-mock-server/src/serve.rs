use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    async_trait,
    extract::{FromRequestParts, Path, State},
    http::{self, request, StatusCode},
    routing::{get, patch},
    Json, Router,
};
use learn_api::{AuthToken, Error as ApiError, Kind};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{MockServer, Request};

pub type SharedServer = Arc<Mutex<MockServer>>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl axum::response::IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let err = match self {
            Error::Anyhow(err) => {
                tracing::error!(?err, "internal server error");
                ApiError::Unknown(format!("Internal server error: {err:#}"))
            }
            Error::Api(err) => {
                tracing::info!("returning error to client: {err}");
                err
            }
        };
        (err.status_code(), err.contents()).into_response()
    }
}

/// The bearer token of the request, if it has one
pub struct Bearer(pub Option<AuthToken>);

#[async_trait]
impl<S: Sync> FromRequestParts<S> for Bearer {
    type Rejection = Error;

    async fn from_request_parts(req: &mut request::Parts, _state: &S) -> Result<Bearer, Error> {
        let Some(auth) = req.headers.get(http::header::AUTHORIZATION) else {
            return Ok(Bearer(None));
        };
        let auth = auth.to_str().map_err(|_| ApiError::PermissionDenied)?;
        let mut auth = auth.split(' ');
        if !auth
            .next()
            .ok_or(ApiError::PermissionDenied)?
            .eq_ignore_ascii_case("bearer")
        {
            return Err(ApiError::PermissionDenied.into());
        }
        let token = auth.next().ok_or(ApiError::PermissionDenied)?;
        if auth.next().is_some() {
            return Err(ApiError::PermissionDenied.into());
        }
        Ok(Bearer(AuthToken::from_raw(Some(token))))
    }
}

fn kind(raw: &str) -> Result<Kind, Error> {
    Ok(raw.parse::<Kind>()?)
}

async fn run(server: &SharedServer, auth: Bearer, req: Request) -> Result<Value, Error> {
    let mut server = server.lock().await;
    server.check_auth(auth.0.as_ref())?;
    Ok(server.handle(req)?)
}

async fn list(
    State(server): State<SharedServer>,
    auth: Bearer,
    Path(raw): Path<String>,
) -> Result<Json<Value>, Error> {
    Ok(Json(run(&server, auth, Request::List(kind(&raw)?)).await?))
}

async fn create(
    State(server): State<SharedServer>,
    auth: Bearer,
    Path(raw): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), Error> {
    let created = run(&server, auth, Request::Create(kind(&raw)?, body)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(server): State<SharedServer>,
    auth: Bearer,
    Path((raw, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Error> {
    Ok(Json(
        run(&server, auth, Request::Update(kind(&raw)?, id, body)).await?,
    ))
}

async fn remove(
    State(server): State<SharedServer>,
    auth: Bearer,
    Path((raw, id)): Path<(String, String)>,
) -> Result<StatusCode, Error> {
    run(&server, auth, Request::Remove(kind(&raw)?, id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Serves `server` under `/learn/{kind}/` and `/learn/{kind}/{id}/`
pub fn router(server: SharedServer) -> Router {
    Router::new()
        .route("/learn/:kind/", get(list).post(create))
        .route("/learn/:kind/:id/", patch(update).delete(remove))
        .with_state(server)
}

/// Starts serving `server` on a random local port, in the background of the
/// current tokio runtime
pub fn spawn(server: SharedServer) -> anyhow::Result<SocketAddr> {
    let listener =
        std::net::TcpListener::bind("127.0.0.1:0").context("binding mock server socket")?;
    let addr = listener
        .local_addr()
        .context("retrieving mock server address")?;
    let serve = axum::Server::from_tcp(listener)
        .context("listening on mock server socket")?
        .serve(router(server).into_make_service());
    tracing::info!(%addr, "mock server listening");
    tokio::spawn(async move {
        if let Err(err) = serve.await {
            tracing::error!(?err, "mock server stopped");
        }
    });
    Ok(addr)
}
