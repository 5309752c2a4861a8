use anyhow::{anyhow, Context};
use serde_json::json;

use crate::{Kind, Level};

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Unknown(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("No {} with id {id}", .kind.singular())]
    NotFound { kind: Kind, id: String },

    #[error("Slug already used {0}")]
    SlugAlreadyUsed(String),

    #[error("{0} required")]
    Required(String),

    #[error("Select a {}", .0.singular())]
    SelectParent(Level),
}

impl Error {
    pub fn not_found(kind: Kind, id: impl ToString) -> Error {
        Error::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn status_code(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Error::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::PermissionDenied => StatusCode::FORBIDDEN,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::SlugAlreadyUsed(_) => StatusCode::CONFLICT,
            Error::Required(_) => StatusCode::BAD_REQUEST,
            Error::SelectParent(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        serde_json::to_vec(&match self {
            Error::Unknown(msg) => json!({
                "message": msg,
                "type": "unknown",
            }),
            Error::PermissionDenied => json!({
                "message": "permission denied",
                "type": "permission-denied",
            }),
            Error::NotFound { kind, id } => json!({
                "message": "not found",
                "type": "not-found",
                "kind": kind,
                "id": id,
            }),
            Error::SlugAlreadyUsed(s) => json!({
                "message": "slug already used",
                "type": "conflict-slug",
                "slug": s,
            }),
            Error::Required(field) => json!({
                "message": "required field is missing",
                "type": "required",
                "field": field,
            }),
            Error::SelectParent(level) => json!({
                "message": "no parent selected",
                "type": "select-parent",
                "level": level,
            }),
        })
        .expect("serializing error contents")
    }

    pub fn parse(body: &[u8]) -> anyhow::Result<Error> {
        let data: serde_json::Value =
            serde_json::from_slice(body).context("parsing error contents")?;
        let field = |name: &str| -> anyhow::Result<String> {
            data.get(name)
                .and_then(|f| f.as_str())
                .map(String::from)
                .ok_or_else(|| anyhow!("error contents has no string {name:?} field"))
        };
        Ok(
            match data
                .get("type")
                .and_then(|t| t.as_str())
                .ok_or_else(|| anyhow!("error type is not a string"))?
            {
                "unknown" => Error::Unknown(field("message").unwrap_or_default()),
                "permission-denied" => Error::PermissionDenied,
                "not-found" => Error::NotFound {
                    kind: field("kind")?.parse()?,
                    id: field("id")?,
                },
                "conflict-slug" => Error::SlugAlreadyUsed(field("slug")?),
                "required" => Error::Required(field("field")?),
                "select-parent" => Error::SelectParent(field("level")?.parse()?),
                _ => return Err(anyhow!("error contents has unknown type")),
            },
        )
    }
}
