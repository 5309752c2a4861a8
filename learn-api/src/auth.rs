/// Bearer token attached to every request when one is configured
#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct AuthToken(pub String);

impl AuthToken {
    /// Returns `None` for values that mean "not logged in": empty, or the
    /// `null` and `undefined` strings a browser storage can leave behind
    pub fn from_raw(raw: Option<&str>) -> Option<AuthToken> {
        match raw.map(str::trim) {
            None | Some("") | Some("null") | Some("undefined") => None,
            Some(tok) => Some(AuthToken(String::from(tok))),
        }
    }
}
