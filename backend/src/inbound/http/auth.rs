//! Token authentication extractor.
//!
//! Clients send `Authorization: Token <key>`. The extractor resolves the key
//! through [`TokenAuthenticator`](crate::domain::ports::TokenAuthenticator)
//! and hands handlers the owning [`UserId`].

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{AuthToken, Error, UserId};

use super::state::HttpState;

/// Scheme keyword expected in the `Authorization` header.
pub const TOKEN_SCHEME: &str = "Token";

/// The user behind a valid API token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

impl AuthenticatedUser {
    pub fn id(&self) -> &UserId {
        &self.0
    }
}

/// Extract the raw key from an `Authorization` header value.
fn parse_authorization(value: &str) -> Result<AuthToken, Error> {
    let mut parts = value.split_whitespace();
    let scheme = parts.next();
    let key = parts.next();
    match (scheme, key, parts.next()) {
        (Some(scheme), Some(key), None) if scheme.eq_ignore_ascii_case(TOKEN_SCHEME) => {
            Ok(AuthToken::from_presented(key))
        }
        (Some(scheme), None, None) if scheme.eq_ignore_ascii_case(TOKEN_SCHEME) => Err(
            Error::unauthorized("Invalid token header. No credentials provided."),
        ),
        _ => Err(Error::unauthorized(
            "Authentication credentials were not provided.",
        )),
    }
}

fn presented_token(req: &HttpRequest) -> Result<AuthToken, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("Authentication credentials were not provided."))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("Invalid token header."))?;
    parse_authorization(value)
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = presented_token(req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let token = token?;
            let state =
                state.ok_or_else(|| Error::internal("HTTP state is not registered"))?;
            let user = state.tokens.authenticate(&token).await?;
            Ok(Self(user))
        })
    }
}
