//! Test helpers for HTTP handlers backed by mocked driving ports.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::domain::ports::{
    MockCatalogLabels, MockLoginService, MockRecipeCatalog, MockTokenAuthenticator,
    MockUserAccounts,
};
use crate::domain::{Email, Error, PasswordHash, User, UserFlags, UserId, UserName};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::HttpState;

/// Token accepted by [`PortMocks::authenticated`].
pub const TEST_TOKEN: &str = "test-token";

/// One mock per driving port; unused mocks reject any call.
#[derive(Default)]
pub struct PortMocks {
    pub accounts: MockUserAccounts,
    pub login: MockLoginService,
    pub tokens: MockTokenAuthenticator,
    pub labels: MockCatalogLabels,
    pub recipes: MockRecipeCatalog,
}

impl PortMocks {
    /// Mocks whose authenticator maps [`TEST_TOKEN`] to `user`.
    pub fn authenticated(user: UserId) -> Self {
        let mut mocks = Self::default();
        mocks.tokens.expect_authenticate().returning(move |token| {
            if token.expose() == TEST_TOKEN {
                Ok(user)
            } else {
                Err(Error::unauthorized("Invalid token."))
            }
        });
        mocks
    }

    pub fn into_state(self) -> HttpState {
        HttpState {
            accounts: Arc::new(self.accounts),
            login: Arc::new(self.login),
            tokens: Arc::new(self.tokens),
            labels: Arc::new(self.labels),
            recipes: Arc::new(self.recipes),
        }
    }
}

/// `Authorization` header carrying [`TEST_TOKEN`].
pub fn auth_header() -> (&'static str, String) {
    ("Authorization", format!("Token {TEST_TOKEN}"))
}

pub fn sample_user(email: &str, name: &str) -> User {
    User::new(
        UserId::random(),
        Email::normalize(email).expect("email"),
        UserName::new(name).expect("name"),
        PasswordHash::new("hashed"),
        UserFlags::default(),
    )
}

/// Application with the full `/api/v1` surface over the given mocks.
pub fn test_app(
    mocks: PortMocks,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(mocks.into_state()))
        .service(web::scope("/api/v1").configure(configure_api))
}
