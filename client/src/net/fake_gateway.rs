//! Scripted in-memory [`AuthGateway`] for unit tests.
//!
//! Each endpoint answers from its own queue; an empty queue answers
//! [`GatewayError::Unavailable`]. Every call is recorded as a short string.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::api::{AuthGateway, GatewayError};
use super::types::{AuthResponse, CodeExchangeResponse, LoginRequest, Provider, RegisterRequest, User};

type Reply<T> = VecDeque<Result<T, GatewayError>>;

#[derive(Default)]
struct Script {
    login: Reply<AuthResponse>,
    register: Reply<User>,
    logout: Reply<()>,
    refresh: Reply<String>,
    me: Reply<User>,
    exchange: Reply<CodeExchangeResponse>,
    authorize: Reply<String>,
    password: Reply<()>,
    verify: Reply<()>,
    calls: Vec<String>,
}

#[derive(Clone, Default)]
pub(crate) struct FakeGateway {
    script: Rc<RefCell<Script>>,
}

fn next<T>(queue: &mut Reply<T>) -> Result<T, GatewayError> {
    queue.pop_front().unwrap_or(Err(GatewayError::Unavailable))
}

impl FakeGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on_login(&self, reply: Result<AuthResponse, GatewayError>) -> &Self {
        self.script.borrow_mut().login.push_back(reply);
        self
    }

    pub(crate) fn on_register(&self, reply: Result<User, GatewayError>) -> &Self {
        self.script.borrow_mut().register.push_back(reply);
        self
    }

    pub(crate) fn on_logout(&self, reply: Result<(), GatewayError>) -> &Self {
        self.script.borrow_mut().logout.push_back(reply);
        self
    }

    pub(crate) fn on_refresh(&self, reply: Result<String, GatewayError>) -> &Self {
        self.script.borrow_mut().refresh.push_back(reply);
        self
    }

    pub(crate) fn on_me(&self, reply: Result<User, GatewayError>) -> &Self {
        self.script.borrow_mut().me.push_back(reply);
        self
    }

    pub(crate) fn on_exchange(&self, reply: Result<CodeExchangeResponse, GatewayError>) -> &Self {
        self.script.borrow_mut().exchange.push_back(reply);
        self
    }

    pub(crate) fn on_authorize(&self, reply: Result<String, GatewayError>) -> &Self {
        self.script.borrow_mut().authorize.push_back(reply);
        self
    }

    pub(crate) fn on_password(&self, reply: Result<(), GatewayError>) -> &Self {
        self.script.borrow_mut().password.push_back(reply);
        self
    }

    pub(crate) fn on_verify(&self, reply: Result<(), GatewayError>) -> &Self {
        self.script.borrow_mut().verify.push_back(reply);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.script.borrow().calls.clone()
    }

    fn record(&self, call: String) {
        self.script.borrow_mut().calls.push(call);
    }
}

impl AuthGateway for FakeGateway {
    async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, GatewayError> {
        self.record(format!("login:{}", credentials.email));
        next(&mut self.script.borrow_mut().login)
    }

    async fn register(&self, data: &RegisterRequest) -> Result<User, GatewayError> {
        self.record(format!("register:{}", data.email));
        next(&mut self.script.borrow_mut().register)
    }

    async fn logout(&self, access_token: &str) -> Result<(), GatewayError> {
        self.record(format!("logout:{access_token}"));
        next(&mut self.script.borrow_mut().logout)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<String, GatewayError> {
        self.record(format!("refresh:{refresh_token}"));
        next(&mut self.script.borrow_mut().refresh)
    }

    async fn current_user(&self, access_token: &str) -> Result<User, GatewayError> {
        self.record(format!("me:{access_token}"));
        next(&mut self.script.borrow_mut().me)
    }

    async fn exchange_code(&self, provider: Provider, code: &str) -> Result<CodeExchangeResponse, GatewayError> {
        self.record(format!("exchange:{provider}:{code}"));
        next(&mut self.script.borrow_mut().exchange)
    }

    async fn authorize_url(&self, provider: Provider) -> Result<String, GatewayError> {
        self.record(format!("authorize:{provider}"));
        next(&mut self.script.borrow_mut().authorize)
    }

    async fn change_password(
        &self,
        access_token: &str,
        _current_password: &str,
        _new_password: &str,
    ) -> Result<(), GatewayError> {
        self.record(format!("change_password:{access_token}"));
        next(&mut self.script.borrow_mut().password)
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), GatewayError> {
        self.record(format!("reset_request:{email}"));
        next(&mut self.script.borrow_mut().password)
    }

    async fn reset_password(&self, reset_token: &str, _new_password: &str) -> Result<(), GatewayError> {
        self.record(format!("reset_confirm:{reset_token}"));
        next(&mut self.script.borrow_mut().password)
    }

    async fn verify_email(&self, token: &str) -> Result<(), GatewayError> {
        self.record(format!("verify_email:{token}"));
        next(&mut self.script.borrow_mut().verify)
    }
}

/// Backend user with the given id.
pub(crate) fn user(id: i64) -> User {
    User {
        id,
        firstname: "Awa".to_owned(),
        lastname: "Diallo".to_owned(),
        email: format!("user{id}@example.org"),
        phone: None,
        is_active: true,
        created_at: String::new(),
        updated_at: String::new(),
        last_login: None,
    }
}
