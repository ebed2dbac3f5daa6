use std::sync::Arc;

use models::User;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, instrument, warn};

use super::context::RequestContext;
use super::domain::{AuthResponse, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::password::{hash_password, verify_password, HashingParams};
use super::repository::UserRepo;
use super::token::{Claims, TokenIssuer};
use super::validation::ValidationRules;
use crate::errors::{StoreError, UniqueField};

/// Auth service configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthConfig {
    pub rules: ValidationRules,
    pub hashing: HashingParams,
}

impl From<&configs::AppConfig> for AuthConfig {
    fn from(cfg: &configs::AppConfig) -> Self {
        Self { rules: ValidationRules::from(&cfg.auth), hashing: HashingParams::from(&cfg.hashing) }
    }
}

/// Auth business service independent of transport
pub struct AuthService<R: UserRepo> {
    repo: Arc<R>,
    tokens: Arc<dyn TokenIssuer>,
    cfg: AuthConfig,
    /// Hash verified against when the email is unknown, so both paths cost the same.
    dummy_hash: OnceCell<String>,
}

impl<R: UserRepo> AuthService<R> {
    pub fn new(repo: Arc<R>, tokens: Arc<dyn TokenIssuer>, cfg: AuthConfig) -> Self {
        Self { repo, tokens, cfg, dummy_hash: OnceCell::new() }
    }

    pub fn config(&self) -> &AuthConfig { &self.cfg }

    /// Register a new user and return a token for them.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::InMemoryUserRepo};
    /// use service::auth::{context::RequestContext, domain::RegisterInput, token::JwtTokenIssuer};
    /// use std::sync::Arc;
    /// let repo = Arc::new(InMemoryUserRepo::default());
    /// let tokens = Arc::new(JwtTokenIssuer::new("secret", "twitter", chrono::Duration::hours(1)));
    /// let svc = AuthService::new(repo, tokens, AuthConfig::default());
    /// let input = RegisterInput {
    ///     email: " User@Example.com ".into(),
    ///     username: "user".into(),
    ///     password: "Secret123".into(),
    ///     confirm_password: "Secret123".into(),
    /// };
    /// let resp = tokio_test::block_on(svc.register(&RequestContext::new(), input)).unwrap();
    /// assert_eq!(resp.user.email, "user@example.com");
    /// assert!(!resp.access_token.is_empty());
    /// ```
    #[instrument(skip(self, ctx, input), fields(request_id = %ctx.request_id()))]
    pub async fn register(&self, ctx: &RequestContext, mut input: RegisterInput) -> Result<AuthResponse, AuthError> {
        input.sanitize();
        input.validate(&self.cfg.rules)?;
        ctx.ensure_active()?;

        match self.repo.get_by_username(ctx, &input.username).await {
            Ok(_) => {
                debug!(username = %input.username, "username already registered");
                return Err(AuthError::UsernameTaken);
            }
            Err(StoreError::NotFound) => {}
            Err(e) => return Err(self.storage_failure("error checking username", e)),
        }

        match self.repo.get_by_email(ctx, &input.email).await {
            Ok(_) => {
                debug!(email = %input.email, "email already registered");
                return Err(AuthError::EmailTaken);
            }
            Err(StoreError::NotFound) => {}
            Err(e) => return Err(self.storage_failure("error checking email", e)),
        }

        let password_hash = hash_password(&input.password, &self.cfg.hashing).map_err(|e| {
            error!(error = %e, "password hashing failed");
            e
        })?;
        let user = User::new(input.email, input.username, password_hash);
        // Issued before the write so a failing issuer leaves nothing behind.
        let mut access_token = self.tokens.issue(&user)?;
        let pending_id = user.id;

        ctx.ensure_active()?;
        let user = match self.repo.create(ctx, user).await {
            Ok(user) => user,
            Err(StoreError::Duplicate(UniqueField::Username)) => return Err(AuthError::UsernameTaken),
            Err(StoreError::Duplicate(UniqueField::Email)) => return Err(AuthError::EmailTaken),
            Err(e) => return Err(self.storage_failure("error creating user", e)),
        };
        if user.id != pending_id {
            debug!(pending_id = %pending_id, user_id = %user.id, "store assigned a different id; reissuing token");
            access_token = self.tokens.issue(&user)?;
        }

        info!(user_id = %user.id, username = %user.username, email = %user.email, "user_registered");
        Ok(AuthResponse { access_token, user })
    }

    /// Authenticate a user by email and password and issue a token.
    ///
    /// Unknown email and wrong password both yield `AuthError::InvalidCredentials`.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::InMemoryUserRepo};
    /// use service::auth::{context::RequestContext, domain::{LoginInput, RegisterInput}, token::JwtTokenIssuer};
    /// use std::sync::Arc;
    /// let repo = Arc::new(InMemoryUserRepo::default());
    /// let tokens = Arc::new(JwtTokenIssuer::new("secret", "twitter", chrono::Duration::hours(1)));
    /// let svc = AuthService::new(repo, tokens, AuthConfig::default());
    /// let ctx = RequestContext::new();
    /// let _ = tokio_test::block_on(svc.register(&ctx, RegisterInput {
    ///     email: "u@e.com".into(), username: "u1".into(), password: "Passw0rd".into(), confirm_password: "Passw0rd".into(),
    /// }));
    /// let resp = tokio_test::block_on(svc.login(&ctx, LoginInput { email: "U@E.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(resp.user.username, "u1");
    /// assert!(!resp.access_token.is_empty());
    /// ```
    #[instrument(skip(self, ctx, input), fields(request_id = %ctx.request_id()))]
    pub async fn login(&self, ctx: &RequestContext, mut input: LoginInput) -> Result<AuthResponse, AuthError> {
        input.sanitize();
        input.validate()?;
        ctx.ensure_active()?;

        let user = match self.repo.get_by_email(ctx, &input.email).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => {
                // Burn the same verification cost as a real account before refusing.
                let dummy = self.dummy_hash().await?;
                let _ = verify_password(&input.password, dummy)?;
                warn!("login rejected: invalid credentials");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(self.storage_failure("error looking up user", e)),
        };

        let matches = verify_password(&input.password, &user.password_hash).map_err(|e| {
            error!(user_id = %user.id, error = %e, "stored password hash unreadable");
            e
        })?;
        if !matches {
            warn!(user_id = %user.id, "login rejected: invalid credentials");
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.tokens.issue(&user)?;
        info!(user_id = %user.id, username = %user.username, "user_logged_in");
        Ok(AuthResponse { access_token, user })
    }

    /// Check a token previously issued by this service.
    #[instrument(skip(self, token))]
    pub fn authenticate(&self, token: &str) -> Result<Claims, AuthError> {
        self.tokens.verify(token).map_err(|e| {
            debug!(error = %e, "token rejected");
            e
        })
    }

    async fn dummy_hash(&self) -> Result<&str, AuthError> {
        let hashing = self.cfg.hashing;
        self.dummy_hash
            .get_or_try_init(move || async move { hash_password("dummy-password-for-timing", &hashing) })
            .await
            .map(String::as_str)
    }

    fn storage_failure(&self, context: &'static str, source: StoreError) -> AuthError {
        error!(error = %source, context, "user store failure");
        AuthError::storage(context, source)
    }
}
