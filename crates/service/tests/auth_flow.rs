use std::sync::Arc;

use service::auth::password::{verify_password, HashingParams};
use service::auth::repo::json_file::JsonFileUserRepo;
use service::auth::token::JwtTokenIssuer;
use service::auth::validation::ValidationRules;
use service::auth::{AuthConfig, AuthErrorKind, AuthService, LoginInput, RegisterInput, RequestContext};
use service::auth::repository::UserRepo;
use uuid::Uuid;

fn config() -> AuthConfig {
    AuthConfig {
        rules: ValidationRules::default(),
        hashing: HashingParams { memory_kib: 8, iterations: 1, parallelism: 1 },
    }
}

async fn build_service(path: &std::path::Path) -> anyhow::Result<(AuthService<JsonFileUserRepo>, Arc<JsonFileUserRepo>)> {
    let repo = Arc::new(JsonFileUserRepo::open(path).await?);
    let tokens = Arc::new(JwtTokenIssuer::new("test-secret", "twitter", chrono::Duration::hours(1)));
    Ok((AuthService::new(repo.clone(), tokens, config()), repo))
}

fn tmp_path() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("auth_flow_{}", Uuid::new_v4())).join("users.json")
}

fn register(username: &str, email: &str, password: &str) -> RegisterInput {
    RegisterInput {
        email: email.into(),
        username: username.into(),
        password: password.into(),
        confirm_password: password.into(),
    }
}

#[tokio::test]
async fn test_register_and_login_flow() -> anyhow::Result<()> {
    let path = tmp_path();
    let (svc, repo) = build_service(&path).await?;
    let ctx = RequestContext::new();

    let registered = svc.register(&ctx, register("Tester", " Tester@Example.com", "S3curePass!")).await?;
    assert!(!registered.access_token.is_empty());
    assert_eq!(registered.user.email, "tester@example.com");

    let stored = repo.get_by_email(&ctx, "tester@example.com").await?;
    assert_ne!(stored.password_hash, "S3curePass!");
    assert!(verify_password("S3curePass!", &stored.password_hash)?);

    let session = svc.login(&ctx, LoginInput { email: "tester@example.com".into(), password: "S3curePass!".into() }).await?;
    assert_eq!(session.user.id, registered.user.id);
    let claims = svc.authenticate(&session.access_token)?;
    assert_eq!(claims.username, "Tester");

    let _ = tokio::fs::remove_dir_all(path.parent().unwrap_or(&path)).await;
    Ok(())
}

#[tokio::test]
async fn test_login_after_restart() -> anyhow::Result<()> {
    let path = tmp_path();
    {
        let (svc, _repo) = build_service(&path).await?;
        svc.register(&RequestContext::new(), register("persisted", "p@example.com", "StrongPass123")).await?;
    }

    let (svc, repo) = build_service(&path).await?;
    assert_eq!(repo.count().await, 1);
    let ctx = RequestContext::new();

    let ok = svc.login(&ctx, LoginInput { email: "p@example.com".into(), password: "StrongPass123".into() }).await?;
    assert!(!ok.access_token.is_empty());

    let err = svc.register(&ctx, register("persisted", "q@example.com", "StrongPass123")).await.unwrap_err();
    assert!(err.is(AuthErrorKind::UsernameTaken));

    let _ = tokio::fs::remove_dir_all(path.parent().unwrap_or(&path)).await;
    Ok(())
}

#[tokio::test]
async fn test_login_wrong_password() -> anyhow::Result<()> {
    let path = tmp_path();
    let (svc, _repo) = build_service(&path).await?;
    let ctx = RequestContext::new();
    svc.register(&ctx, register("tester", "t@example.com", "StrongPass123")).await?;

    let err = svc.login(&ctx, LoginInput { email: "t@example.com".into(), password: "wrong".into() }).await.unwrap_err();
    assert!(err.is(AuthErrorKind::InvalidCredentials));

    let _ = tokio::fs::remove_dir_all(path.parent().unwrap_or(&path)).await;
    Ok(())
}

#[tokio::test]
async fn test_register_short_password_rejected() -> anyhow::Result<()> {
    let path = tmp_path();
    let (svc, repo) = build_service(&path).await?;

    let err = svc.register(&RequestContext::new(), register("tester", "a@b.com", "short")).await.unwrap_err();
    assert!(err.is(AuthErrorKind::Validation));
    assert!(err.is_user_facing());
    assert_eq!(repo.count().await, 0);

    let _ = tokio::fs::remove_dir_all(path.parent().unwrap_or(&path)).await;
    Ok(())
}
