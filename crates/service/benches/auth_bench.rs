use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use service::auth::context::RequestContext;
use service::auth::domain::{LoginInput, RegisterInput};
use service::auth::repository::mock::InMemoryUserRepo;
use service::auth::service::{AuthConfig, AuthService};
use service::auth::token::JwtTokenIssuer;

fn bench_login(c: &mut Criterion) {
    let repo = Arc::new(InMemoryUserRepo::default());
    let tokens = Arc::new(JwtTokenIssuer::new("secret", "twitter", chrono::Duration::hours(1)));
    let svc = AuthService::new(repo, tokens, AuthConfig::default());
    let ctx = RequestContext::new();

    // pre-create user outside of the benchmark using a tokio runtime
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(svc.register(&ctx, RegisterInput {
        email: "bench@example.com".into(),
        username: "bench".into(),
        password: "Benchmark1".into(),
        confirm_password: "Benchmark1".into(),
    }))
    .unwrap();

    c.bench_function("auth_login_verify", |b| {
        b.to_async(&rt).iter(|| async {
            svc.login(&ctx, LoginInput { email: "bench@example.com".into(), password: "Benchmark1".into() }).await.unwrap();
        });
    });

    c.bench_function("auth_login_unknown_email", |b| {
        b.to_async(&rt).iter(|| async {
            let _ = svc.login(&ctx, LoginInput { email: "ghost@example.com".into(), password: "Benchmark1".into() }).await;
        });
    });
}

criterion_group!(benches, bench_login);
criterion_main!(benches);
