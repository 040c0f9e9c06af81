//! Benchmarks for the per-request hot path: permission evaluation and token
//! decoding.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use taskforge_auth::{
    PermissionMap, Principal, Requirement, TokenIssuer, TokenVerifier, authorize,
};
use taskforge_core::UserId;

fn wide_principal() -> Principal {
    let mut permissions = PermissionMap::new();
    for i in 0..32 {
        let resource = format!("resource-{i}");
        for action in ["create", "read", "update", "delete"] {
            permissions.grant(resource.clone(), action);
        }
    }

    Principal {
        id: UserId::new(),
        email: "bench@x.com".to_string(),
        role: Some("admin".to_string()),
        permissions,
    }
}

fn bench_authorize(c: &mut Criterion) {
    let principal = wide_principal();
    let hit = Requirement::single("resource-31", "delete");
    let miss = Requirement::single("resource-99", "read");

    c.bench_function("authorize/hit", |b| {
        b.iter(|| authorize(black_box(&principal), black_box(&hit)))
    });
    c.bench_function("authorize/miss", |b| {
        b.iter(|| authorize(black_box(&principal), black_box(&miss)))
    });
}

fn bench_token_decode(c: &mut Criterion) {
    let issuer = TokenIssuer::new("bench-secret", 3600);
    let verifier = TokenVerifier::new("bench-secret");
    let token = issuer.issue(&wide_principal()).unwrap();

    c.bench_function("token/decode", |b| {
        b.iter(|| verifier.decode(black_box(&token)).unwrap())
    });
}

criterion_group!(benches, bench_authorize, bench_token_decode);
criterion_main!(benches);
