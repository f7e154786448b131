//! Property and concurrency tests for the access registry.
//!
//! Property tests drive random add/remove sequences against a simple model
//! (an ordered tenant list per flavor) and check the registry agrees with it.

mod common;

use common::*;
use flavor_access::{AccessError, ApiVersion, ErrorKind, FlavorSpec, FlavorStore};
use futures::future::join_all;
use proptest::prelude::*;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Op {
    Add { tenant: String, version: ApiVersion },
    Remove { tenant: String },
}

fn version_strategy() -> impl Strategy<Value = ApiVersion> {
    (1u16..=7).prop_map(|minor| ApiVersion::new(2, minor))
}

fn tenant_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["alpha", "beta", "gamma", "delta"]).prop_map(str::to_string)
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (tenant_strategy(), version_strategy())
            .prop_map(|(tenant, version)| Op::Add { tenant, version }),
        tenant_strategy().prop_map(|tenant| Op::Remove { tenant }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_private_flavor_matches_model(ops in prop::collection::vec(op_strategy(), 0..24)) {
        tokio_test::block_on(async {
            let registry = new_registry();
            let id = flavor_id(FLAVOR_ID);
            registry
                .create_flavor(FlavorSpec::new(FLAVOR_NAME, 1024, 2, 10).with_id(id.clone()).with_public(false))
                .await
                .unwrap();

            let mut model: Vec<String> = Vec::new();
            for op in ops {
                match op {
                    Op::Add { tenant, version } => {
                        let result = registry.add_tenant_access(&id, &tenant, version).await;
                        if model.contains(&tenant) {
                            assert_eq!(result.unwrap_err().kind(), ErrorKind::Duplicate);
                        } else {
                            assert_eq!(result.unwrap().tenant_id, tenant);
                            model.push(tenant);
                        }
                    }
                    Op::Remove { tenant } => {
                        let result = registry.remove_tenant_access(&id, &tenant).await;
                        if let Some(pos) = model.iter().position(|t| *t == tenant) {
                            assert!(result.is_ok());
                            model.remove(pos);
                        } else {
                            assert!(matches!(result, Err(AccessError::GrantNotFound { .. })));
                        }
                    }
                }
            }

            let listed: Vec<String> = registry
                .list_access(&id)
                .await
                .unwrap()
                .into_iter()
                .map(|g| g.tenant_id)
                .collect();
            assert_eq!(listed, model);

            for tenant in ["alpha", "beta", "gamma", "delta"] {
                let allowed = registry.can_use_flavor(&id, tenant).await.unwrap();
                assert_eq!(allowed, model.iter().any(|t| t == tenant));
            }
        });
    }

    #[test]
    fn prop_public_flavor_never_lists_and_never_conflicts_on_remove(
        ops in prop::collection::vec(op_strategy(), 0..24)
    ) {
        tokio_test::block_on(async {
            let registry = new_registry();
            let id = flavor_id(FLAVOR_ID);
            registry
                .create_flavor(FlavorSpec::new(FLAVOR_NAME, 1024, 2, 10).with_id(id.clone()))
                .await
                .unwrap();

            for op in ops {
                match op {
                    Op::Add { tenant, version } => {
                        let result = registry.add_tenant_access(&id, &tenant, version).await;
                        if version >= ApiVersion::V2_7 {
                            assert_eq!(result.unwrap_err().kind(), ErrorKind::Conflict);
                        } else if let Err(e) = result {
                            assert_eq!(e.kind(), ErrorKind::Duplicate);
                        }
                    }
                    Op::Remove { tenant } => {
                        if let Err(e) = registry.remove_tenant_access(&id, &tenant).await {
                            assert_eq!(e.kind(), ErrorKind::NotFound);
                        }
                    }
                }
                assert!(registry.list_access(&id).await.unwrap().is_empty());
            }

            for tenant in ["alpha", "beta", "gamma", "delta", "nobody"] {
                assert!(registry.can_use_flavor(&id, tenant).await.unwrap());
            }
        });
    }

    #[test]
    fn prop_second_add_is_duplicate(tenant in "[a-z0-9_-]{1,32}", version in version_strategy()) {
        tokio_test::block_on(async {
            let registry = new_registry();
            let id = flavor_id(FLAVOR_ID);
            registry
                .create_flavor(FlavorSpec::new(FLAVOR_NAME, 1024, 2, 10).with_id(id.clone()).with_public(false))
                .await
                .unwrap();

            registry.add_tenant_access(&id, &tenant, version).await.unwrap();
            let err = registry.add_tenant_access(&id, &tenant, version).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Duplicate);
        });
    }

    #[test]
    fn prop_public_grant_gate_follows_threshold(version in version_strategy()) {
        tokio_test::block_on(async {
            let registry = new_registry();
            let id = flavor_id(FLAVOR_ID);
            registry
                .create_flavor(FlavorSpec::new(FLAVOR_NAME, 1024, 2, 10).with_id(id.clone()))
                .await
                .unwrap();

            let result = registry.add_tenant_access(&id, TENANT_ID, version).await;
            assert_eq!(result.is_err(), version >= ApiVersion::V2_7);
            if let Err(e) = result {
                assert_eq!(e.kind(), ErrorKind::Conflict);
            }
        });
    }
}

#[tokio::test]
async fn test_grant_lifecycle_on_private_flavor() {
    let registry = new_registry();
    let id = flavor_id(FLAVOR_ID);
    registry
        .create_flavor(
            FlavorSpec::new(FLAVOR_NAME, 1024, 2, 10)
                .with_id(id.clone())
                .with_public(false),
        )
        .await
        .unwrap();

    assert!(!registry.can_use_flavor(&id, TENANT_ID).await.unwrap());
    registry
        .add_tenant_access(&id, TENANT_ID, ApiVersion::V2_1)
        .await
        .unwrap();
    assert!(registry.can_use_flavor(&id, TENANT_ID).await.unwrap());

    let grants = registry.list_access(&id).await.unwrap();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].tenant_id, TENANT_ID);

    registry.remove_tenant_access(&id, TENANT_ID).await.unwrap();
    assert!(!registry.can_use_flavor(&id, TENANT_ID).await.unwrap());
    assert!(registry.list_access(&id).await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_create_exactly_one_grant() {
    let registry = Arc::new(new_registry());
    let id = flavor_id(FLAVOR_ID);
    registry
        .create_flavor(
            FlavorSpec::new(FLAVOR_NAME, 1024, 2, 10)
                .with_id(id.clone())
                .with_public(false),
        )
        .await
        .unwrap();

    let tasks = (0..32).map(|_| {
        let registry = Arc::clone(&registry);
        let id = id.clone();
        tokio::spawn(async move {
            registry
                .add_tenant_access(&id, TENANT_ID, ApiVersion::V2_1)
                .await
        })
    });
    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(succeeded, 1);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| e.kind() == ErrorKind::Duplicate)
    );
    assert_eq!(registry.list_access(&id).await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_add_and_remove_stay_consistent() {
    let registry = Arc::new(new_registry());
    let id = flavor_id(FLAVOR_ID);
    registry
        .create_flavor(
            FlavorSpec::new(FLAVOR_NAME, 1024, 2, 10)
                .with_id(id.clone())
                .with_public(false),
        )
        .await
        .unwrap();

    let tenants: Vec<String> = (0..16).map(|n| format!("tenant-{}", n)).collect();
    let tasks = tenants.iter().flat_map(|tenant| {
        let add = {
            let registry = Arc::clone(&registry);
            let id = id.clone();
            let tenant = tenant.clone();
            tokio::spawn(async move {
                registry
                    .add_tenant_access(&id, &tenant, ApiVersion::V2_7)
                    .await
                    .map(|_| ())
            })
        };
        let remove = {
            let registry = Arc::clone(&registry);
            let id = id.clone();
            let tenant = tenant.clone();
            tokio::spawn(async move { registry.remove_tenant_access(&id, &tenant).await })
        };
        [add, remove]
    });
    for joined in join_all(tasks).await {
        // Remove may run first and miss; nothing else may fail
        if let Err(e) = joined.unwrap() {
            assert_eq!(e.kind(), ErrorKind::NotFound);
        }
    }

    let grants = registry.list_access(&id).await.unwrap();
    let mut seen: Vec<&str> = grants.iter().map(|g| g.tenant_id.as_str()).collect();
    let total = seen.len();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), total, "duplicate grants present");
    for grant in &grants {
        assert!(registry.can_use_flavor(&id, &grant.tenant_id).await.unwrap());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_delete_racing_adds_leaves_no_orphans() {
    let registry = Arc::new(new_registry());
    let id = flavor_id(FLAVOR_ID);
    registry
        .create_flavor(
            FlavorSpec::new(FLAVOR_NAME, 1024, 2, 10)
                .with_id(id.clone())
                .with_public(false),
        )
        .await
        .unwrap();

    let mut tasks = Vec::new();
    for n in 0..16 {
        let registry = Arc::clone(&registry);
        let id = id.clone();
        tasks.push(tokio::spawn(async move {
            registry
                .add_tenant_access(&id, &format!("tenant-{}", n), ApiVersion::V2_1)
                .await
                .map(|_| ())
        }));
    }
    {
        let registry = Arc::clone(&registry);
        let id = id.clone();
        tasks.push(tokio::spawn(async move { registry.delete_flavor(&id).await }));
    }

    for joined in join_all(tasks).await {
        if let Err(e) = joined.unwrap() {
            assert_eq!(e.kind(), ErrorKind::NotFound);
        }
    }

    assert_eq!(
        registry.show_flavor(&id).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
    for n in 0..16 {
        let tenant = format!("tenant-{}", n);
        assert!(
            registry
                .storage()
                .list_granted_flavors(&tenant)
                .await
                .unwrap()
                .is_empty(),
            "orphaned grant for {}",
            tenant
        );
    }
}
