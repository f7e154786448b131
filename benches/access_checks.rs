//! Access Check Benchmarks
//!
//! Measures eligibility checks and grant mutation through the registry
//! against the in-memory store.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use flavor_access::registry::FlavorAccessRegistry;
use flavor_access::storage::InMemoryStorage;
use flavor_access::{ApiVersion, FlavorId, FlavorSpec};
use tokio::runtime::Runtime;

fn runtime() -> Runtime {
    Runtime::new().expect("Failed to create tokio runtime")
}

/// Registry with one public and one private flavor, the private one shared
/// with `tenants` tenants.
fn populated_registry(rt: &Runtime, tenants: usize) -> FlavorAccessRegistry<InMemoryStorage> {
    let registry =
        FlavorAccessRegistry::new(InMemoryStorage::new()).expect("Failed to create registry");
    rt.block_on(async {
        registry
            .create_flavor(FlavorSpec::new("public", 512, 1, 1).with_id(flavor("1")))
            .await
            .unwrap();
        registry
            .create_flavor(
                FlavorSpec::new("private", 1024, 2, 10)
                    .with_id(flavor("10"))
                    .with_public(false),
            )
            .await
            .unwrap();
        for n in 0..tenants {
            registry
                .add_tenant_access(&flavor("10"), &format!("tenant-{}", n), ApiVersion::V2_7)
                .await
                .unwrap();
        }
    });
    registry
}

fn flavor(id: &str) -> FlavorId {
    FlavorId::new(id).unwrap()
}

/// Benchmark can_use_flavor for public, granted and denied lookups
fn bench_can_use_flavor(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("can_use_flavor");

    for tenants in [1, 100, 1000].iter() {
        let registry = populated_registry(&rt, *tenants);
        let public = flavor("1");
        let private = flavor("10");
        let last_tenant = format!("tenant-{}", tenants - 1);

        group.bench_with_input(BenchmarkId::new("public", tenants), tenants, |b, _| {
            b.iter(|| {
                rt.block_on(registry.can_use_flavor(black_box(&public), black_box("anyone")))
                    .unwrap()
            });
        });

        group.bench_with_input(BenchmarkId::new("granted", tenants), tenants, |b, _| {
            b.iter(|| {
                rt.block_on(registry.can_use_flavor(black_box(&private), black_box(&last_tenant)))
                    .unwrap()
            });
        });

        group.bench_with_input(BenchmarkId::new("denied", tenants), tenants, |b, _| {
            b.iter(|| {
                rt.block_on(registry.can_use_flavor(black_box(&private), black_box("outsider")))
                    .unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark add/remove cycles, including per-flavor lock acquisition
fn bench_grant_mutation(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("grant_mutation");

    for batch in [1, 10, 100].iter() {
        group.throughput(Throughput::Elements(*batch as u64));
        let registry = populated_registry(&rt, 0);
        let private = flavor("10");
        let tenants: Vec<String> = (0..*batch).map(|n| format!("bench-{}", n)).collect();

        group.bench_with_input(BenchmarkId::new("add_remove", batch), batch, |b, _| {
            b.iter(|| {
                rt.block_on(async {
                    for tenant in &tenants {
                        registry
                            .add_tenant_access(&private, black_box(tenant), ApiVersion::V2_7)
                            .await
                            .unwrap();
                    }
                    for tenant in &tenants {
                        registry
                            .remove_tenant_access(&private, black_box(tenant))
                            .await
                            .unwrap();
                    }
                })
            });
        });
    }

    // Rejected adds never reach storage writes
    let registry = populated_registry(&rt, 0);
    let public = flavor("1");
    group.bench_function("public_conflict", |b| {
        b.iter(|| {
            let result = rt.block_on(registry.add_tenant_access(
                black_box(&public),
                "fake_tenant",
                ApiVersion::V2_7,
            ));
            let _ = black_box(result);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_can_use_flavor, bench_grant_mutation);
criterion_main!(benches);
