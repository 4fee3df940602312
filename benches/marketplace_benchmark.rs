//! Performance benchmarks for ecofinds-store
//!
//! This benchmark suite measures:
//! - InMemory backend operations (put, get, delete)
//! - JSON collection codec across catalog sizes
//! - Marketplace read-modify-write operations (listing, cart)
//!
//! Run with: cargo bench
//! View results: open target/criterion/report/index.html

use ecofinds_store::backend::{InMemoryBackend, StorageBackend};
use ecofinds_store::catalog::sample_catalog;
use ecofinds_store::model::{Category, Product, ProductFilter, UserId};
use ecofinds_store::serialization::{decode_collection, encode_collection};
use ecofinds_store::Marketplace;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

/// Sample catalog repeated `copies` times (fresh ids each time).
fn catalog_of(copies: usize) -> Vec<Product> {
    (0..copies).flat_map(|_| sample_catalog()).collect()
}

// ============================================================================
// Group 1: InMemory Backend Benchmarks
// ============================================================================

fn inmemory_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("inmemory_backend");
    let rt = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");

    for size in [100, 10_000, 1_000_000].iter() {
        group
            .throughput(Throughput::Bytes(*size as u64))
            .bench_with_input(BenchmarkId::new("put", size), size, |b, &size| {
                let backend = InMemoryBackend::new();
                let value = vec![1u8; size];

                b.to_async(&rt).iter(|| async {
                    backend
                        .put(black_box("products"), black_box(value.clone()))
                        .await
                        .expect("Failed to put")
                });
            });

        group
            .throughput(Throughput::Bytes(*size as u64))
            .bench_with_input(BenchmarkId::new("get", size), size, |b, &size| {
                let backend = InMemoryBackend::new();
                rt.block_on(async {
                    backend
                        .put("products", vec![1u8; size])
                        .await
                        .expect("Failed to put");
                });

                b.to_async(&rt)
                    .iter(|| async { backend.get(black_box("products")).await });
            });
    }

    group.bench_function("get_absent", |b| {
        let backend = InMemoryBackend::new();
        b.to_async(&rt)
            .iter(|| async { backend.get(black_box("purchases")).await });
    });

    group.bench_function("delete", |b| {
        let backend = InMemoryBackend::new();
        b.to_async(&rt).iter(|| async {
            backend
                .put("currentUser", b"{}".to_vec())
                .await
                .expect("Failed to put");
            backend.delete(black_box("currentUser")).await
        });
    });

    group.finish();
}

// ============================================================================
// Group 2: Collection Codec Benchmarks
// ============================================================================

fn codec_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("collection_codec");

    for copies in [1, 10, 100].iter() {
        let products = catalog_of(*copies);
        let encoded = encode_collection(&products).expect("Failed to encode");

        group
            .throughput(Throughput::Elements(products.len() as u64))
            .bench_with_input(
                BenchmarkId::new("encode", products.len()),
                &products,
                |b, products| {
                    b.iter(|| encode_collection(black_box(products)));
                },
            );

        group
            .throughput(Throughput::Elements(products.len() as u64))
            .bench_with_input(
                BenchmarkId::new("decode", products.len()),
                &encoded,
                |b, encoded| {
                    b.iter(|| decode_collection::<Product>(black_box(encoded)));
                },
            );
    }

    group.finish();
}

// ============================================================================
// Group 3: Marketplace Benchmarks
// ============================================================================

fn marketplace_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("marketplace");
    let rt = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");

    for copies in [1, 10].iter() {
        let market = Marketplace::new(InMemoryBackend::new());
        let products = catalog_of(*copies);
        rt.block_on(async {
            market
                .store()
                .write_collection(ecofinds_store::CollectionKey::Products, &products)
                .await
                .expect("Failed to write catalog");
        });

        let filter = ProductFilter::default()
            .category(Category::Books)
            .search("guide");
        group.bench_with_input(
            BenchmarkId::new("list_products_filtered", products.len()),
            &filter,
            |b, filter| {
                b.to_async(&rt)
                    .iter(|| async { market.list_products(black_box(filter)).await });
            },
        );
    }

    group.bench_function("add_to_cart", |b| {
        let market = Marketplace::new(InMemoryBackend::new());
        let buyer = UserId::generate();
        let product = sample_catalog().remove(0);

        b.to_async(&rt).iter(|| async {
            market
                .add_to_cart(buyer, black_box(&product))
                .await
                .expect("Failed to add")
        });
    });

    group.finish();
}

// ============================================================================
// Benchmark Registration
// ============================================================================

criterion_group!(
    benches,
    inmemory_benchmarks,
    codec_benchmarks,
    marketplace_benchmarks
);
criterion_main!(benches);
