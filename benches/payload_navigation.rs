//! Payload navigation and bounded rendering benchmarks.
//!
//! Measures path lookups, copy-on-write replacement, field enumeration and
//! depth-bounded rendering over growing documents.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};

use probe_core::payload::navigator::{get, replace};
use probe_core::payload::{is_cyclic, list_field_paths, FieldPath};
use probe_core::report::to_bounded_string;

/// Object with `width` items, each nested `depth` levels deep.
fn document(width: usize, depth: usize) -> Value {
    let mut leaf = json!({"sku": "A-1", "qty": 2, "tags": ["x", "y"]});
    for level in 0..depth {
        leaf = json!({ format!("level{}", level): leaf });
    }
    json!({ "order": { "items": vec![leaf; width] } })
}

fn deep_path(width: usize, depth: usize) -> FieldPath {
    let mut path = FieldPath::parse("order#items").child_index(width - 1);
    for level in (0..depth).rev() {
        path = path.child_key(format!("level{}", level));
    }
    path.child_key("sku")
}

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("navigator_get");
    for depth in [1usize, 8, 32] {
        let doc = document(16, depth);
        let path = deep_path(16, depth);
        group.bench_function(BenchmarkId::new("depth", depth), |b| {
            b.iter(|| black_box(get(black_box(&doc), black_box(&path))))
        });
    }
    group.finish();
}

fn bench_replace(c: &mut Criterion) {
    let mut group = c.benchmark_group("navigator_replace");
    for width in [4usize, 64, 256] {
        let doc = document(width, 4);
        let path = deep_path(width, 4);
        group.throughput(Throughput::Elements(width as u64));
        group.bench_function(BenchmarkId::new("width", width), |b| {
            b.iter(|| black_box(replace(&doc, &path, json!(null)).found()))
        });
    }
    group.finish();
}

fn bench_list_fields(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_field_paths");
    for width in [4usize, 64, 256] {
        let doc = document(width, 4);
        group.throughput(Throughput::Elements(width as u64));
        group.bench_function(BenchmarkId::new("width", width), |b| {
            b.iter(|| black_box(list_field_paths(&doc).count()))
        });
    }
    group.finish();
}

fn bench_cyclic(c: &mut Criterion) {
    let chain: Vec<String> = (0..64).map(|i| format!("segment{}", i % 7)).collect();
    c.bench_function("is_cyclic_64", |b| {
        b.iter(|| black_box(is_cyclic(black_box(&chain), 2)))
    });
}

fn bench_bounded(c: &mut Criterion) {
    let mut group = c.benchmark_group("bounded_render");
    let doc = document(64, 16);
    for max_depth in [4usize, 18, 64] {
        group.bench_function(BenchmarkId::new("max_depth", max_depth), |b| {
            b.iter(|| black_box(to_bounded_string(&doc, max_depth).len()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_get, bench_replace, bench_list_fields, bench_cyclic, bench_bounded);
criterion_main!(benches);
