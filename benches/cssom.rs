//! StyleKit declaration benchmarks
//!
//! Run with: cargo bench -p stylekit-cssom

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use stylekit_cssom::{CssStyleDeclaration, PropertyStore};
use stylekit_dom::Document;

fn store_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("property_store");

    // Small declaration block
    let small = "color: red; margin: 0 auto; display: block !important;";
    group.throughput(Throughput::Bytes(small.len() as u64));
    group.bench_with_input(BenchmarkId::new("parse", "small"), small, |b, text| {
        b.iter(|| PropertyStore::parse(text))
    });

    // Large declaration block (200 declarations)
    let large = generate_declarations(200);
    group.throughput(Throughput::Bytes(large.len() as u64));
    group.bench_with_input(BenchmarkId::new("parse", "large"), &large, |b, text| {
        b.iter(|| PropertyStore::parse(text))
    });

    let store = PropertyStore::parse(&large);
    group.bench_function("serialize_large", |b| b.iter(|| store.to_css_text()));

    group.finish();
}

fn declaration_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("declaration");

    group.bench_function("standalone_set_property", |b| {
        let mut style = CssStyleDeclaration::new();
        b.iter(|| style.set_property(black_box("border"), "1px solid red", None))
    });

    // Bound declarations re-parse the attribute on every access.
    group.bench_function("bound_set_property", |b| {
        let doc = Document::new();
        let div = doc.create_element("div");
        doc.root().append_child(div.clone());
        div.set_attribute("style", &generate_declarations(20));
        let mut style = CssStyleDeclaration::for_element(&div);
        b.iter(|| style.set_property(black_box("color"), "red", None))
    });

    group.finish();
}

fn generate_declarations(n: usize) -> String {
    let mut text = String::new();
    for i in 0..n {
        text.push_str(&format!("--custom-{}: {}px; ", i, i));
    }
    text
}

criterion_group!(benches, store_benchmarks, declaration_benchmarks);
criterion_main!(benches);
