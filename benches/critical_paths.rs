//! Criterion benchmarks for moekit critical paths
//!
//! Benchmarks the text operations run on every source file:
//! - Substitution: marker scanning and replacement
//! - Splitting: header/body separation
//! - Minification: CSS and JavaScript

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use moekit::build::{
    minify_css, minify_js, split, substitute, substitute_script, BuildContext,
};

// =============================================================================
// Test Data Generators
// =============================================================================

/// Generate a stylesheet with n rules, every tenth line carrying a marker
fn make_stylesheet(rules: usize) -> String {
    (0..rules)
        .map(|i| {
            if i % 10 == 0 {
                format!("/* {{{{MOE_VERSION}}}} {{{{TIMESTAMP}}}} */\n.rule-{} {{ color: #ff66{:02x}; }}\n", i, i % 256)
            } else {
                format!(".rule-{} {{ color: #ff66{:02x}; margin: 0px 0px; }}\n", i, i % 256)
            }
        })
        .collect()
}

/// Generate a script with n functions referencing the version sentinel
fn make_script(functions: usize) -> String {
    (0..functions)
        .map(|i| {
            format!(
                "function handler{}(event) {{\n  console.log('moe ' + MOE_VERSION, '{{{{OP_VERSION}}}}', event);\n  return {} * 2;\n}}\n",
                i, i
            )
        })
        .collect()
}

fn context() -> BuildContext {
    BuildContext::new("1.2.3", "1.2.3", "4.0.0", "202501011200")
}

// =============================================================================
// Substitution Benchmarks
// =============================================================================

fn bench_substitute(c: &mut Criterion) {
    let mut group = c.benchmark_group("substitute");
    let ctx = context();

    for size in [10, 100, 1000].iter() {
        let css = make_stylesheet(*size);
        group.throughput(Throughput::Bytes(css.len() as u64));
        group.bench_with_input(BenchmarkId::new("style", size), &css, |b, css| {
            b.iter(|| substitute(black_box(css), &ctx))
        });

        let js = make_script(*size);
        group.throughput(Throughput::Bytes(js.len() as u64));
        group.bench_with_input(BenchmarkId::new("script", size), &js, |b, js| {
            b.iter(|| substitute_script(black_box(js), &ctx))
        });
    }

    group.bench_function("no_markers", |b| {
        let plain = ".a { color: red; }\n".repeat(500);
        b.iter(|| substitute(black_box(&plain), &ctx))
    });

    group.finish();
}

// =============================================================================
// Splitter Benchmarks
// =============================================================================

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("split");
    let source = make_stylesheet(1000);

    for lines in [1, 15, 500].iter() {
        group.bench_with_input(BenchmarkId::new("header_lines", lines), lines, |b, lines| {
            b.iter(|| split(black_box(&source), *lines))
        });
    }

    group.finish();
}

// =============================================================================
// Minifier Benchmarks
// =============================================================================

fn bench_minify(c: &mut Criterion) {
    let mut group = c.benchmark_group("minify");
    group.sample_size(20);

    let css = make_stylesheet(200);
    group.throughput(Throughput::Bytes(css.len() as u64));
    group.bench_function("css_200_rules", |b| b.iter(|| minify_css(black_box(&css))));

    let js = substitute_script(&make_script(200), &context());
    group.throughput(Throughput::Bytes(js.len() as u64));
    group.bench_function("js_200_functions", |b| b.iter(|| minify_js(black_box(&js))));

    group.finish();
}

criterion_group!(benches, bench_substitute, bench_split, bench_minify);
criterion_main!(benches);
