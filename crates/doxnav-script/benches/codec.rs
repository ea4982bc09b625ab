//! Benchmarks for reading and writing navigation tree scripts.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use doxnav_script::{load, parse, write_navtree};
use doxnav_tree::{NavIndex, NavTree, NavTreeData, Node, SyncMessages};

const EAR_5_0: &str = include_str!("../tests/fixtures/ear-5.0/navtreedata.js");

/// Generate a tree with `sections` pages of `anchors` entries each.
fn generate_tree(sections: usize, anchors: usize) -> NavTreeData {
    let pages = (0..sections)
        .map(|i| {
            let page = format!("d{:x}/d{:02x}/md_Section_{i}.html", i % 16, i % 256);
            let children = (0..anchors)
                .map(|j| Node::leaf(format!("Heading {j}"), Some(format!("{page}#autotoc_md{j}").as_str())))
                .collect();
            Node::with_children(format!("Section {i}"), Some(page.as_str()), children)
        })
        .collect();

    NavTreeData {
        header: None,
        tree: NavTree::new(vec![Node::with_children("Docs", Some("index.html"), pages)]),
        index: NavIndex::new(vec!["d0/d00/md_Section_0.html".to_owned()]),
        sync: SyncMessages::default(),
    }
}

fn bench_fixture(c: &mut Criterion) {
    let mut group = c.benchmark_group("ear_5_0");
    group.throughput(Throughput::Bytes(EAR_5_0.len() as u64));

    group.bench_function("parse", |b| b.iter(|| parse(EAR_5_0)));
    group.bench_function("load", |b| b.iter(|| load(EAR_5_0)));

    let data = load(EAR_5_0).unwrap();
    group.bench_function("write", |b| b.iter(|| write_navtree(&data)));

    group.finish();
}

fn bench_varying_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("generated");

    for sections in [10, 100, 1000] {
        let source = write_navtree(&generate_tree(sections, 10));
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::new("load", sections), &source, |b, source| {
            b.iter(|| load(source));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fixture, bench_varying_sizes);
criterion_main!(benches);
