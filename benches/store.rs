//! Store and query benchmarks for pdf-fts
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pdf_fts::extract::clean_text;
use pdf_fts::index::{ContentStore, Fingerprint, IndexSynchronizer};
use pdf_fts::query::QueryEngine;
use pdf_fts::utils::SnippetStyle;

const WORDS: &[&str] = &[
    "index", "document", "page", "search", "query", "snippet", "token", "table", "schema",
    "fingerprint", "rebuild", "content", "store", "trigger", "unicode", "phrase",
];

/// Deterministic page text of roughly `words` words
fn page_text(seed: usize, words: usize) -> String {
    (0..words)
        .map(|i| WORDS[(seed * 7 + i * 13) % WORDS.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

fn document_pages(seed: usize, pages: usize) -> Vec<String> {
    (0..pages).map(|p| page_text(seed + p, 400)).collect()
}

/// Store with `docs` documents of 10 pages each
fn populated_store(docs: usize) -> ContentStore {
    let mut store = ContentStore::open_in_memory().expect("Failed to open store");
    for d in 0..docs {
        store
            .upsert_document(
                &format!("library/doc_{}.pdf", d),
                &Fingerprint::from_hex(format!("{:040x}", d)),
                &document_pages(d, 10),
            )
            .expect("Failed to insert document");
    }
    store
}

fn bench_upsert(c: &mut Criterion) {
    let mut group = c.benchmark_group("upsert_document");

    for pages in [1, 10, 100] {
        let content = document_pages(1, pages);
        group.bench_with_input(BenchmarkId::from_parameter(pages), &content, |b, content| {
            let mut store = ContentStore::open_in_memory().expect("Failed to open store");
            let mut generation = 0u64;
            b.iter(|| {
                generation += 1;
                let fp = Fingerprint::from_hex(format!("{:040x}", generation));
                store
                    .upsert_document("bench.pdf", &fp, black_box(content))
                    .expect("Failed to upsert")
            })
        });
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let store = populated_store(200);
    let batch = SnippetStyle::batch();
    let live = SnippetStyle::live();
    let engine = QueryEngine::new(&store, &batch, &live);

    let mut group = c.benchmark_group("search");
    for query in ["fingerprint", "\"rebuild content\"", "sch*", "index AND NOT trigger"] {
        group.bench_with_input(BenchmarkId::new("batch", query), &query, |b, &q| {
            b.iter(|| engine.search(black_box(q), 5).expect("search failed"))
        });
        group.bench_with_input(BenchmarkId::new("live", query), &query, |b, &q| {
            b.iter(|| engine.live_search(black_box(q), 20).expect("search failed"))
        });
    }
    group.finish();
}

fn bench_rebuild(c: &mut Criterion) {
    let mut store = populated_store(100);
    c.bench_function("rebuild_1000_pages", |b| {
        b.iter(|| {
            IndexSynchronizer::new(&mut store)
                .rebuild()
                .expect("rebuild failed")
        })
    });
}

fn bench_clean_text(c: &mut Criterion) {
    let raw = page_text(3, 2000).replace(' ', " \n\t ");
    c.bench_function("clean_text_2000_words", |b| b.iter(|| clean_text(black_box(&raw))));
}

criterion_group!(benches, bench_upsert, bench_search, bench_rebuild, bench_clean_text);

criterion_main!(benches);
