use criterion::{criterion_group, criterion_main, Criterion};
use shelfscan_core::{build_index, search, Book, FieldWeights};

/// Roughly the size of a large personal shelf.
fn synthetic_books(n: usize) -> Vec<Book> {
    let words = [
        "space", "saga", "desert", "empire", "memoir", "family", "murder", "locked", "robot",
        "future", "galaxy", "ocean", "winter", "crown", "garden", "secret",
    ];
    (0..n)
        .map(|i| Book {
            id: i.to_string(),
            title: format!("{} {}", words[i % words.len()], words[(i * 7) % words.len()]),
            description: (0..40).map(|j| words[(i + j * 3) % words.len()]).collect::<Vec<_>>().join(" "),
            author_name: format!("Author {}", i % 97),
            user_shelves: if i % 3 == 0 { "to-read".into() } else { "read".into() },
            page_count: Some(200 + (i % 400) as u32),
            ..Default::default()
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let books = synthetic_books(2_000);
    let weights = FieldWeights::default();
    c.bench_function("build_index_2000", |b| b.iter(|| build_index(&books, &weights)));
}

fn bench_query(c: &mut Criterion) {
    let books = synthetic_books(2_000);
    let index = build_index(&books, &FieldWeights::default());
    c.bench_function("search_2000", |b| b.iter(|| search(&books, &index, "space saga to-read")));
}

criterion_group!(benches, bench_build, bench_query);
criterion_main!(benches);
