use criterion::{criterion_group, criterion_main, Criterion};
use lsi_magnet::{Document, Index, Magnet, Query, UnionFindMagnet, Word, WordKMeans};

const TOKENS: [&str; 16] = [
    "box", "shape", "circle", "area", "render", "canvas", "stream", "socket", "packet", "sort",
    "pivot", "merge", "parse", "token", "lexer", "node",
];

/// Deterministic synthetic word list: every token occurs in a few of 40 classes
fn synthetic_words() -> Vec<Word> {
    let mut state = 0x2545F4914F6CDD1Du64;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };
    let mut words = Vec::new();
    for token in TOKENS {
        for _ in 0..4 {
            let containers: Vec<String> = (0..3)
                .map(|_| format!("pkg.Class{}#run", next() % 40))
                .collect();
            words.push(Word::with_containers(token, 1, containers));
        }
    }
    words
}

fn synthetic_documents() -> Vec<Document> {
    let names = [
        "BoxShape",
        "CircleShape",
        "Shape",
        "ShapeFactory",
        "Canvas",
        "CanvasPainter",
        "SocketStream",
        "PacketStream",
        "Stream",
        "QuickSort",
        "MergeSort",
        "Sorter",
        "TokenLexer",
        "Lexer",
        "NodeParser",
        "Parser",
    ];
    names
        .iter()
        .enumerate()
        .map(|(i, n)| Document::from_container(i, &format!("pkg{}.{}", i % 4, n)))
        .collect()
}

fn index_and_query_benchmark(c: &mut Criterion) {
    let words = synthetic_words();

    c.bench_function("create_index", |b| {
        b.iter(|| Index::create_index(&words).unwrap());
    });

    let index = Index::create_index(&words).unwrap();
    let query_words = vec![Word::new("shape"), Word::new("area")];
    c.bench_function("method_search", |b| {
        b.iter(|| Query::new(&index).method_search(&query_words).unwrap());
    });

    let docs: Vec<Document> = index.doc_set().iter().take(2).cloned().collect();
    c.bench_function("type_search", |b| {
        b.iter(|| Query::new(&index).type_search(&docs).unwrap());
    });
}

fn grouping_benchmark(c: &mut Criterion) {
    let words = synthetic_words();
    c.bench_function("word_kmeans", |b| {
        b.iter(|| WordKMeans::default().apply(&words).unwrap());
    });

    let documents = synthetic_documents();
    c.bench_function("union_find", |b| {
        b.iter(|| UnionFindMagnet::default().apply(&documents).unwrap());
    });
}

criterion_group!(benches, index_and_query_benchmark, grouping_benchmark);
criterion_main!(benches);
