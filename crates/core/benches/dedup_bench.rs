use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use neardup_core::band_index::BandIndex;
use neardup_core::exact_dedup::ExactGrouper;
use neardup_core::minhash::{Signature, Sketcher};
use neardup_core::similarity::similarity_ratio;
use neardup_core::EngineBuilder;

const TOPICS: [&str; 4] = ["parks", "roads", "water supply", "school districts"];

fn corpus(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            format!(
                "Article {} of the municipal ordinance on {} takes effect in fiscal year {}",
                i % 97,
                TOPICS[i % TOPICS.len()],
                2000 + i % 13
            )
        })
        .collect()
}

fn bench_exact_grouping(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact_grouping");
    group.throughput(Throughput::Elements(10_000));

    let unique: Vec<String> = (0..10_000).map(|i| format!("text_{}", i)).collect();
    group.bench_function("10k_unique", |b| {
        b.iter(|| black_box(ExactGrouper::new().group(&unique)));
    });

    let half_dup: Vec<String> = (0..10_000).map(|i| format!("text_{}", i % 5000)).collect();
    group.bench_function("10k_50pct_dup", |b| {
        b.iter(|| black_box(ExactGrouper::new().group(&half_dup)));
    });

    group.finish();
}

fn bench_sketching(c: &mut Criterion) {
    let mut group = c.benchmark_group("sketching");
    let texts = corpus(10_000);
    group.throughput(Throughput::Elements(texts.len() as u64));

    let sketcher = Sketcher::new(3, 12);
    group.bench_function("ascii_10k", |b| {
        b.iter(|| {
            for text in &texts {
                black_box(sketcher.signature(text));
            }
        });
    });

    let cjk: Vec<String> = (0..10_000)
        .map(|i| format!("第{}条 この条例は、公布の日から起算して{}日を経過した日から施行する。", i % 97, i % 30))
        .collect();
    group.bench_function("cjk_10k", |b| {
        b.iter(|| {
            for text in &cjk {
                black_box(sketcher.signature(text));
            }
        });
    });

    group.finish();
}

fn bench_band_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("band_index");
    let texts = corpus(50_000);
    let sketcher = Sketcher::new(3, 12);
    let signatures: Vec<Signature> = texts.iter().map(|t| sketcher.signature(t)).collect();
    let lengths: Vec<usize> = texts.iter().map(|t| t.chars().count()).collect();
    group.throughput(Throughput::Elements(texts.len() as u64));

    group.bench_function("build_50k", |b| {
        b.iter(|| black_box(BandIndex::build(&signatures, &lengths, 4, 50)));
    });

    group.bench_function("build_parallel_50k", |b| {
        b.iter(|| black_box(BandIndex::build_parallel(&signatures, &lengths, 4, 50)));
    });

    group.finish();
}

fn bench_similarity(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity");
    let a = "The quick brown fox jumps over the lazy dog near the river bank at dawn";
    let b = "The quick brown fox leaps over the lazy cat near the river bank at dusk";

    group.bench_function("ratio_72_chars", |bench| {
        bench.iter(|| black_box(similarity_ratio(black_box(a), black_box(b))));
    });

    group.finish();
}

fn bench_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");
    group.sample_size(10);

    let texts = corpus(20_000);
    group.throughput(Throughput::Elements(texts.len() as u64));

    for parallel in [false, true] {
        let engine = EngineBuilder::new()
            .similarity_threshold(0.9)
            .parallel(parallel)
            .build()
            .unwrap();
        let name = if parallel { "20k_parallel" } else { "20k_sequential" };
        group.bench_function(name, |b| {
            b.iter(|| black_box(engine.run_texts(&texts)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_exact_grouping,
    bench_sketching,
    bench_band_index,
    bench_similarity,
    bench_throughput
);
criterion_main!(benches);
