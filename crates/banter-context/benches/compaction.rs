use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use banter_context::{encoder, splitter, window, CompressionConfig, ContextCompactor, SummaryCoordinator};
use banter_core::Message;
use banter_runtime::MockSummarizer;
use banter_store::{InMemoryMetricsStore, InMemorySummaryStore};

fn conversation(count: usize) -> Vec<Message> {
    (0..count)
        .map(|i| {
            let content = format!("turn {i}: {}", "benchmark chatter ".repeat(16));
            if i % 2 == 0 {
                Message::user(content)
            } else {
                Message::assistant(content)
            }
        })
        .collect()
}

fn benchmark_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("context/encode");
    for size in [10usize, 100, 1000] {
        let messages = conversation(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            b.iter(|| {
                let encoded = encoder::encode(&messages);
                encoder::estimate_tokens(&encoded)
            });
        });
    }
    group.finish();
}

fn benchmark_window_selection(c: &mut Criterion) {
    let messages = conversation(200);

    c.bench_function("context/window_over_budget", |b| {
        b.iter(|| window::optimize(&messages, 2000, 10));
    });
}

fn benchmark_split(c: &mut Criterion) {
    let text = format!(
        "{}\n\n```\n{}\n```\n\n{}",
        "Prose paragraph with sentences. ".repeat(60),
        "let x = 1;\n".repeat(30),
        "Closing discussion goes on for a while. ".repeat(120)
    );

    c.bench_function("context/split_default", |b| {
        b.iter(|| splitter::split_default(&text));
    });
}

fn benchmark_compact_with_cached_summary(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime should build");

    let coordinator = Arc::new(SummaryCoordinator::new(
        Arc::new(InMemorySummaryStore::new()),
        Arc::new(MockSummarizer::always("cached benchmark recap")),
    ));
    let compactor = ContextCompactor::new(coordinator, Arc::new(InMemoryMetricsStore::new()));
    let messages = conversation(64);
    let config = CompressionConfig::default();

    // Warm the cache so the loop measures the reuse path.
    runtime.block_on(async {
        compactor
            .compact("bench-session", &messages, &config)
            .await
            .expect("warmup compaction should succeed");
    });

    c.bench_function("context/compact_cached", |b| {
        b.iter(|| {
            runtime.block_on(async {
                compactor
                    .compact("bench-session", &messages, &config)
                    .await
                    .expect("compaction should succeed")
            });
        });
    });
}

criterion_group!(
    compaction_benches,
    benchmark_encode,
    benchmark_window_selection,
    benchmark_split,
    benchmark_compact_with_cached_summary
);
criterion_main!(compaction_benches);
