use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use voicebus::catalog::StaticCatalog;
use voicebus::interpreter::{CommandInterpreter, InterpretContext};
use voicebus::resolver::DestinationResolver;

/// Transcripts hitting early, late, and no rules.
const TRANSCRIPTS: &[(&str, &str)] = &[
    ("next_bus", "when is the next bus to pride park"),
    ("next_stop", "i have reached this stop next stop please"),
    ("help", "what can i say"),
    ("unknown", "the weather is lovely today isn't it"),
];

fn bench_interpret(c: &mut Criterion) {
    let catalog = StaticCatalog::derby();
    let interpreter = CommandInterpreter::default();

    let mut group = c.benchmark_group("interpret");
    for (name, transcript) in TRANSCRIPTS {
        for selection_open in [false, true] {
            let context = InterpretContext { selection_open };
            let id = format!("{name}/prompt_{}", if selection_open { "open" } else { "closed" });
            group.bench_with_input(BenchmarkId::from_parameter(id), transcript, |b, t| {
                b.iter(|| interpreter.interpret(black_box(t), context, &catalog));
            });
        }
    }
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let catalog = StaticCatalog::derby();
    let resolver = DestinationResolver::default();

    c.bench_function("resolve/synonym_without_route", |b| {
        b.iter(|| resolver.resolve(black_box("royal derby"), &catalog));
    });
    c.bench_function("resolve/last_key", |b| {
        b.iter(|| resolver.resolve(black_box("Chellaston"), &catalog));
    });
}

criterion_group!(benches, bench_interpret, bench_resolve);
criterion_main!(benches);
