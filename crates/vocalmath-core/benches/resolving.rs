use criterion::{black_box, criterion_group, criterion_main, Criterion};

use vocalmath_core::AnswerResolver;

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    let resolver = AnswerResolver::new();

    let phrases = [
        ("short", "ten"),
        ("compound", "forty two"),
        ("negated", "minus seventeen"),
        (
            "long",
            "nine hundred ninety nine million nine hundred ninety nine thousand nine hundred ninety nine",
        ),
        ("noise", "uh i think the answer is maybe banana"),
    ];

    for (name, phrase) in phrases {
        group.bench_function(name, |b| b.iter(|| resolver.resolve(black_box(phrase))));
    }

    group.finish();
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
