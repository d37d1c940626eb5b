use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use phrasedrill_core::question::{Idiom, WordField};

fn bench_word_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("word_field");

    let small = WordField::new(
        "wf-small",
        "happy",
        vec!["happy".into(), "joyful".into(), "glad".into()],
    )
    .unwrap();
    group.bench_function("3 words", |b| {
        b.iter(|| small.grade(black_box("happy, sad, glad"), black_box(1.0)))
    });

    let words: Vec<String> = (0..200).map(|i| format!("word{i}")).collect();
    let answer = (0..300)
        .map(|i| format!(" Word{i} "))
        .collect::<Vec<_>>()
        .join(",");
    let large = WordField::new("wf-large", "many", words).unwrap();
    group.bench_function("200 words", |b| {
        b.iter(|| large.grade(black_box(&answer), black_box(1.0)))
    });

    group.finish();
}

fn bench_idiom_hint(c: &mut Criterion) {
    let idiom = Idiom::new(
        "id-1",
        "it's raining cats and dogs",
        "raining very heavily",
        3,
    )
    .unwrap();
    let mut rng = StdRng::seed_from_u64(3);

    c.bench_function("idiom_hint", |b| b.iter(|| idiom.hint(&mut rng)));
}

criterion_group!(benches, bench_word_field, bench_idiom_hint);
criterion_main!(benches);
