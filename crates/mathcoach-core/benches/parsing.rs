use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mathcoach_core::answer::{parse_numeric, RawAnswer};
use mathcoach_core::equivalence::is_nearly_equal;
use mathcoach_core::traits::extract_json_block;

fn bench_parse_numeric(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_numeric");

    let inputs = [
        ("number", RawAnswer::Number(12.5)),
        ("plain", RawAnswer::from("1,234.5")),
        ("percentage", RawAnswer::from("7.5%")),
        ("mixed_number", RawAnswer::from("-1 1/2")),
        ("fraction", RawAnswer::from("3 / 4")),
        ("with_units", RawAnswer::from("$12.50 per kg")),
        ("garbage", RawAnswer::from("I don't know")),
    ];

    for (name, input) in &inputs {
        group.bench_function(*name, |b| b.iter(|| parse_numeric(black_box(input))));
    }

    group.finish();
}

fn bench_is_nearly_equal(c: &mut Criterion) {
    let pairs: Vec<(f64, f64)> = (0..1000)
        .map(|i| (i as f64 * 1.5, i as f64 * 1.5 + 0.0001))
        .collect();

    c.bench_function("is_nearly_equal_1000", |b| {
        b.iter(|| {
            pairs
                .iter()
                .filter(|(a, b)| is_nearly_equal(black_box(*a), black_box(*b)))
                .count()
        })
    });
}

fn bench_extract_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_json_block");

    let bare = r#"{"problem_text":"Ali has 3 apples","final_answer":7}"#;
    let fenced = "Here is your problem:\n```json\n{\"problem_text\":\"Ali has 3 apples\",\"final_answer\":7}\n```\n";
    let long_prose = {
        let mut s = "Let me think about this. ".repeat(200);
        s.push_str(bare);
        s
    };

    group.bench_function("bare", |b| b.iter(|| extract_json_block(black_box(bare))));
    group.bench_function("fenced", |b| {
        b.iter(|| extract_json_block(black_box(fenced)))
    });
    group.bench_function("long_prose", |b| {
        b.iter(|| extract_json_block(black_box(&long_prose)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_numeric,
    bench_is_nearly_equal,
    bench_extract_json
);
criterion_main!(benches);
