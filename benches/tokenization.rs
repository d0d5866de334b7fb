use criterion::{black_box, criterion_group, criterion_main, Criterion};

use wakachi::dict::{FstDictionary, PosTable, WordEntry};
use wakachi::Tokenizer;

fn entry(pos_id: u16, base: &str, reading: &str, cost: i16, conn_id: u16) -> WordEntry {
    WordEntry {
        pos_id,
        base_form: Some(base.into()),
        reading: Some(reading.into()),
        cost,
        left_id: conn_id,
        right_id: conn_id,
    }
}

fn bench_dict() -> FstDictionary {
    let mut pos = PosTable::new();
    let noun = pos.intern(&["名詞", "一般"]);
    let particle = pos.intern(&["助詞", "係助詞"]);

    let entries = vec![
        ("すもも".into(), vec![entry(noun, "すもも", "スモモ", 7546, 1)]),
        ("もも".into(), vec![entry(noun, "もも", "モモ", 7219, 1)]),
        ("も".into(), vec![entry(particle, "も", "モ", 4669, 2)]),
        ("の".into(), vec![entry(particle, "の", "ノ", 4770, 2)]),
        ("うち".into(), vec![entry(noun, "うち", "ウチ", 5796, 1)]),
        (
            "東京".into(),
            vec![entry(noun, "東京", "トウキョウ", 3003, 1)],
        ),
    ];
    FstDictionary::from_entries(entries, pos).unwrap()
}

fn bench_tokenize(c: &mut Criterion) {
    let tokenizer = Tokenizer::new(bench_dict());

    let short = "すもももももももものうち";
    let long = short.repeat(16);
    let unknown_heavy = "カタカナとabc混在の文字列∅".repeat(8);

    c.bench_function("tokenize_short", |b| {
        b.iter(|| tokenizer.tokenize(black_box(short)).unwrap())
    });
    c.bench_function("tokenize_long", |b| {
        b.iter(|| tokenizer.tokenize(black_box(&long)).unwrap())
    });
    c.bench_function("tokenize_unknown_heavy", |b| {
        b.iter(|| tokenizer.tokenize(black_box(&unknown_heavy)).unwrap())
    });
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
