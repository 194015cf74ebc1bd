// SPDX-License-Identifier: MPL-2.0
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use tripplan_client::config::I18nOptions;
use tripplan_client::i18n::{sprintf, EmbeddedResources, FormatValue, Translator, Values};

fn translation_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("translation");

    let translator = Translator::load(
        "de-AT".parse().expect("valid tag"),
        I18nOptions::default(),
        &EmbeddedResources,
    )
    .expect("embedded catalogs load");

    group.bench_function("plain_key_with_region_fallback", |b| {
        b.iter(|| black_box(translator.translate(black_box("Bicycle Only"), &[])));
    });

    group.bench_function("plural_key", |b| {
        b.iter(|| black_box(translator.translate_plural("%d minute", "%d minutes", black_box(12))));
    });

    group.bench_function("missing_key", |b| {
        b.iter(|| black_box(translator.translate(black_box("No Such Key"), &[])));
    });

    let values = Values::Positional(vec![FormatValue::from("Tabor"), FormatValue::from(3.5_f64)]);
    group.bench_function("sprintf_positional", |b| {
        b.iter(|| black_box(sprintf(black_box("From %s, %.1f km"), &values)));
    });

    group.finish();
}

criterion_group!(benches, translation_benchmark);
criterion_main!(benches);
