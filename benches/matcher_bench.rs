use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quote_locator::{CheckOptions, Occurrence, QuoteCheckRequest, QuoteChecker, Reference, SourceText, WordMatcher};

const VERSE: &str = "Ἐν ἀρχῇ ἦν ὁ λόγος, καὶ ὁ λόγος ἦν πρὸς τὸν Θεόν, καὶ Θεὸς ἦν ὁ λόγος.";

fn long_passage(repeats: usize) -> String {
    vec![VERSE; repeats].join(" ")
}

fn bench_word_matcher(c: &mut Criterion) {
    // WHY: matching cost grows with verse length and with repeated partial prefixes
    let mut group = c.benchmark_group("word_matcher");
    let segment = SourceText::new("ὁ λόγος ἦν πρὸς").words();

    for repeats in [1usize, 8, 64] {
        let source = SourceText::new(&long_passage(repeats));
        let words = source.words();
        group.bench_with_input(BenchmarkId::new("locate_last", repeats), &words, |b, words| {
            let matcher = WordMatcher::new(words);
            b.iter(|| black_box(matcher.locate(&segment, Occurrence::Nth(repeats as u32), 0)))
        });
        group.bench_with_input(BenchmarkId::new("count", repeats), &words, |b, words| {
            let matcher = WordMatcher::new(words);
            b.iter(|| black_box(matcher.count(&segment, 0)))
        });
    }
    group.finish();
}

fn bench_full_check(c: &mut Criterion) {
    // WHY: end-to-end cost of one check with supplied text, including segmentation and classification
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let rt = &runtime;
    let checker = QuoteChecker::new().unwrap();
    let reference = Reference::book("JHN", 1, 1).unwrap();
    let options = CheckOptions::with_source_text(VERSE);

    let mut group = c.benchmark_group("quote_check");
    for (name, quote) in [("found", "ὁ λόγος & πρὸς τὸν Θεόν"), ("not_found", "ὁ Θεὸς & λόγος ἦν"), ("partial_word", "όγος")] {
        let request = QuoteCheckRequest {
            language_code: "en",
            repo_code: "TN2",
            field_name: "Quote",
            quote,
            occurrence: "1",
            reference: &reference,
            location: "",
        };
        let (checker, options, request) = (&checker, &options, &request);
        group.bench_function(name, move |b| {
            b.to_async(rt).iter(move || async move { black_box(checker.check(request, options).await.unwrap()) })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_word_matcher, bench_full_check);
criterion_main!(benches);
