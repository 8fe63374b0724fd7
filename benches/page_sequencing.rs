//! Criterion benchmarks for page sequencing.
//!
//! Builds a synthetic 40-line book page (body column, paragraph indents, one
//! heading, a footnote block) and measures metrics analysis plus the full
//! per-page sequencing pass.

use criterion::{criterion_group, criterion_main, Criterion};
use scan_oxide::config::{BookTypeConfig, HeaderFormat, RoleOffset};
use scan_oxide::geometry::BoundingBox;
use scan_oxide::layout::{LineRole, PageMetrics};
use scan_oxide::ocr::{OcrLine, OcrPage};
use scan_oxide::pipeline::{PageSequencer, ScanResults};
use std::hint::black_box;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn synthetic_page() -> OcrPage {
    let mut lines = vec![OcrLine::new(
        "I VON DEN FARBEN",
        BoundingBox::new(380.0, 60.0, 620.0, 90.0),
    )];
    for k in 0..36 {
        let y = 120.0 + 32.0 * k as f32;
        let x0 = if k % 6 == 0 { 140.0 } else { 100.0 };
        let text = if k % 6 == 5 {
            "das Ende eines Absatzes.".to_string()
        } else {
            format!("Zeile {} des laufenden Textes mit Tren-", k)
        };
        lines.push(OcrLine::new(text, BoundingBox::new(x0, y, 900.0, y + 28.0)));
    }
    for k in 0..3 {
        let y = 1300.0 + 24.0 * k as f32;
        lines.push(OcrLine::new(
            "nung einer Anmerkung am Fuß der Seite",
            BoundingBox::new(60.0, y, 900.0, y + 20.0),
        ));
    }
    OcrPage::from_lines(lines).with_width(1000.0)
}

fn book_type() -> scan_oxide::CompiledBookType {
    BookTypeConfig::new()
        .with_metric(LineRole::ParagraphStart, RoleOffset::Offset(40.0))
        .with_metric(LineRole::FootnoteText, RoleOffset::Offset(-40.0))
        .with_header_level(
            1,
            vec![
                HeaderFormat::new("{roman-number} {title-in-capital-letters}")
                    .with_multiple_lines(true),
            ],
        )
        .with_removal_pattern("/^\\d+$/")
        .compile("bench")
        .expect("bench book type compiles")
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_page_metrics(c: &mut Criterion) {
    let page = synthetic_page();
    let book_type = book_type();
    c.bench_function("page_metrics (40 lines)", |b| {
        b.iter(|| {
            let metrics = PageMetrics::analyze(page.lines(), book_type.role_offsets(), 7.0);
            black_box(metrics);
        });
    });
}

fn bench_sequence_page(c: &mut Criterion) {
    let page = synthetic_page();
    let book_type = book_type();
    let sequencer = PageSequencer::new(&book_type);
    c.bench_function("sequence_page (40 lines)", |b| {
        b.iter(|| {
            let mut results = ScanResults::new();
            let report = sequencer.process_page(black_box(&page), &mut results);
            black_box((report, results));
        });
    });
}

criterion_group!(benches, bench_page_metrics, bench_sequence_page);
criterion_main!(benches);
