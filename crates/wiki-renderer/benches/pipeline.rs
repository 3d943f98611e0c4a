//! Benchmarks for the render pipeline.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use wiki_renderer::{Pipeline, PipelineConfig};
use wiki_renderer::{EmbedRewriter, shortcode::ShortcodeRegistry};

/// Generate a wiki page with headings, hints and video links.
fn generate_markdown(sections: usize, paragraphs_per_section: usize) -> String {
    let mut md = String::with_capacity(sections * 120 + sections * paragraphs_per_section * 200);
    md.push_str("# Document Title\n\n");

    for i in 0..sections {
        md.push_str(&format!("## Section {i}\n\n"));
        for j in 0..paragraphs_per_section {
            md.push_str(&format!(
                "This is paragraph {j} in section {i}. It contains **bold** and *italic* text.\n\n"
            ));
        }
        md.push_str(&format!("{{{{tip}}}}\n\nHint for section {i}.\n\n{{{{/tip}}}}\n\n"));
        if i % 5 == 0 {
            md.push_str("https://www.youtube.com/watch?v=dQw4w9WgXcQ\n\n");
            md.push_str("{{blueprint id=\"AbCdEfGh\"}}\n\n");
        }
    }
    md
}

fn bench_render_simple(c: &mut Criterion) {
    let pipeline = Pipeline::default();

    c.bench_function("render_simple_markdown", |b| {
        b.iter(|| pipeline.render("# Hello\n\nSimple content."));
    });
}

fn bench_render_shortcodes(c: &mut Criterion) {
    let markdown = "{{warning}}\n\nCareful.\n\n{{/warning}}\n\n\
        {{version gte=\"5.0\" lt=\"5.02\"}}\n\nNew API.\n\n{{/version}}\n\n\
        https://youtu.be/dQw4w9WgXcQ\n";
    let pipeline = Pipeline::default();

    c.bench_function("render_shortcodes", |b| {
        b.iter(|| pipeline.render(markdown));
    });
}

fn bench_render_varying_sizes(c: &mut Criterion) {
    let pipeline = Pipeline::new(
        PipelineConfig {
            extract_title: true,
            ..PipelineConfig::default()
        },
        ShortcodeRegistry::builtin(),
        EmbedRewriter::default(),
    );

    let mut group = c.benchmark_group("render_by_size");

    for (sections, paragraphs) in [(5, 2), (20, 3), (50, 5)] {
        let markdown = generate_markdown(sections, paragraphs);

        let size = markdown.len();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(
            BenchmarkId::new("markdown", format!("{sections}s_{paragraphs}p")),
            &markdown,
            |b, source| b.iter(|| pipeline.render(source)),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_render_simple,
    bench_render_shortcodes,
    bench_render_varying_sizes,
);
criterion_main!(benches);
