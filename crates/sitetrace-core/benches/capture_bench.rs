//! # Capture Benchmarks
//!
//! Performance benchmarks for sitetrace-core capture and annotation.
//!
//! Run with: `cargo bench -p sitetrace-core`

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use sitetrace_core::{
    AssemblyTrace, CaptureConfig, FrameRecord, LogLevel, StageError, StaticWalker,
};
use std::hint::black_box;

/// Synthetic stack with a realistic mix of noise and user frames.
fn synthetic_stack(depth: usize) -> StaticWalker {
    let mut frames = vec![
        FrameRecord::new("backtrace::capture::Backtrace::new"),
        FrameRecord::new("sitetrace_core::trace::AssemblyTrace::create"),
    ];
    for layer in 0..depth {
        frames.push(FrameRecord::located(
            format!("myapp::layer_{layer}"),
            "src/pipeline.rs",
            layer as u32,
        ));
    }
    StaticWalker::new(frames)
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("trace_create");

    // The disabled level is the advertised fast path: no walk at all.
    let disabled = CaptureConfig::disabled();
    group.bench_function("disabled_fast_path", |b| {
        b.iter(|| black_box(AssemblyTrace::create(&disabled)));
    });

    let unfiltered = CaptureConfig::new(false);
    group.bench_function("real_stack_unfiltered", |b| {
        b.iter(|| black_box(AssemblyTrace::create(&unfiltered)));
    });

    let filtered = CaptureConfig::new(true);
    group.bench_function("real_stack_filtered", |b| {
        b.iter(|| black_box(AssemblyTrace::create(&filtered)));
    });

    group.finish();
}

fn bench_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_filtering");
    let config = CaptureConfig::new(true);

    for depth in [8, 64, 256] {
        let walker = synthetic_stack(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            b.iter(|| black_box(AssemblyTrace::create_with(&config, &walker)));
        });
    }

    group.finish();
}

fn bench_annotate(c: &mut Criterion) {
    let mut group = c.benchmark_group("annotate");
    let config = CaptureConfig::new(false).with_log_level(LogLevel::ShowAll);
    let walker = synthetic_stack(4);

    // Walk cost grows with the number of sites already in the chain.
    for existing_sites in [0usize, 4, 16] {
        let trace = AssemblyTrace::create_with(&config, &walker);
        group.bench_with_input(
            BenchmarkId::from_parameter(existing_sites),
            &existing_sites,
            |b, &existing_sites| {
                b.iter_batched(
                    || {
                        let mut error = StageError::new("boom");
                        for _ in 0..existing_sites {
                            let earlier = AssemblyTrace::create_with(&config, &walker);
                            earlier.annotate(&mut error);
                        }
                        error
                    },
                    |mut error| black_box(trace.annotate(&mut error)),
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_create, bench_filtering, bench_annotate);
criterion_main!(benches);
