//! Criterion micro-benchmarks for processor iteration.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chainproc_bench::{group_names, reference_profile, REFERENCE_ACTION};
use chainproc_core::{ExecutionContext, Processor, ProcessorError};
use chainproc_dispatch::{
    create_iterator, ChainApplicableChecker, ChainProcessor, NotDisabledApplicableChecker,
    ProcessorRegistry,
};
use std::sync::Arc;

struct Noop;

impl Processor for Noop {
    fn process(&self, _context: &mut ExecutionContext) -> Result<(), ProcessorError> {
        Ok(())
    }
}

fn resolver(bag: &chainproc_bag::ProcessorBag) -> ProcessorRegistry {
    let shared: Arc<dyn Processor> = Arc::new(Noop);
    let mut registry = ProcessorRegistry::new();
    for entry in bag.processors(REFERENCE_ACTION).entries() {
        registry.register_shared(entry.id().clone(), Arc::clone(&shared));
    }
    registry
}

/// Benchmark: iterate all 72 processors with no directives.
fn bench_iterate_unrestricted(c: &mut Criterion) {
    let bag = reference_profile(8, 8).unwrap();
    let resolver = resolver(&bag);
    let checker = ChainApplicableChecker::new().with_checker(NotDisabledApplicableChecker);
    let ctx = ExecutionContext::new(REFERENCE_ACTION);

    c.bench_function("iterate_unrestricted_8x8", |b| {
        b.iter(|| {
            let mut iter = create_iterator(&bag, &ctx, &checker, &resolver);
            let n = iter.with_context(&ctx).filter(|r| r.is_ok()).count();
            black_box(n);
        });
    });
}

/// Benchmark: iterate with a narrow first/last window and skipped groups,
/// exercising the excluded-run jumps.
fn bench_iterate_windowed(c: &mut Criterion) {
    let bag = reference_profile(8, 8).unwrap();
    let resolver = resolver(&bag);
    let checker = ChainApplicableChecker::new().with_checker(NotDisabledApplicableChecker);
    let names = group_names(8);
    let mut ctx = ExecutionContext::new(REFERENCE_ACTION);
    ctx.set_first_group(names[2].as_str());
    ctx.set_last_group(names[5].as_str());
    ctx.skip_group(names[3].as_str());

    c.bench_function("iterate_windowed_8x8", |b| {
        b.iter(|| {
            let mut iter = create_iterator(&bag, &ctx, &checker, &resolver);
            let n = iter.with_context(&ctx).filter(|r| r.is_ok()).count();
            black_box(n);
        });
    });
}

/// Benchmark: execute the whole reference action through `ChainProcessor`.
fn bench_chain_process(c: &mut Criterion) {
    let bag = reference_profile(8, 8).unwrap();
    let resolver = resolver(&bag);
    let chain = ChainProcessor::new(Arc::new(bag), NotDisabledApplicableChecker, resolver);

    c.bench_function("chain_process_8x8", |b| {
        b.iter(|| {
            let mut ctx = ExecutionContext::new(REFERENCE_ACTION);
            let n = chain.process(&mut ctx).unwrap();
            black_box(n);
        });
    });
}

criterion_group!(
    benches,
    bench_iterate_unrestricted,
    bench_iterate_windowed,
    bench_chain_process
);
criterion_main!(benches);
