//! Benchmarks for enumeration, stage chains and progress reporting.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use indicatif::ProgressDrawTarget;
use photoflow::config::PipelineConfig;
use photoflow::core::WorkItem;
use photoflow::enumerate::{DirectoryScan, WorkSource};
use photoflow::pipeline::StageChain;
use photoflow::progress::{ProgressReporter, TerminalReporter};
use photoflow::testing::{RecordingStage, StageBehavior};

fn status_benchmark(c: &mut Criterion) {
    let mut reporter = TerminalReporter::new(ProgressDrawTarget::hidden());

    c.bench_function("reporter_status", |b| {
        b.iter(|| {
            reporter.status(
                black_box(517),
                black_box(2048),
                black_box("/home/user/Pictures/2024/holiday/IMG_4711.jpg"),
            );
        })
    });
}

fn directory_scan_benchmark(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    for i in 0..500 {
        std::fs::write(dir.path().join(format!("IMG_{i:04}.jpg")), b"").expect("write");
        if i % 3 == 0 {
            std::fs::write(dir.path().join(format!("IMG_{i:04}_web.jpg")), b"").expect("write");
        }
    }
    let scan = DirectoryScan::new(dir.path());

    c.bench_function("directory_scan_500", |b| {
        b.iter(|| black_box(scan.enumerate().expect("scan")))
    });
}

fn chain_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    let chain = StageChain::new()
        .with_stage(RecordingStage::new("export").behave(StageBehavior::Skip))
        .with_stage(RecordingStage::new("watermark").behave(StageBehavior::Inactive))
        .with_stage(RecordingStage::new("upload"));
    let config = PipelineConfig::for_upload("bench");

    c.bench_function("stage_chain_item", |b| {
        b.iter(|| {
            let mut item = WorkItem::from_file("/bench/a.jpg", "/bench/a_web.jpg");
            runtime.block_on(chain.run(&mut item, &config))
        })
    });
}

criterion_group!(
    benches,
    status_benchmark,
    directory_scan_benchmark,
    chain_benchmark
);
criterion_main!(benches);
