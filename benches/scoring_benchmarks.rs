//! Benchmarks for frame scoring and the detection loop.
//!
//! Run with: cargo bench
//!
//! The file benchmark requires `tests/fixtures/generate_fixtures.sh`.

use std::{hint::black_box, path::Path};

use criterion::Criterion;
use ffmpeg_next::util::log::Level as LogLevel;
use image::{Rgb, RgbImage};
use scenecut::{
    DetectionOptions, FrameSequence, NullLogSink, SceneDetector, VideoMetadata,
    mean_absolute_difference, to_intensity,
};

const SAMPLE_VIDEO: &str = "tests/fixtures/sample_video.mp4";

fn gradient(width: u32, height: u32, offset: u8) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let value = ((x + y) as u8).wrapping_add(offset);
        Rgb([value, value.wrapping_mul(3), value.wrapping_add(17)])
    })
}

fn benchmark_intensity(criterion: &mut Criterion) {
    let frame = gradient(1920, 1080, 0);
    criterion.bench_function("to_intensity 1080p", |bencher| {
        bencher.iter(|| to_intensity(black_box(&frame)));
    });
}

fn benchmark_difference(criterion: &mut Criterion) {
    let current = to_intensity(&gradient(1920, 1080, 0));
    let previous = to_intensity(&gradient(1920, 1080, 40));
    criterion.bench_function("mean_absolute_difference 1080p", |bencher| {
        bencher.iter(|| mean_absolute_difference(black_box(&current), black_box(&previous)));
    });
}

fn benchmark_synthetic_detection(criterion: &mut Criterion) {
    let frames: Vec<RgbImage> = (0..250u32)
        .map(|index| gradient(640, 360, ((index / 50) * 60) as u8))
        .collect();
    let metadata = VideoMetadata::new(25.0, 250, 10.0).with_dimensions(640, 360);

    for frame_skip in [1, 10] {
        let detector = SceneDetector::new(DetectionOptions::new().with_frame_skip(frame_skip));
        criterion.bench_function(
            &format!("detect 250 synthetic frames (frame_skip {frame_skip})"),
            |bencher| {
                bencher.iter(|| {
                    let source = FrameSequence::new(metadata.clone(), frames.clone());
                    detector.detect(source, &NullLogSink).unwrap()
                });
            },
        );
    }
}

fn benchmark_file_detection(criterion: &mut Criterion) {
    ffmpeg_next::util::log::set_level(LogLevel::Error);

    if !Path::new(SAMPLE_VIDEO).exists() {
        eprintln!("Skipping benchmark: fixture not found");
        return;
    }

    let detector = SceneDetector::default();
    criterion.bench_function("detect sample_video.mp4", |bencher| {
        bencher.iter(|| detector.detect_file(SAMPLE_VIDEO, &NullLogSink).unwrap());
    });
}

criterion::criterion_group!(
    benches,
    benchmark_intensity,
    benchmark_difference,
    benchmark_synthetic_detection,
    benchmark_file_detection,
);
criterion::criterion_main!(benches);
