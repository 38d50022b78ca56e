use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use sy_ascii::AsciiPipeline;
use sy_ascii::preprocess::gaussian_blur_3x3;
use sy_core::frame::FrameBuffer;

fn gradient_frame(w: u32, h: u32) -> FrameBuffer {
    let mut fb = FrameBuffer::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let v = ((x + y) % 256) as u8;
            fb.set_rgb(x, y, (v, v / 2, 255 - v));
        }
    }
    fb
}

fn bench_frame_to_text(c: &mut Criterion) {
    let frame = gradient_frame(640, 360);
    let mut pipeline = AsciiPipeline::new(80, 30);

    c.bench_function("frame_to_text_640x360_to_80x30", |b| {
        b.iter(|| pipeline.frame_to_text(black_box(&frame)))
    });
}

fn bench_blur(c: &mut Criterion) {
    let src: Vec<u8> = (0..200 * 60).map(|i| (i % 251) as u8).collect();
    let mut dst = Vec::new();

    c.bench_function("gaussian_blur_3x3_200x60", |b| {
        b.iter(|| gaussian_blur_3x3(black_box(&src), 200, 60, &mut dst))
    });
}

criterion_group!(benches, bench_frame_to_text, bench_blur);
criterion_main!(benches);
