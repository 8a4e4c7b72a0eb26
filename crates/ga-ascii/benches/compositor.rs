use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ga_ascii::compositor::Compositor;
use ga_core::charset::Alphabet;
use ga_core::config::{ColorMode, RenderConfig, Tone};
use ga_core::frame::PixelGrid;

fn gradient(width: u32, height: u32) -> PixelGrid {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let v = ((x + y) * 255 / (width + height).max(1)) as u8;
            data.extend_from_slice(&[v, 255 - v, v / 2, 255]);
        }
    }
    PixelGrid::from_rgba(width, height, data).unwrap_or_else(|_| PixelGrid::new(width, height))
}

fn bench_compositor(c: &mut Criterion) {
    let grid = gradient(200, 120);
    let mut compositor = Compositor::new();

    let ascii = RenderConfig::default();
    c.bench_function("ascii_200x120_neutral", |b| {
        b.iter(|| compositor.process(black_box(&grid), black_box(&ascii)));
    });

    let toned = RenderConfig::ascii(Alphabet::default_glyphs(), ColorMode::Grayscale)
        .with_tone(Tone::new(15, 40));
    c.bench_function("ascii_200x120_tone_grayscale", |b| {
        b.iter(|| compositor.process(black_box(&grid), black_box(&toned)));
    });

    let emoji = RenderConfig::emoji(Alphabet::default_emojis(), ColorMode::Original);
    c.bench_function("emoji_200x120", |b| {
        b.iter(|| compositor.process(black_box(&grid), black_box(&emoji)));
    });
}

criterion_group!(benches, bench_compositor);
criterion_main!(benches);
