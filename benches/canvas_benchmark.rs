//! Canvas benchmark: Measure cell writes, drawing primitives and transforms.
//!
//! Target: < 50µs for a full 200×50 text fill

use cellgfx::{AnsiColor, Canvas, ExportFormat};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Create a canvas with random-ish coloured text.
fn create_test_canvas(width: u32, height: u32, seed: u32) -> Canvas {
    let mut canvas = Canvas::new(width, height).unwrap();
    for y in 0..height {
        for x in 0..width {
            let c = (x + y + seed) % 26 + 65; // A-Z
            let fg = AnsiColor::from_index(((x * 3 + seed) % 16) as u8).unwrap();
            let bg = AnsiColor::from_index(((y * 7 + seed) % 8) as u8).unwrap();
            canvas.set_color_ansi(fg, bg);
            canvas.put_char(x as i32, y as i32, c);
        }
    }
    canvas
}

fn put_str_rows(c: &mut Criterion) {
    let mut canvas = Canvas::new(200, 50).unwrap();
    let line = "The quick brown fox jumps over the lazy dog. ".repeat(5);

    c.bench_function("put_str_200x50", |b| {
        b.iter(|| {
            for y in 0..50 {
                black_box(canvas.put_str(0, y, black_box(&line)));
            }
        });
    });

    let wide = "日本語のテキスト".repeat(13);
    c.bench_function("put_str_200x50_fullwidth", |b| {
        b.iter(|| {
            for y in 0..50 {
                black_box(canvas.put_str(0, y, black_box(&wide)));
            }
        });
    });
}

fn drawing_primitives(c: &mut Criterion) {
    let mut canvas = Canvas::new(200, 50).unwrap();

    c.bench_function("draw_line_diagonal", |b| {
        b.iter(|| canvas.draw_line(black_box(-10), 0, black_box(210), 49, '#'));
    });

    c.bench_function("fill_ellipse_r20", |b| {
        b.iter(|| canvas.fill_ellipse(100, 25, black_box(60), black_box(20), '@'));
    });

    c.bench_function("fill_triangle", |b| {
        b.iter(|| canvas.fill_triangle(black_box([(0, 0), (199, 10), (40, 49)]), '%'));
    });

    c.bench_function("draw_cp437_box", |b| {
        b.iter(|| canvas.draw_cp437_box(black_box(2), 2, 196, 46));
    });
}

fn transforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");

    for (width, height) in [(80, 24), (200, 50)] {
        let mut canvas = create_test_canvas(width, height, 3);
        let label = format!("{width}x{height}");

        group.bench_function(BenchmarkId::new("flip", &label), |b| {
            b.iter(|| canvas.flip());
        });
        group.bench_function(BenchmarkId::new("rotate_180", &label), |b| {
            b.iter(|| canvas.rotate_180());
        });
        group.bench_function(BenchmarkId::new("rotate_left", &label), |b| {
            b.iter(|| {
                let mut copy = canvas.clone();
                copy.rotate_left().unwrap();
                black_box(copy)
            });
        });
    }

    group.finish();
}

fn blit_and_export(c: &mut Criterion) {
    let src = create_test_canvas(80, 24, 1);
    let mut dst = Canvas::new(200, 50).unwrap();

    c.bench_function("blit_80x24", |b| {
        b.iter(|| dst.blit(black_box(60), black_box(13), &src, None).unwrap());
    });

    let canvas = create_test_canvas(200, 50, 7);
    c.bench_function("export_utf8_200x50", |b| {
        b.iter(|| black_box(canvas.export(ExportFormat::Utf8)));
    });
}

criterion_group!(
    benches,
    put_str_rows,
    drawing_primitives,
    transforms,
    blit_and_export,
);
criterion_main!(benches);
