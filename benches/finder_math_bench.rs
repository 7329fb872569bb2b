use criterion::{Criterion, criterion_group, criterion_main};
use finder_rs::core::{
    Band, OffsetUnit, SkyPosition, StarRow, compute_alignment, format_ra_hms, project_offsets,
};
use std::hint::black_box;

fn bench_alignment(c: &mut Criterion) {
    let a = SkyPosition::new(201.365, -43.019);
    let b = SkyPosition::new(201.412, -42.987);

    c.bench_function("alignment_pair", |bench| {
        bench.iter(|| {
            let result = compute_alignment(black_box(a), black_box(b));
            let _ = result.midpoint.to_hmsdms(1);
        })
    });
}

fn bench_offset_projection_10k(c: &mut Criterion) {
    let center = SkyPosition::new(83.82, -5.39);
    let rows: Vec<StarRow> = (0..10_000)
        .map(|i| {
            let t = f64::from(i);
            let ra = 83.82 + (t * 0.618).sin() * 0.2;
            let dec = -5.39 + (t * 0.414).cos() * 0.2;
            StarRow::new(format!("star {i}"), SkyPosition::new(ra, dec))
                .with_magnitude(Band::GGaia, 8.0 + (t % 120.0) * 0.1)
        })
        .collect();

    c.bench_function("offset_projection_10k", |bench| {
        bench.iter(|| {
            let _ = project_offsets(black_box(&rows), center, OffsetUnit::Arcmin)
                .expect("projection");
        })
    });
}

fn bench_sexagesimal_format(c: &mut Criterion) {
    c.bench_function("format_ra_hms", |bench| {
        bench.iter(|| format_ra_hms(black_box(Some(359.999_987)), 2))
    });
}

criterion_group!(
    benches,
    bench_alignment,
    bench_offset_projection_10k,
    bench_sexagesimal_format
);
criterion_main!(benches);
