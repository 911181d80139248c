use criterion::{Criterion, criterion_group, criterion_main};
use hidayah_qibla::{QiblaConfig, QiblaEngine, qibla_bearing};
use hidayah_types::GeoPoint;
use std::hint::black_box;

fn bench_bearing(c: &mut Criterion) {
    let origin = GeoPoint::new_unchecked(-7.8195, 110.3610);
    c.bench_function("qibla_bearing", |b| b.iter(|| qibla_bearing(black_box(origin))));
}

fn bench_heading_sample(c: &mut Criterion) {
    let engine = QiblaEngine::new(QiblaConfig::default());
    engine.set_origin(GeoPoint::new_unchecked(51.5074, -0.1278));
    let mut deg = 0.0;
    c.bench_function("on_heading_sample", |b| {
        b.iter(|| {
            deg = (deg + 1.3) % 720.0;
            engine.on_heading_sample(black_box(deg - 360.0))
        })
    });
}

criterion_group!(benches, bench_bearing, bench_heading_sample);
criterion_main!(benches);
