use criterion::{criterion_group, Criterion};
use rand::prelude::*;
use rand::rngs::SmallRng;

use glint::camera::Camera;
use glint::vec3::Vec3;
use glint::*;

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("scene/10x10x4", |b| {
        const NX: usize = 10;
        const NY: usize = 10;
        const NS: usize = 4;

        let mut rng = SmallRng::seed_from_u64(0xDEADBEEF);
        let scene = random_scene(&mut rng);

        let camera = Camera::look(
            Vec3(13., 2., 3.),
            Vec3(0., 0., 0.),
            Vec3(0., 1., 0.),
            20.,
            NX as f64 / NY as f64,
            NS,
        );
        let cancel = CancelToken::new();

        b.iter(|| cast(NX, NY, &camera, &scene, 10, &cancel, &mut rng));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion::criterion_main!(benches);
