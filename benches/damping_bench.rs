use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::DVec3;
use orbitcam::camera::{Camera, TriangleMesh};
use orbitcam::controls::CameraControls;
use orbitcam::options::ControlsOptions;
use orbitcam::util::damping::{smooth_damp, smooth_damp_vec3};

const DT: f64 = 1.0 / 60.0;

fn smooth_damp_benchmark(c: &mut Criterion) {
    c.bench_function("smooth_damp_scalar", |b| {
        let mut velocity = 0.0;
        b.iter(|| {
            black_box(smooth_damp(
                black_box(0.0),
                black_box(10.0),
                &mut velocity,
                0.25,
                f64::INFINITY,
                DT,
            ))
        });
    });

    c.bench_function("smooth_damp_vec3", |b| {
        let mut velocity = DVec3::ZERO;
        b.iter(|| {
            black_box(smooth_damp_vec3(
                black_box(DVec3::ZERO),
                black_box(DVec3::new(3.0, -2.0, 7.0)),
                &mut velocity,
                0.25,
                f64::INFINITY,
                DT,
            ))
        });
    });
}

fn controller_tick_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("controller_tick");

    group.bench_function("moving", |b| {
        let mut controls = CameraControls::new(Camera::default(), ControlsOptions::default());
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            let azimuth = if flip { 1.0 } else { -1.0 };
            let _ = controls.rotate_to(azimuth, 1.0, true);
            black_box(controls.update(DT))
        });
    });

    for triangles in [2_u32, 200, 2000] {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        for i in 0..triangles {
            let x = f64::from(i) * 0.01;
            let base = i * 3;
            vertices.extend([
                DVec3::new(x, -1.0, -2.0),
                DVec3::new(x + 0.01, -1.0, -2.0),
                DVec3::new(x, 1.0, -2.0),
            ]);
            indices.push([base, base + 1, base + 2]);
        }
        let mut controls = CameraControls::new(Camera::default(), ControlsOptions::default());
        controls.add_collider(Box::new(TriangleMesh::new(vertices, indices)));

        group.bench_function(format!("{triangles}_collider_triangles"), |b| {
            let mut flip = false;
            b.iter(|| {
                flip = !flip;
                let distance = if flip { 4.0 } else { 6.0 };
                let _ = controls.dolly_to(distance, true);
                black_box(controls.update(DT))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, smooth_damp_benchmark, controller_tick_benchmark);
criterion_main!(benches);
