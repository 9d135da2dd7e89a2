use criterion::{criterion_group, criterion_main, Criterion, black_box};

use hairsim::config::HairConfig;
use hairsim::generation::ScalpMesh;
use hairsim::physics::SphereCollider;
use hairsim::HairSimulation;

use glam::Vec3;

/// Regular grid scalp of `side`-squared vertices, normals up.
fn grid_scalp(side: usize) -> ScalpMesh {
    let mut vertices = Vec::with_capacity(side * side);
    for z in 0..side {
        for x in 0..side {
            vertices.push(Vec3::new(x as f32 * 0.01, 0.0, z as f32 * 0.01));
        }
    }
    let mut triangles = Vec::new();
    for z in 0..side - 1 {
        for x in 0..side - 1 {
            let i = (z * side + x) as u32;
            let s = side as u32;
            triangles.push([i, i + 1, i + s]);
            triangles.push([i + 1, i + s + 1, i + s]);
        }
    }
    ScalpMesh::new(vertices.clone(), vec![Vec3::Y; vertices.len()], triangles)
}

fn built_sim(config: HairConfig, side: usize) -> HairSimulation {
    let mut sim = HairSimulation::with_seed(config, 42).expect("valid config");
    sim.reset(grid_scalp(side)).expect("non-empty scalp");
    sim.rebuild().expect("rebuild");
    sim
}

fn bench_rebuild(c: &mut Criterion) {
    let config = HairConfig {
        density: 4,
        ..Default::default()
    };
    let scalp = grid_scalp(16);

    c.bench_function("rebuild_450_triangles", |b| {
        let mut sim = HairSimulation::with_seed(config.clone(), 42).expect("valid config");
        sim.reset(scalp.clone()).expect("non-empty scalp");
        b.iter(|| {
            black_box(sim.rebuild().expect("rebuild"));
        });
    });
}

fn bench_step(c: &mut Criterion) {
    let config = HairConfig {
        density: 2,
        gravity: Vec3::new(0.0, -0.01, 0.0),
        ..Default::default()
    };
    let mut sim = built_sim(config, 16);

    c.bench_function("step_900_strands", |b| {
        b.iter(|| {
            sim.step(black_box(0.016));
        });
    });
}

fn bench_step_self_collision(c: &mut Criterion) {
    let config = HairConfig {
        density: 2,
        gravity: Vec3::new(0.0, -0.01, 0.0),
        self_collision: true,
        ..Default::default()
    };
    let mut sim = built_sim(config, 16);

    c.bench_function("step_900_strands_self_collision", |b| {
        b.iter(|| {
            sim.step(black_box(0.016));
        });
    });
}

fn bench_step_colliders(c: &mut Criterion) {
    let config = HairConfig {
        density: 2,
        gravity: Vec3::new(0.0, -0.01, 0.0),
        ..Default::default()
    };
    let mut sim = built_sim(config, 16);
    sim.set_colliders(vec![
        SphereCollider::new(Vec3::new(0.08, -0.02, 0.08), 0.05),
        SphereCollider::new(Vec3::new(0.02, -0.02, 0.02), 0.03),
    ]);

    c.bench_function("step_900_strands_2_colliders", |b| {
        b.iter(|| {
            sim.step(black_box(0.016));
        });
    });
}

criterion_group!(
    benches,
    bench_rebuild,
    bench_step,
    bench_step_self_collision,
    bench_step_colliders
);
criterion_main!(benches);
