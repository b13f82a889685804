use criterion::{black_box, criterion_group, criterion_main, Criterion};

use orrery::{
    constants::J2000_JD, orbit::Orbit, orbital_elements::OrbitalElements,
    propagator::OrbitPropagator,
};

fn elements(eccentricity: f64) -> OrbitalElements {
    OrbitalElements {
        semi_major_axis: 2.77,
        eccentricity,
        inclination: 10.6,
        ascending_node_longitude: 80.3,
        periapsis_argument: Some(73.6),
        periapsis_longitude: None,
        mean_anomaly: 77.4,
        epoch: J2000_JD,
        period: Some(1681.6),
        mean_motion: None,
    }
}

/// 100 samples (e ≤ 0.2) and 300 samples (e > 0.2).
fn bench_sample_orbit_path(c: &mut Criterion) {
    for e in [0.08, 0.5] {
        let propagator = OrbitPropagator::new("bench", elements(e)).unwrap();
        c.bench_function(&format!("sample_orbit_path/e={e}"), |b| {
            b.iter(|| black_box(propagator.sample_orbit_path().unwrap()))
        });
    }
}

/// One frame worth of position updates for a belt of 1000 orbits.
fn bench_frame_update(c: &mut Criterion) {
    let mut belt: Vec<Orbit> = (0..1000)
        .map(|k| {
            let mut el = elements(0.05 + 0.0004 * k as f64);
            el.mean_anomaly = k as f64 * 0.36;
            Orbit::new(format!("belt {k}"), el).unwrap()
        })
        .collect();

    c.bench_function("position_or_last_known/1000_orbits", |b| {
        let mut time = J2000_JD;
        b.iter(|| {
            time += 0.5;
            for orbit in belt.iter_mut() {
                black_box(orbit.position_or_last_known(black_box(time)).ok());
            }
        })
    });
}

criterion_group!(benches, bench_sample_orbit_path, bench_frame_update);
criterion_main!(benches);
