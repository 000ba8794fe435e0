use criterion::{black_box, criterion_group, criterion_main, Criterion};

use plane_geom::basics::PathIterator;
use plane_geom::flatten::FlatteningPathIterator;
use plane_geom::general_path::GeneralPath;

fn wavy_path() -> GeneralPath {
    let mut path = GeneralPath::new();
    path.move_to(0.0, 0.0);
    for i in 0..16 {
        let x = i as f64 * 10.0;
        path.curve_to(x + 3.0, 40.0, x + 7.0, -40.0, x + 10.0, 0.0)
            .expect("path has an initial move_to");
    }
    path
}

fn drain<I: PathIterator>(mut it: I) -> usize {
    let mut coords = [0.0f64; 6];
    let mut n = 0;
    while !it.is_done() {
        it.current_segment(&mut coords).expect("iterator not done");
        n += 1;
        it.next();
    }
    n
}

fn bench_flatten(c: &mut Criterion) {
    let path = wavy_path();

    c.bench_function("flatten_coarse", |b| {
        b.iter(|| {
            let it = FlatteningPathIterator::new(path.path_iter(None), black_box(1.0))
                .expect("non-negative flatness");
            drain(it)
        })
    });

    c.bench_function("flatten_fine", |b| {
        b.iter(|| {
            let it = FlatteningPathIterator::new(path.path_iter(None), black_box(0.01))
                .expect("non-negative flatness");
            drain(it)
        })
    });
}

criterion_group!(benches, bench_flatten);
criterion_main!(benches);
