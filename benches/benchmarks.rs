use criterion::{black_box, criterion_group, criterion_main, Criterion};

use fm_approx::index::fm::{FMIndex, IndexConfig};
use fm_approx::index::sa;
use fm_approx::search::{self, SearchParams};
use fm_approx::util::alphabet::Alphabet;

fn make_reference(len: usize) -> Vec<u8> {
    let bases = [b'A', b'C', b'G', b'T'];
    let mut seq = Vec::with_capacity(len);
    let mut x: u32 = 42;
    for _ in 0..len {
        x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        seq.push(bases[(x >> 16) as usize % 4]);
    }
    seq
}

fn bench_build_sa(c: &mut Criterion) {
    let reference = make_reference(10_000);
    let text = Alphabet::from_text(&reference).unwrap().encode_reference(&reference);

    c.bench_function("build_sa_10k", |b| {
        b.iter(|| {
            black_box(sa::build_sa(black_box(&text)));
        })
    });
}

fn bench_backward_search(c: &mut Criterion) {
    let reference = make_reference(100_000);
    let fm = FMIndex::build(&reference, IndexConfig::dna()).unwrap();
    let pattern = reference[1000..1020].to_vec();

    c.bench_function("backward_search_20bp", |b| {
        b.iter(|| {
            black_box(fm.backward_search(black_box(&pattern)));
        })
    });
}

fn bench_mismatch_search(c: &mut Criterion) {
    let reference = make_reference(100_000);
    let fm = FMIndex::build(&reference, IndexConfig::dna()).unwrap();
    let mut pattern = reference[5000..5036].to_vec();
    pattern[10] = if pattern[10] == b'A' { b'C' } else { b'A' };
    let params = SearchParams { max_mismatches: 2, ..SearchParams::default() };

    c.bench_function("mismatch_search_36bp_k2", |b| {
        b.iter(|| {
            black_box(search::search_hits(black_box(&fm), black_box(&pattern), &params).unwrap());
        })
    });
}

criterion_group!(benches, bench_build_sa, bench_backward_search, bench_mismatch_search);
criterion_main!(benches);
