use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use shardkey::{Base62Ext, ProcessClock, ShardedId, SystemClock};
use std::time::SystemTime;

// Number of IDs generated per benchmark iteration.
const TOTAL_IDS: usize = 4096;

fn bench_next_id(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_clock");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        let clock = ProcessClock::new(1, SystemClock);
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                let id = clock
                    .try_next_id(1, SystemTime::now())
                    .expect("generation cannot fail");
                black_box(id);
            }
        });
    });

    group.finish();
}

fn bench_base62(c: &mut Criterion) {
    let mut group = c.benchmark_group("base62");
    group.throughput(Throughput::Elements(1));

    let id = ShardedId::from_raw(0x0123_4567_89AB_CDEF_0123_4567_89AB_CDEF);
    let encoded = id.encode();

    group.bench_function("encode", |b| {
        b.iter(|| {
            let mut buf = [0u8; 22];
            black_box(id).encode_to_buf(&mut buf);
            black_box(buf);
        });
    });

    group.bench_function("decode", |b| {
        b.iter(|| {
            let decoded = ShardedId::decode(black_box(&encoded)).expect("valid input");
            black_box(decoded);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_next_id, bench_base62);
criterion_main!(benches);
