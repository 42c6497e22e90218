use bsaes::AesKey;
use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::{RngCore, SeedableRng};

fn bench_mode(c: &mut Criterion, name: &str, key_len: usize) {
    let mut rng = rand_chacha::ChaCha8Rng::from_seed([0; 32]);
    let mut raw = vec![0u8; key_len];
    rng.fill_bytes(&mut raw);
    let key = AesKey::new(&raw);

    let mut buf = vec![0u8; 8192];
    rng.fill_bytes(&mut buf);
    let mut out = vec![0u8; buf.len()];

    let mut group = c.benchmark_group(name);
    group.throughput(Throughput::Bytes(buf.len() as u64));

    group.bench_function("cbc_encrypt", |b| {
        let mut iv = [0u8; 16];
        b.iter(|| key.cbc_encrypt(black_box(&buf), &mut out, &mut iv));
    });
    group.bench_function("cbc_decrypt", |b| {
        let mut iv = [0u8; 16];
        b.iter(|| key.cbc_decrypt(black_box(&buf), &mut out, &mut iv));
    });
    group.bench_function("xts_encrypt", |b| {
        let mut tweak = [1u8; 16];
        b.iter(|| key.xts_encrypt(black_box(&buf), &mut out, &mut tweak));
    });
    group.bench_function("xts_decrypt", |b| {
        let mut tweak = [1u8; 16];
        b.iter(|| key.xts_decrypt(black_box(&buf), &mut out, &mut tweak));
    });
    group.bench_function("ccm_encrypt", |b| {
        let mut state = [2u8; 32];
        b.iter(|| key.ccm_encrypt(black_box(&buf), &mut out, &mut state));
    });
    group.bench_function("cbc_mac_update", |b| {
        let mut auth = [0u8; 16];
        b.iter(|| key.cbc_mac_update(black_box(&buf), &mut auth));
    });
    group.finish();
}

fn bsaes_benchmark(c: &mut Criterion) {
    bench_mode(c, "AES-128", 16);
    bench_mode(c, "AES-256", 32);
}

criterion_group!(benches, bsaes_benchmark);
criterion_main!(benches);
