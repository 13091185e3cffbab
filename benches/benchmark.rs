use criterion::{criterion_group, criterion_main, Criterion};
use mldsa::traits::{Signer, Verifier};
use mldsa::{ml_dsa_44, ml_dsa_65, ml_dsa_87};


pub fn criterion_benchmark(c: &mut Criterion) {
    let message = [0u8, 1, 2, 3, 4, 5, 6, 7];
    let seed = [0x2Au8; 32];
    let rnd = [0u8; 32];

    let (pk44, sk44) = ml_dsa_44::keygen_from_seed(&seed);
    let sig44 = sk44.try_sign_with_rnd(&message, &[], &rnd).unwrap();

    let (pk65, sk65) = ml_dsa_65::keygen_from_seed(&seed);
    let sig65 = sk65.try_sign_with_rnd(&message, &[], &rnd).unwrap();

    let (pk87, sk87) = ml_dsa_87::keygen_from_seed(&seed);
    let sig87 = sk87.try_sign_with_rnd(&message, &[], &rnd).unwrap();

    c.bench_function("ml_dsa_44 keygen", |b| b.iter(|| ml_dsa_44::keygen_from_seed(&seed)));
    c.bench_function("ml_dsa_65 keygen", |b| b.iter(|| ml_dsa_65::keygen_from_seed(&seed)));
    c.bench_function("ml_dsa_87 keygen", |b| b.iter(|| ml_dsa_87::keygen_from_seed(&seed)));

    c.bench_function("ml_dsa_44 sign", |b| b.iter(|| sk44.try_sign_with_rnd(&message, &[], &rnd)));
    c.bench_function("ml_dsa_65 sign", |b| b.iter(|| sk65.try_sign_with_rnd(&message, &[], &rnd)));
    c.bench_function("ml_dsa_87 sign", |b| b.iter(|| sk87.try_sign_with_rnd(&message, &[], &rnd)));

    c.bench_function("ml_dsa_44 verify", |b| b.iter(|| pk44.verify(&message, &sig44, &[])));
    c.bench_function("ml_dsa_65 verify", |b| b.iter(|| pk65.verify(&message, &sig65, &[])));
    c.bench_function("ml_dsa_87 verify", |b| b.iter(|| pk87.verify(&message, &sig87, &[])));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
