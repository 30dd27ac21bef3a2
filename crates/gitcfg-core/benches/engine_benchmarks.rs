use criterion::{Criterion, black_box, criterion_group, criterion_main};
use gitcfg_core::{CategoryRegistry, RawEntry, Scope, ScopeMap, assemble, normalize, resolve};

fn raw_entries(keys: usize) -> Vec<RawEntry> {
    let mut raw = Vec::with_capacity(keys * 3);
    for scope in Scope::ALL {
        for i in 0..keys {
            let key = match i % 4 {
                0 => format!("user.key{i}"),
                1 => format!("remote.r{i}.url"),
                2 => format!("alias.a{i}"),
                _ => format!("misc.k{i}"),
            };
            raw.push(RawEntry::new(key, format!("{scope}-{i}"), scope, format!("/{scope}")));
        }
    }
    raw
}

fn pipeline_benchmark(c: &mut Criterion) {
    let registry = CategoryRegistry::with_builtins().unwrap();
    let raw = raw_entries(1_000);
    let scopes = ScopeMap::new();

    c.bench_function("normalize (3000 entries)", |b| {
        b.iter(|| normalize(black_box(raw.clone()), &scopes, &registry))
    });

    let normalized = normalize(raw.clone(), &scopes, &registry);
    c.bench_function("resolve (3000 entries)", |b| {
        b.iter(|| {
            let mut entries = normalized.entries.clone();
            resolve(black_box(&mut entries))
        })
    });

    c.bench_function("pipeline (3000 entries)", |b| {
        b.iter(|| {
            let mut entries = normalize(black_box(raw.clone()), &scopes, &registry).entries;
            let effective = resolve(&mut entries);
            assemble(scopes.clone(), entries, effective).unwrap()
        })
    });
}

fn classify_benchmark(c: &mut Criterion) {
    let registry = CategoryRegistry::with_builtins().unwrap();
    c.bench_function("classify", |b| {
        b.iter(|| {
            registry.classify(black_box("user.email"));
            registry.classify(black_box("remote.origin.url"));
            registry.classify(black_box("pull.rebase"));
        })
    });
}

criterion_group!(benches, pipeline_benchmark, classify_benchmark);
criterion_main!(benches);
