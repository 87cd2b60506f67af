use bnd2_tools::{Bundle, ImportEntry, Platform, ResourceEntry, load_bundle, save_bundle};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// A few hundred resources with semi-compressible payloads that import their neighbours
fn synthetic_bundle(compressed: bool) -> Bundle {
    let mut bundle = Bundle::new(Platform::Pc);
    bundle.compressed = compressed;

    for id in 0..256_u64 {
        let mut entry = ResourceEntry::new(id * 0x10, (id % 7) as u32);
        entry.streams[0] = (0..4096).map(|i| ((i * id as usize) % 251) as u8).collect();
        if id % 3 == 0 {
            entry.streams[1] = vec![id as u8; 16 * 1024];
        }
        entry.import_entries = (1..4)
            .map(|n| ImportEntry {
                target_id: ((id + n) % 300) * 0x10,
                patch_offset: n as u32 * 8,
            })
            .collect();
        bundle.add_resource_entry(entry).expect("Ids are unique");
    }

    bundle
}

fn codec_benchmark(c: &mut Criterion) {
    for compressed in [false, true] {
        let bundle = synthetic_bundle(compressed);
        let bytes = save_bundle(&bundle).expect("Failed to save bundle");
        let suffix = if compressed { "compressed" } else { "raw" };

        c.bench_function(format!("save_{suffix}").as_str(), |b| {
            b.iter(|| save_bundle(black_box(&bundle)).expect("Failed to save bundle"))
        });
        c.bench_function(format!("load_{suffix}").as_str(), |b| {
            b.iter(|| load_bundle(black_box(&bytes)).expect("Failed to load bundle"))
        });
    }
}

fn missing_imports_benchmark(c: &mut Criterion) {
    let bundle = synthetic_bundle(false);
    c.bench_function("missing_imports", |b| {
        b.iter(|| black_box(&bundle).get_missing_imports(&[]))
    });
}

criterion_group!(benches, codec_benchmark, missing_imports_benchmark);
criterion_main!(benches);
