use criterion::{black_box, criterion_group, criterion_main, Criterion};
use brainpaint::{LabelMaskModel, LabelVolume, Plane, Volume};
use ndarray::Array3;

const EDGE: usize = 128;

/// A cube of 8 labelled blocks on background.
fn blocks() -> LabelVolume {
    let mut labels = Array3::zeros((EDGE, EDGE, EDGE));
    for ((i, j, k), code) in labels.indexed_iter_mut() {
        if i % 32 > 4 {
            *code = ((i / 64) * 4 + (j / 64) * 2 + k / 64) as i32;
        }
    }
    labels
}

fn model() -> LabelMaskModel {
    let volume = Volume::from_raw(Array3::from_elem((EDGE, EDGE, EDGE), 1.0));
    LabelMaskModel::ingest(volume, Some(&blocks())).unwrap()
}

fn bench_labels(c: &mut Criterion) {
    let raw = blocks();
    c.bench_function("ingest", |b| {
        b.iter(|| {
            let volume = Volume::from_raw(Array3::from_elem((EDGE, EDGE, EDGE), 1.0));
            LabelMaskModel::ingest(volume, Some(black_box(&raw))).unwrap()
        })
    });

    let mut m = model();
    let mut label = 0;
    c.bench_function("switch_active_label", |b| {
        b.iter(|| {
            label = (label + 1) % 8;
            m.switch_active_label(black_box(label));
        })
    });

    let m = model();
    c.bench_function("export_label_volume", |b| b.iter(|| m.export_label_volume()));
    c.bench_function("slice", |b| b.iter(|| m.slice(black_box(Plane::Coronal), 64).unwrap()));
}

criterion_group!(benches, bench_labels);
criterion_main!(benches);
