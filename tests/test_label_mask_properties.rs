use brainpaint::{project, voxel_for_click, LabelMaskModel, LabelVolume, Plane, Volume};
use ndarray::Array3;
use proptest::prelude::*;

fn label_volume() -> impl Strategy<Value = LabelVolume> {
    (1usize..5, 1usize..5, 1usize..5).prop_flat_map(|(d1, d2, d3)| {
        proptest::collection::vec(0i32..5, d1 * d2 * d3)
            .prop_map(move |codes| Array3::from_shape_vec((d1, d2, d3), codes).unwrap())
    })
}

fn model(raw: &LabelVolume) -> LabelMaskModel {
    let volume = Volume::from_raw(Array3::from_elem(raw.dim(), 1.0f32));
    LabelMaskModel::ingest(volume, Some(raw)).unwrap()
}

/// Every voxel is either in the active mask, carries another label, or is background.
fn assert_partition(model: &LabelMaskModel, raw: &LabelVolume) -> Result<(), TestCaseError> {
    let active = model.active_label();
    for (idx, code) in raw.indexed_iter() {
        let mask = model.active_mask()[idx];
        let other = model.other_labels()[idx];
        prop_assert_eq!(mask == 1, *code == active, "mask at {:?}", idx);
        let expected_other = if *code == active { 0 } else { *code };
        prop_assert_eq!(expected_other, other, "other labels at {:?}", idx);
        prop_assert!(!(mask == 1 && other != 0));
    }
    Ok(())
}

proptest! {
    #[test]
    fn export_after_ingest_reproduces_the_labels(raw in label_volume()) {
        let m = model(&raw);
        assert_partition(&m, &raw)?;
        prop_assert_eq!(m.export_label_volume(), raw);
    }

    #[test]
    fn switching_labels_never_loses_voxels(raw in label_volume(), switches in proptest::collection::vec(0i32..7, 0..8)) {
        let mut m = model(&raw);
        for label in switches {
            m.switch_active_label(label);
            prop_assert_eq!(label, m.active_label());
            prop_assert!(m.known_labels().contains(label));
            assert_partition(&m, &raw)?;
            prop_assert_eq!(m.export_label_volume(), raw.clone());
        }
        prop_assert_eq!(m.known_labels().as_slice()[0], 0);
    }

    #[test]
    fn switching_twice_to_a_label_changes_nothing(raw in label_volume(), label in 0i32..7) {
        let mut m = model(&raw);
        m.switch_active_label(label);
        let once = m.clone();
        m.switch_active_label(label);
        prop_assert_eq!(once, m);
    }

    #[test]
    fn switching_away_and_back_restores_the_mask(raw in label_volume(), first in 0i32..7, second in 0i32..7) {
        let mut m = model(&raw);
        m.switch_active_label(first);
        let mask = m.active_mask().clone();
        m.switch_active_label(second);
        m.switch_active_label(first);
        prop_assert_eq!(&mask, m.active_mask());
    }

    #[test]
    fn clicks_resolve_to_the_projected_voxel(raw in label_volume(), axis in 0usize..3) {
        let plane = Plane::ALL[axis];
        let (d1, d2, d3) = raw.dim();
        let shape = [d1, d2, d3];
        for index in 0..plane.num_slices(shape) {
            let slice = project(raw.view(), plane, index).unwrap();
            for ((x, y), code) in slice.indexed_iter() {
                let voxel = voxel_for_click(plane, index, x, y, shape).unwrap();
                prop_assert_eq!(*code, raw[voxel]);
            }
        }
    }
}
