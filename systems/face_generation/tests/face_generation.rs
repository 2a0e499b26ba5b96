use lineup_core::{AssetHandle, FaceConfiguration, FeatureSlot, Seed};
use lineup_system_face_generation::{generate_face, randomize_feature, FeatureTables};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const SAMPLE_SEEDS: [i32; 6] = [0, 1, -1, 42, i32::MIN, i32::MAX];

#[test]
fn same_seed_yields_identical_faces() {
    let tables = FeatureTables::numbered(6, 4);
    for value in SAMPLE_SEEDS {
        let seed = Seed::new(value);
        assert_eq!(
            generate_face(&tables, seed),
            generate_face(&tables, seed),
            "seed {value} produced diverging faces"
        );
    }
}

#[test]
fn mandatory_slots_always_select_from_pool() {
    let tables = FeatureTables::numbered(5, 0);
    for value in -200..200 {
        let face = generate_face(&tables, Seed::new(value));
        for slot in FeatureSlot::ALL {
            if slot.blank_probability().is_some() {
                continue;
            }
            let asset = face
                .get(slot)
                .unwrap_or_else(|| panic!("{} blank for seed {value}", slot.label()));
            assert!(tables.pool(slot).contains(&asset));
        }
    }
}

#[test]
fn optional_slots_blank_at_roughly_their_probability() {
    let tables = FeatureTables::numbered(5, 0);
    let samples = 4_000;
    let mut blanks = [0_u32; 9];
    for value in 0..samples {
        let face = generate_face(&tables, Seed::new(value));
        for (slot, asset) in face.iter() {
            if asset.is_none() {
                blanks[slot.index()] += 1;
            }
        }
    }

    for slot in FeatureSlot::ALL {
        let observed = blanks[slot.index()] as f32 / samples as f32;
        match slot.blank_probability() {
            Some(expected) => assert!(
                (observed - expected).abs() < 0.05,
                "{} blank rate {observed} far from {expected}",
                slot.label()
            ),
            None => assert_eq!(observed, 0.0, "{} should never be blank", slot.label()),
        }
    }
}

#[test]
fn empty_pools_resolve_to_blank() {
    let tables = FeatureTables::numbered(4, 0).with_pool(FeatureSlot::Nose, Vec::new());
    for value in SAMPLE_SEEDS {
        assert_eq!(generate_face(&tables, Seed::new(value)).get(FeatureSlot::Nose), None);
    }
}

#[test]
fn generation_depends_on_pool_order() {
    let forward = FeatureTables::new().with_pool(
        FeatureSlot::Eyes,
        vec![AssetHandle::new(1), AssetHandle::new(2), AssetHandle::new(3)],
    );
    let reversed = FeatureTables::new().with_pool(
        FeatureSlot::Eyes,
        vec![AssetHandle::new(3), AssetHandle::new(2), AssetHandle::new(1)],
    );

    let differs = (0..32).any(|value| {
        let seed = Seed::new(value);
        generate_face(&forward, seed) != generate_face(&reversed, seed)
    });
    assert!(differs, "pool order must be part of the generation contract");
}

#[test]
fn randomize_feature_touches_only_the_requested_slot() {
    let tables = FeatureTables::numbered(8, 0);
    let original = generate_face(&tables, Seed::new(99));
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    for _ in 0..50 {
        let mut face = original;
        randomize_feature(&tables, &mut face, FeatureSlot::Mouth, &mut rng);
        let changed = face.differing_slots(&original);
        assert!(
            changed.is_empty() || changed == vec![FeatureSlot::Mouth],
            "unexpected slots changed: {changed:?}"
        );
        assert!(face.get(FeatureSlot::Mouth).is_some());
    }
}

#[test]
fn randomize_feature_can_blank_optional_slots() {
    let tables = FeatureTables::numbered(8, 0);
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut face = FaceConfiguration::blank();

    let blanked = (0..100).any(|_| {
        face.set(FeatureSlot::Accessory, Some(AssetHandle::new(0)));
        randomize_feature(&tables, &mut face, FeatureSlot::Accessory, &mut rng);
        face.get(FeatureSlot::Accessory).is_none()
    });
    assert!(blanked, "accessory should blank about half of the time");
}
