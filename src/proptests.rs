use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};

fn validate_tree(t: &RadixTree) {
    let issues = t.verify_integrity();
    assert!(issues.is_empty(), "integrity issues: {issues:#?}");
}

fn reference_sorted<K: Ord + Copy>(values: &[K]) -> Vec<K> {
    let mut expected = values.to_vec();
    expected.sort_unstable();
    expected
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    Sort(#[proptest(strategy = "prop::collection::vec(0u32..4096, 0..300)")] Vec<u32>),
    SortClustered(#[proptest(strategy = "prop::collection::vec(4000u32..4096, 0..100)")] Vec<u32>),
    Reject(#[proptest(strategy = "prop::collection::vec(0u32..8192, 1..50)")] Vec<u32>),
}

fn width_strategy() -> impl Strategy<Value = usize> {
    prop_oneof![
        Just(2usize),
        Just(3usize),
        Just(4usize),
        Just(10usize),
        Just(16usize),
        Just(128usize),
        2usize..300,
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_one_shot_matches_sort_unstable(
        values in prop::collection::vec(any::<u32>(), 0..500),
        width in width_strategy(),
    ) {
        let expected = reference_sorted(&values);
        let mut got = values.clone();
        sort_with(&mut got, width, Capacity::FromData).unwrap();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_one_shot_small_domain_u16(
        values in prop::collection::vec(0u16..64, 0..500),
        width in width_strategy(),
        mode in prop_oneof![Just(0u64), Just(1u64), 64u64..100_000],
    ) {
        let expected = reference_sorted(&values);
        let mut got = values.clone();
        sort_with(&mut got, width, Capacity::from_mode(mode)).unwrap();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_lazy_tree_stays_consistent(
        values in prop::collection::vec(0u64..1024, 0..200),
        width in width_strategy(),
    ) {
        let mut t = RadixTree::new(Geometry::new(1024, width).unwrap());
        t.insert_all(&values).unwrap();
        validate_tree(&t);
        prop_assert_eq!(t.len(), values.len());

        let mut out = vec![0u64; values.len()];
        prop_assert_eq!(t.drain_into(&mut out), values.len());
        validate_tree(&t);
        prop_assert_eq!(out, reference_sorted(&values));
    }

    #[test]
    fn prop_prebuilt_engine_is_reusable(
        ops in prop::collection::vec(any::<Op>(), 1..8),
        width in prop_oneof![Just(2usize), Just(5usize), Just(16usize), Just(128usize)],
    ) {
        let mut engine = SortEngine::new();
        engine.initialize(4096, width).unwrap();

        for op in ops {
            match op {
                Op::Sort(values) | Op::SortClustered(values) => {
                    let expected = reference_sorted(&values);
                    let mut got = values.clone();
                    engine.sort_in_place(&mut got).unwrap();
                    prop_assert_eq!(got, expected);
                }
                Op::Reject(values) => {
                    let before = values.clone();
                    let mut got = values;
                    let fits = got.iter().all(|&v| v < 4096);
                    let result = engine.sort_in_place(&mut got).map(|_| ());
                    if fits {
                        prop_assert!(result.is_ok());
                        prop_assert_eq!(got, reference_sorted(&before));
                    } else {
                        let is_range_error = matches!(result, Err(SortError::ValueOutOfRange { .. }));
                        prop_assert!(is_range_error);
                        prop_assert_eq!(got, before);
                    }
                }
            }

            let tree = engine.prebuilt().unwrap().tree();
            prop_assert!(tree.is_empty());
        }

        validate_tree(engine.prebuilt().unwrap().tree());
    }
}

#[test]
fn shuffled_sequence_round_trips_through_both_modes() {
    let correct: Vec<u32> = (1..100_000).collect();
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut shuffled = correct.clone();
    shuffled.shuffle(&mut rng);

    let mut engine = SortEngine::new();
    engine.initialize(100_000, 128).unwrap();
    assert_eq!(engine.capacity(), Some(1 << 17));

    let mut nums = shuffled.clone();
    engine.sort_in_place(&mut nums).unwrap();
    assert_eq!(nums, correct);

    let mut nums = shuffled.clone();
    sort_with(&mut nums, 128, Capacity::FromData).unwrap();
    assert_eq!(nums, correct);

    let mut nums = shuffled;
    assert!(sort_with(&mut nums, 128, Capacity::Default).is_err());
    nums.tree_sort().unwrap();
    assert_eq!(nums, correct);
}

#[test]
fn duplicates_of_the_last_value_stay_together() {
    for width in [2usize, 3, 4, 7, 128] {
        let mut engine = SortEngine::new();
        engine.initialize(256, width).unwrap();
        let mut values = vec![255u8, 255, 0, 128, 17];
        engine.sort_in_place(&mut values).unwrap();
        assert_eq!(values, [0, 17, 128, 255, 255], "width {width}");
    }
}

#[test]
fn shuffled_small_domain_agrees_across_modes() {
    let items = [3u32, 0, 3, 1, 2];
    let mut engine = SortEngine::new();
    engine.initialize(4, 2).unwrap();

    let mut perm = items;
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        perm.shuffle(&mut rng);
        let mut a = perm;
        let mut b = perm;
        engine.sort_in_place(&mut a).unwrap();
        sort_with(&mut b, 2, Capacity::AtLeast(4)).unwrap();
        assert_eq!(a, [0, 1, 2, 3, 3]);
        assert_eq!(b, a);
    }
}
