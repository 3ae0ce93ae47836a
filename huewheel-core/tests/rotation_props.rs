//! Property tests for palette rotation and click detection

use huewheel_core::input::InputController;
use huewheel_core::palette::Color;
use huewheel_core::rotation::RotationScheme;
use proptest::prelude::*;

/// Random valid scheme: (palette length, zone start, zone end, modulus)
fn scheme() -> impl Strategy<Value = RotationScheme> {
    (1usize..=32)
        .prop_flat_map(|n| (Just(n), 0..n))
        .prop_flat_map(|(n, start)| (Just(n), Just(start), start + 1..=n))
        .prop_flat_map(|(n, start, end)| (Just(n), Just(start), Just(end), 1..=end - start))
        .prop_map(|(n, start, end, k)| RotationScheme::new(n, start..end, k).unwrap())
}

fn distinct(n: usize) -> Vec<Color> {
    (0..n).map(|i| Color::rgb(i as u32 * 0x0a0b0c)).collect()
}

proptest! {
    #[test]
    fn prop_offset_stays_in_range(
        scheme in scheme(),
        start in any::<prop::sample::Index>(),
        delta in any::<i32>(),
    ) {
        let offset = start.index(scheme.modulus());
        prop_assert!(scheme.next_offset(offset, delta) < scheme.modulus());
    }

    #[test]
    fn prop_rotation_composes(
        scheme in scheme(),
        d1 in -1000i32..1000,
        d2 in -1000i32..1000,
    ) {
        let base = distinct(scheme.palette_len());
        let stepwise = scheme.rotate(&base, scheme.rotate(&base, 0, d1).offset, d2);
        let direct = scheme.rotate(&base, 0, d1 + d2);
        prop_assert_eq!(stepwise, direct);
    }

    #[test]
    fn prop_anchors_never_move(
        scheme in scheme(),
        deltas in proptest::collection::vec(-50i32..50, 0..40),
    ) {
        let base = distinct(scheme.palette_len());
        let zone = scheme.zone();
        let mut offset = 0;
        for delta in deltas {
            let rotation = scheme.rotate(&base, offset, delta);
            offset = rotation.offset;
            for (i, color) in rotation.palette.iter().enumerate() {
                if !zone.contains(&i) {
                    prop_assert_eq!(*color, base[i]);
                }
            }
        }
    }

    #[test]
    fn prop_rotation_is_a_permutation(scheme in scheme(), delta in any::<i32>()) {
        let order = scheme.order(scheme.next_offset(0, delta));
        let mut seen = vec![false; scheme.palette_len()];
        for &i in &order {
            prop_assert!(!seen[usize::from(i)]);
            seen[usize::from(i)] = true;
        }
        prop_assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn prop_one_click_per_press(presses in proptest::collection::vec(any::<bool>(), 0..200)) {
        let mut input = InputController::new();
        let clicks = presses.iter().filter(|&&p| input.update(p, 0).click).count();
        // Count released -> pressed transitions, starting released
        let mut expected = 0;
        let mut prev = false;
        for &p in &presses {
            if p && !prev {
                expected += 1;
            }
            prev = p;
        }
        prop_assert_eq!(clicks, expected);
    }
}

#[test]
fn test_hold_three_ticks_then_release() {
    let mut input = InputController::new();
    let clicks: Vec<bool> = [true, true, true, false]
        .into_iter()
        .map(|p| input.update(p, 0).click)
        .collect();
    assert_eq!(clicks, [true, false, false, false]);
}
