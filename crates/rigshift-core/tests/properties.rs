use proptest::prelude::*;

use rigshift_core::storage::{self, CONFIG_SLOT};
use rigshift_core::{
    check_compatibility, export, BuildState, ComponentCategory, MemorySlotStore, SlotStore, TutorialResponse,
    TutorialStep,
};

fn category() -> impl Strategy<Value = ComponentCategory> {
    prop::sample::select(ComponentCategory::ALL.to_vec())
}

/// Descriptions drawn from vocabulary the rules react to, plus noise.
fn description() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("AMD Ryzen 7 5800X".to_string()),
        Just("Intel Z-series Chipset (DDR5)".to_string()),
        Just("Intel B-series Chipset (DDR4)".to_string()),
        Just("32GB DDR5".to_string()),
        Just("16GB DDR4".to_string()),
        Just("NVIDIA GeForce RTX 4090".to_string()),
        Just("AMD Radeon RX 7900 XTX".to_string()),
        Just("650W PSU".to_string()),
        Just("1000W Gold/Platinum PSU".to_string()),
        "[A-Za-z0-9 ()/-]{1,24}",
    ]
}

fn assignments() -> impl Strategy<Value = Vec<(ComponentCategory, String)>> {
    prop::collection::vec((category(), description()), 0..12)
}

fn apply(pairs: &[(ComponentCategory, String)]) -> BuildState {
    let mut build = BuildState::new();
    for (c, d) in pairs {
        build.set_part(*c, d);
    }
    build
}

fn tutorial() -> impl Strategy<Value = TutorialResponse> {
    (
        prop::collection::vec("[ -~]{0,40}", 0..4),
        prop::collection::vec((1u32..50, "[ -~]{1,30}", "[ -~\n]{0,200}"), 0..8),
    )
        .prop_map(|(warnings, steps)| TutorialResponse {
            warnings,
            tutorial: steps
                .into_iter()
                .map(|(step, title, details)| TutorialStep { step, title, details })
                .collect(),
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_remove_after_set_clears(pairs in assignments(), c in category(), d in description()) {
        let mut build = apply(&pairs);
        build.set_part(c, &d);
        build.remove_part(c);
        prop_assert_eq!(build.get(c), None);
    }

    // The final state, not the edit order, determines the warnings.
    #[test]
    fn prop_warnings_ignore_edit_order(pairs in assignments()) {
        let forward = apply(&pairs);
        // Replaying the final value of each category in reverse order
        // reaches the same state.
        let finals: Vec<(ComponentCategory, String)> = forward
            .iter()
            .map(|(c, d)| (c, d.to_string()))
            .rev()
            .collect();
        let reversed = apply(&finals);
        prop_assert_eq!(&forward, &reversed);
        prop_assert_eq!(check_compatibility(&forward), check_compatibility(&reversed));
    }

    #[test]
    fn prop_persistence_round_trip(a in assignments(), b in assignments()) {
        let store = MemorySlotStore::new();
        let current = apply(&a);
        let new = apply(&b);
        storage::save(&store, &current, &new).unwrap();
        let (c, n) = storage::load(&store).unwrap().unwrap();
        prop_assert_eq!(c, current);
        prop_assert_eq!(n, new);
    }

    #[test]
    fn prop_garbage_slot_loads_absent(raw in "[^\\[{]{0,64}") {
        let store = MemorySlotStore::new();
        store.write(CONFIG_SLOT, &raw).unwrap();
        prop_assert!(storage::load(&store).unwrap().is_none());
        prop_assert!(!storage::has_saved(&store).unwrap());
    }

    #[test]
    fn prop_export_is_idempotent(t in tutorial()) {
        prop_assert_eq!(export::render_text(&t), export::render_text(&t));
        prop_assert_eq!(export::render_pdf(&t), export::render_pdf(&t));
    }
}
