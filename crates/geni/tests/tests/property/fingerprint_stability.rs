//! Property tests: fingerprints are stable for identical tasks and change
//! with any component.

use geni_types::{Fingerprint, Shape};
use proptest::prelude::*;

fn arb_shape() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![
        Just(Shape::Number),
        Just(Shape::String),
        Just(Shape::Boolean),
        Just(Shape::Null),
        Just(Shape::Unknown),
    ];
    leaf.prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(Shape::array),
            inner.clone().prop_map(Shape::optional),
            inner.clone().prop_map(Shape::record),
            prop::collection::vec(inner.clone(), 1..3).prop_map(|items| Shape::tuple(items)),
            prop::collection::vec(("[a-z]{1,6}", inner), 1..3)
                .prop_map(|fields| Shape::structure(fields)),
        ]
    })
}

proptest! {
    #[test]
    fn identical_tasks_share_a_fingerprint(
        description in ".{0,60}",
        inputs in prop::collection::vec(arb_shape(), 0..4),
        output in arb_shape(),
    ) {
        let a = Fingerprint::of_task(&description, &inputs, &output);
        let b = Fingerprint::of_task(&description, &inputs.clone(), &output.clone());
        prop_assert_eq!(a, b);
        prop_assert_eq!(Fingerprint::from_hex(&a.to_hex()).unwrap(), a);
    }

    #[test]
    fn output_shape_change_changes_fingerprint(
        description in ".{0,30}",
        inputs in prop::collection::vec(arb_shape(), 0..3),
        a in arb_shape(),
        b in arb_shape(),
    ) {
        prop_assume!(a.descriptor() != b.descriptor());
        prop_assert_ne!(
            Fingerprint::of_task(&description, &inputs, &a),
            Fingerprint::of_task(&description, &inputs, &b)
        );
    }

    #[test]
    fn appending_an_input_changes_fingerprint(
        description in ".{0,30}",
        inputs in prop::collection::vec(arb_shape(), 0..3),
        extra in arb_shape(),
        output in arb_shape(),
    ) {
        let mut longer = inputs.clone();
        longer.push(extra);
        prop_assert_ne!(
            Fingerprint::of_task(&description, &inputs, &output),
            Fingerprint::of_task(&description, &longer, &output)
        );
    }

    #[test]
    fn description_text_cannot_move_into_shapes(
        description in "[a-z ]{0,20}",
    ) {
        // "d" + "number" versus "dnumber" + "" must differ.
        let joined = format!("{description}number");
        prop_assert_ne!(
            Fingerprint::of_task(&description, &[Shape::Number], &Shape::Null),
            Fingerprint::of_task(&joined, &[], &Shape::Null)
        );
    }
}
