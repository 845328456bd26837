use proptest::prelude::*;
use simplicial_complex::{consolidate, CanonicalOrientation, Complex, ComplexBuilder};

fn arb_complex() -> impl Strategy<Value = Complex> {
    prop::collection::vec(prop::collection::btree_set(0u32..7, 1..=3), 0..14).prop_map(
        |simplices| {
            let mut builder = ComplexBuilder::new(2);
            for nodes in simplices {
                let nodes: Vec<u32> = nodes.into_iter().collect();
                builder.add_simplex(&nodes).expect("nodes are distinct");
            }
            for order in 0..=2 {
                let n = builder.num_simplices(order);
                builder
                    .features(order, simplicial_complex::dummy::ramp_features(n))
                    .expect("order in range");
            }
            builder.build().expect("builder output consolidates")
        },
    )
}

proptest! {
    #[test]
    fn consolidation_is_idempotent(complex in arb_complex()) {
        let again = consolidate(complex.chains()).unwrap();
        prop_assert_eq!(&again, complex.consolidation());
        prop_assert_eq!(consolidate(complex.chains()).unwrap(), again);
    }

    #[test]
    fn neighbor_features_align_with_edges(complex in arb_complex()) {
        for order in complex.min_order()..=complex.max_order() {
            let inputs = complex.get_inputs(order).unwrap();
            if let (Some(index), Some(features)) = (inputs.upper_index, &inputs.upper_features) {
                prop_assert_eq!(features.nrows(), index.len());
                prop_assert_eq!(complex.shared_cofaces(order).len(), index.len());
            }
            if let (Some(index), Some(features)) = (inputs.lower_index, &inputs.lower_features) {
                prop_assert_eq!(features.nrows(), index.len());
                prop_assert_eq!(complex.shared_faces(order).len(), index.len());
            }
        }
    }

    #[test]
    fn shared_faces_are_intersections(complex in arb_complex()) {
        for order in 1..=complex.max_order() {
            let chain = complex.chain(order).unwrap();
            let faces = complex.chain(order - 1).unwrap();
            let Some(lower) = chain.lower_index() else { continue };
            for ((a, b), face) in lower.iter().zip(complex.shared_faces(order)) {
                let expected = chain.key(a).unwrap().intersection(chain.key(b).unwrap());
                prop_assert_eq!(faces.key(*face).unwrap(), &expected);
            }
        }
    }

    #[test]
    fn shared_cofaces_contain_both_endpoints(complex in arb_complex()) {
        for order in 0..complex.max_order() {
            let chain = complex.chain(order).unwrap();
            let cofaces = complex.chain(order + 1).unwrap();
            let Some(upper) = chain.upper_index() else { continue };
            for ((a, b), coface) in upper.iter().zip(complex.shared_cofaces(order)) {
                let expected = chain.key(a).unwrap().union(chain.key(b).unwrap());
                prop_assert_eq!(cofaces.key(*coface).unwrap(), &expected);
            }
        }
    }

    #[test]
    fn hodge_laplacian_is_symmetric(complex in arb_complex()) {
        for chain in complex.chains() {
            let oriented = chain.orient(&CanonicalOrientation).unwrap();
            let laplacian = oriented.hodge_laplacian();
            prop_assert_eq!(laplacian, &laplacian.t().to_owned());
        }
    }

    #[test]
    fn vertex_laplacian_rows_sum_to_zero(complex in arb_complex()) {
        let oriented = complex.chain(0).unwrap().orient(&CanonicalOrientation).unwrap();
        for row in oriented.hodge_laplacian().rows() {
            prop_assert_eq!(row.sum(), 0.0);
        }
    }
}
