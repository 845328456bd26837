use approx::assert_abs_diff_eq;
use ndarray::{array, Array2};
use simplicial_complex::dummy::{house_complex, square_dot_complex, two_triangles_complex};
use simplicial_complex::{
    CanonicalOrientation, Complex, ComplexBuilder, ComplexError, ExplicitOrientation,
};

fn hollow_triangle() -> Complex {
    let mut builder = ComplexBuilder::new(2);
    builder
        .add_simplex(&[0, 1])
        .unwrap()
        .add_simplex(&[0, 2])
        .unwrap()
        .add_simplex(&[1, 2])
        .unwrap();
    builder.build().unwrap()
}

#[test]
fn house_vertex_inputs_use_edge_features() {
    let house = house_complex().unwrap();
    let inputs = house.get_inputs(0).unwrap();

    let upper = inputs.upper_index.unwrap();
    assert_eq!(upper.len(), 12);
    assert_eq!(&upper.src()[..3], &[0, 0, 1]);
    assert_eq!(&upper.dst()[..3], &[1, 4, 0]);

    // Edges in id order: (0,1) (0,4) (1,2) (1,4) (2,3) (3,4).
    let upper_features = inputs.upper_features.unwrap();
    assert_eq!(upper_features.nrows(), upper.len());
    assert_eq!(upper_features.row(0)[0], 1.0f32);
    assert_eq!(upper_features.row(1)[0], 2.0);
    assert_eq!(upper_features.row(2)[0], 1.0);

    assert!(inputs.lower_index.is_none());
    assert!(inputs.lower_features.is_none());
}

#[test]
fn house_edge_inputs_use_both_neighbor_orders() {
    let house = house_complex().unwrap();
    let inputs = house.get_inputs(1).unwrap();

    assert_eq!(inputs.x.unwrap().nrows(), 6);

    // Only the roof edges (0,1) (0,4) (1,4) are upper adjacent.
    let upper = inputs.upper_index.unwrap();
    assert_eq!(upper.len(), 6);
    assert_eq!(
        inputs.upper_features.unwrap(),
        Array2::from_elem((6, 1), 1.0f32)
    );

    let lower = inputs.lower_index.unwrap();
    let lower_features = inputs.lower_features.unwrap();
    assert_eq!(lower_features.nrows(), lower.len());
    // (0,1)~(0,4) share vertex 0, (0,1)~(1,2) and (0,1)~(1,4) share vertex 1.
    assert_eq!(lower_features.column(0).to_vec()[..3], [1.0f32, 2.0, 2.0]);
    assert_eq!(&house.shared_faces(1)[..3], &[0, 1, 1]);
}

#[test]
fn triangle_inputs_at_top_order() {
    let two = two_triangles_complex().unwrap();
    let inputs = two.get_inputs(2).unwrap();
    assert!(inputs.upper_index.is_none());
    assert!(inputs.upper_features.is_none());

    let lower = inputs.lower_index.unwrap();
    assert_eq!(lower.iter().collect::<Vec<_>>(), vec![(0, 1), (1, 0)]);
    // Both directions share edge (1,2), id 2 in (0,1) (0,2) (1,2) (1,3) (2,3).
    assert_eq!(two.shared_faces(2), &[2, 2]);
    assert_eq!(inputs.lower_features.unwrap(), array![[3.0f32], [3.0]]);
}

#[test]
fn isolated_vertex_has_no_adjacency_entries() {
    let square = square_dot_complex().unwrap();
    let upper = square.chain(0).unwrap().upper_index().unwrap();
    assert!(upper.iter().all(|(a, b)| a != 4 && b != 4));
}

#[test]
fn out_of_range_order_is_reported() {
    let house = house_complex().unwrap();
    assert!(matches!(
        house.get_inputs(5),
        Err(ComplexError::UnsupportedOrder { order: 5, .. })
    ));
    assert!(matches!(
        house.get_labels(Some(3)),
        Err(ComplexError::UnsupportedOrder { order: 3, .. })
    ));
}

#[test]
fn cbor_round_trip_rederives_tables() {
    let house = house_complex().unwrap();
    let mut bytes = Vec::new();
    ciborium::into_writer(&house, &mut bytes).unwrap();
    let restored: Complex = ciborium::from_reader(bytes.as_slice()).unwrap();

    assert_eq!(restored.consolidation(), house.consolidation());
    assert_eq!(
        restored.get_inputs(1).unwrap().lower_features,
        house.get_inputs(1).unwrap().lower_features
    );
}

#[test]
fn vertex_laplacian_is_graph_laplacian() {
    let mut builder = ComplexBuilder::new(1);
    builder
        .add_simplex(&[0, 1])
        .unwrap()
        .add_simplex(&[1, 2])
        .unwrap();
    let path = builder.build().unwrap();
    let oriented = path.chain(0).unwrap().orient(&CanonicalOrientation).unwrap();
    let expected = array![[1.0f32, -1.0, 0.0], [-1.0, 2.0, -1.0], [0.0, -1.0, 1.0]];
    assert_abs_diff_eq!(oriented.hodge_laplacian(), &expected);
}

#[test]
fn filled_triangle_edge_laplacian_is_diagonal() {
    let mut builder = ComplexBuilder::new(2);
    builder.add_simplex(&[0, 1, 2]).unwrap();
    let triangle = builder.build().unwrap();
    let oriented = triangle
        .chain(1)
        .unwrap()
        .orient(&CanonicalOrientation)
        .unwrap();
    assert_abs_diff_eq!(oriented.hodge_laplacian(), &(Array2::<f32>::eye(3) * 3.0));
}

#[test]
fn hollow_triangle_edge_laplacian() {
    let hollow = hollow_triangle();
    let oriented = hollow
        .chain(1)
        .unwrap()
        .orient(&CanonicalOrientation)
        .unwrap();
    let expected = array![[2.0f32, 1.0, -1.0], [1.0, 2.0, 1.0], [-1.0, 1.0, 2.0]];
    assert_abs_diff_eq!(oriented.hodge_laplacian(), &expected);
    assert!(oriented.upper_orientation().is_empty());
    assert_eq!(oriented.lower_orientation().len(), 6);
}

#[test]
fn flipping_an_edge_flips_its_couplings() {
    let hollow = hollow_triangle();
    let flip = ExplicitOrientation::new(vec![-1.0, 1.0, 1.0]).unwrap();
    let oriented = hollow.chain(1).unwrap().orient(&flip).unwrap();
    let expected = array![[2.0f32, -1.0, 1.0], [-1.0, 2.0, 1.0], [1.0, 1.0, 2.0]];
    assert_abs_diff_eq!(oriented.hodge_laplacian(), &expected);
}

#[test]
fn laplacian_is_cached() {
    let house = house_complex().unwrap();
    let oriented = house
        .chain(1)
        .unwrap()
        .orient(&CanonicalOrientation)
        .unwrap();
    let first = oriented.hodge_laplacian() as *const Array2<f32>;
    let second = oriented.hodge_laplacian() as *const Array2<f32>;
    assert_eq!(first, second);
}
