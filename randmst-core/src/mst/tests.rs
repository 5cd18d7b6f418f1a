//! Unit and property tests for the Prim driver.

use proptest::prelude::*;
use rand::{SeedableRng, rngs::SmallRng};
use rstest::rstest;

use crate::{Dimension, DistanceOracle, Instance};

use super::{
    MstError, MstErrorCode, RelaxationPolicy, SENTINEL_DISTANCE, SpanningTree, prim_spanning_tree,
};

const TOLERANCE: f64 = 1e-9;

/// Fixed symmetric weights for hand-built graphs.
struct Matrix(Vec<Vec<f64>>);

impl DistanceOracle for Matrix {
    fn vertex_count(&self) -> usize {
        self.0.len()
    }

    fn distance(&mut self, left: usize, right: usize) -> f64 {
        self.0[left][right]
    }
}

fn tree_for(points: &[Vec<f64>], dimension: Dimension, policy: RelaxationPolicy) -> SpanningTree {
    let instance = Instance::from_points(dimension, points).expect("valid points");
    let mut rng = SmallRng::seed_from_u64(0);
    prim_spanning_tree(&mut instance.oracle(&mut rng), policy).expect("MST must succeed")
}

/// Textbook dense Prim over a precomputed matrix, used as a reference.
fn reference_weight(table: &[Vec<f64>]) -> f64 {
    let count = table.len();
    let mut in_tree = vec![false; count];
    let mut best = vec![f64::INFINITY; count];
    best[0] = 0.0;
    let mut total = 0.0;
    for _ in 0..count {
        let next = (0..count)
            .filter(|v| !in_tree[*v])
            .min_by(|a, b| best[*a].total_cmp(&best[*b]))
            .expect("an unvisited vertex remains");
        in_tree[next] = true;
        total += best[next];
        for v in 0..count {
            if !in_tree[v] && table[next][v] < best[v] {
                best[v] = table[next][v];
            }
        }
    }
    total
}

#[test]
fn rejects_empty_graph() {
    let err = prim_spanning_tree(&mut Matrix(Vec::new()), RelaxationPolicy::Rebuild)
        .expect_err("empty graph must fail");
    assert_eq!(err, MstError::EmptyGraph);
    assert_eq!(err.code(), MstErrorCode::EmptyGraph);
    assert_eq!(err.code().as_str(), "EMPTY_GRAPH");
}

#[rstest]
#[case::random_weight(Dimension::RandomWeight)]
#[case::one(Dimension::One)]
#[case::four(Dimension::Four)]
fn single_vertex_weighs_nothing(#[case] dimension: Dimension) {
    let mut rng = SmallRng::seed_from_u64(5);
    let instance = Instance::generate(1, dimension, &mut rng).expect("valid instance");
    let tree = prim_spanning_tree(&mut instance.oracle(&mut rng), RelaxationPolicy::Rebuild)
        .expect("MST must succeed");
    assert_eq!(tree.total_weight(), 0.0);
    assert_eq!(tree.vertex_count(), 1);
    assert_eq!(tree.parent(0), None);
    assert_eq!(tree.edges().count(), 0);
    assert!(tree.is_spanning_tree());
}

#[rstest]
#[case::rebuild(RelaxationPolicy::Rebuild)]
#[case::sift_up(RelaxationPolicy::SiftUp)]
fn sorted_line_connects_consecutive_points(#[case] policy: RelaxationPolicy) {
    let tree = tree_for(
        &[vec![0.0], vec![0.1], vec![0.5], vec![0.9]],
        Dimension::One,
        policy,
    );
    assert!((tree.total_weight() - 0.9).abs() < TOLERANCE);
    assert_eq!(tree.parent(1), Some(0));
    assert_eq!(tree.parent(2), Some(1));
    assert_eq!(tree.parent(3), Some(2));
    assert_eq!(tree.extraction_order(), &[0, 1, 2, 3]);
}

#[rstest]
#[case::one(Dimension::One, vec![vec![0.1], vec![0.47]])]
#[case::two(Dimension::Two, vec![vec![0.0, 0.0], vec![0.37, 0.0]])]
#[case::three(Dimension::Three, vec![vec![0.2, 0.2, 0.2], vec![0.2, 0.57, 0.2]])]
#[case::four(Dimension::Four, vec![vec![0.5, 0.5, 0.5, 0.13], vec![0.5, 0.5, 0.5, 0.5]])]
fn two_points_weigh_their_distance(#[case] dimension: Dimension, #[case] points: Vec<Vec<f64>>) {
    let tree = tree_for(&points, dimension, RelaxationPolicy::Rebuild);
    assert!((tree.total_weight() - 0.37).abs() < TOLERANCE);
    assert_eq!(tree.parent(1), Some(0));
}

#[test]
fn prefers_cheaper_edge_discovered_later() {
    // Vertex 2 is far from 0 but close to 1.
    let mut graph = Matrix(vec![
        vec![0.0, 0.2, 1.5],
        vec![0.2, 0.0, 0.3],
        vec![1.5, 0.3, 0.0],
    ]);
    let tree = prim_spanning_tree(&mut graph, RelaxationPolicy::Rebuild).expect("MST must succeed");
    assert!((tree.total_weight() - 0.5).abs() < TOLERANCE);
    assert_eq!(tree.parent(2), Some(1));
    assert_eq!(tree.attachment_weight(2), Some(0.3));
}

#[test]
fn unreachable_weights_keep_sentinel_parentless() {
    // An oracle reporting weights above the sentinel never tightens a key.
    let mut graph = Matrix(vec![vec![0.0, 5.0], vec![5.0, 0.0]]);
    let tree = prim_spanning_tree(&mut graph, RelaxationPolicy::Rebuild).expect("MST must succeed");
    assert_eq!(tree.total_weight(), SENTINEL_DISTANCE);
    assert_eq!(tree.parent(1), None);
    assert!(!tree.is_spanning_tree());
}

#[test]
fn random_weight_mode_stays_below_vertex_count() {
    let mut rng = SmallRng::seed_from_u64(2024);
    for _ in 0..20 {
        let instance =
            Instance::generate(5, Dimension::RandomWeight, &mut rng).expect("valid instance");
        let tree = prim_spanning_tree(&mut instance.oracle(&mut rng), RelaxationPolicy::Rebuild)
            .expect("MST must succeed");
        assert!(tree.total_weight() >= 0.0);
        assert!(tree.total_weight() < 4.0);
        assert!(tree.is_spanning_tree());
    }
}

#[test]
fn is_spanning_tree_detects_cycles() {
    let tree = SpanningTree {
        parents: vec![None, Some(2), Some(1)],
        attachment_weights: vec![0.0, 0.1, 0.1],
        extraction_order: vec![0, 1, 2],
        total_weight: 0.2,
    };
    assert!(!tree.is_spanning_tree());
}

#[test]
fn relaxation_policy_renders_cli_names() {
    assert_eq!(RelaxationPolicy::default(), RelaxationPolicy::Rebuild);
    assert_eq!(RelaxationPolicy::Rebuild.to_string(), "rebuild");
    assert_eq!(RelaxationPolicy::SiftUp.to_string(), "sift-up");
}

fn geometric_dimension() -> impl Strategy<Value = Dimension> {
    prop_oneof![
        Just(Dimension::One),
        Just(Dimension::Two),
        Just(Dimension::Three),
        Just(Dimension::Four),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn euclidean_tree_is_structurally_sound(
        dimension in geometric_dimension(),
        vertex_count in 1_usize..48,
        seed in any::<u64>(),
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let instance = Instance::generate(vertex_count, dimension, &mut rng).expect("valid instance");
        let tree = prim_spanning_tree(&mut instance.oracle(&mut rng), RelaxationPolicy::Rebuild)
            .expect("MST must succeed");

        prop_assert!(tree.is_spanning_tree());
        prop_assert_eq!(tree.edges().count(), vertex_count - 1);

        let points = instance.points();
        let mut edge_sum = 0.0;
        for edge in tree.edges() {
            let expected = points[edge.vertex].distance_to(&points[edge.parent]);
            prop_assert!((edge.weight - expected).abs() < TOLERANCE);
            edge_sum += expected;
        }
        prop_assert!((edge_sum - tree.total_weight()).abs() < TOLERANCE);

        let bound = 2.0 * (vertex_count - 1) as f64;
        prop_assert!(tree.total_weight() >= 0.0);
        prop_assert!(tree.total_weight() <= bound);

        let table = instance.distance_table().expect("geometric instance");
        prop_assert!((tree.total_weight() - reference_weight(&table)).abs() < TOLERANCE);
    }

    #[test]
    fn policies_agree_on_euclidean_weight(
        dimension in geometric_dimension(),
        vertex_count in 1_usize..48,
        seed in any::<u64>(),
    ) {
        let instance = Instance::generate(vertex_count, dimension, &mut SmallRng::seed_from_u64(seed))
            .expect("valid instance");
        let mut rng = SmallRng::seed_from_u64(seed);
        let rebuild = prim_spanning_tree(&mut instance.oracle(&mut rng), RelaxationPolicy::Rebuild)
            .expect("MST must succeed");
        let sift = prim_spanning_tree(&mut instance.oracle(&mut rng), RelaxationPolicy::SiftUp)
            .expect("MST must succeed");
        prop_assert!(sift.is_spanning_tree());
        prop_assert!((rebuild.total_weight() - sift.total_weight()).abs() < TOLERANCE);
    }

    #[test]
    fn random_weight_tree_sums_attachment_weights(
        vertex_count in 1_usize..48,
        seed in any::<u64>(),
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let instance = Instance::generate(vertex_count, Dimension::RandomWeight, &mut rng)
            .expect("valid instance");
        let tree = prim_spanning_tree(&mut instance.oracle(&mut rng), RelaxationPolicy::Rebuild)
            .expect("MST must succeed");
        prop_assert!(tree.is_spanning_tree());
        let edge_sum: f64 = tree.edges().map(|edge| edge.weight).sum();
        prop_assert!((edge_sum - tree.total_weight()).abs() < TOLERANCE);
        prop_assert!(tree.edges().all(|edge| (0.0..1.0).contains(&edge.weight)));
    }
}
