//! Synthetic edge-flow classification on a triangulated lattice with holes.
//!
//! The lattice is a `side x side` grid of vertices; every cell is split into
//! two triangles along its `(r, c)-(r+1, c+1)` diagonal. Two cells on the main
//! diagonal are left unfilled (no triangles, no diagonal edge), leaving two
//! holes. Each sample is a unit flow along a monotone lattice path from the
//! bottom-left to the top-right corner. Class 0 paths stay on or above the
//! main diagonal (they pass left of the holes), class 1 paths stay on or below.

use crate::config::DatasetConfig;
use crate::dataset::InMemoryComplexDataset;
use crate::generator::{ComplexGenerator, Generated};
use ndarray::{array, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use simplicial_complex::{Complex, ComplexBuilder, SimplexIndex, SimplexKey};

pub const NUM_CLASSES: usize = 2;

/// Smallest lattice side that still has two separate holes.
const MIN_SIDE: usize = 4;

pub type FlowDataset = InMemoryComplexDataset<LatticeGraph>;

pub fn load_flow_dataset(config: DatasetConfig) -> anyhow::Result<FlowDataset> {
    FlowDataset::load(config, &FlowGenerator)
}

// ============================================================================
// Lattice
// ============================================================================

/// The 1-skeleton of the lattice with vertex positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatticeGraph {
    pub side: usize,
    /// `[x, y]` = `[column, row]`, indexed by vertex id
    pub positions: Vec<[f32; 2]>,
    /// Sorted `[a, b]` with `a < b`, in edge id order
    pub edges: Vec<[u32; 2]>,
    /// `[row, column]` of each unfilled cell
    pub holes: Vec<[usize; 2]>,
}

impl LatticeGraph {
    pub fn num_nodes(&self) -> usize {
        self.positions.len()
    }
}

/// Lattice side for roughly `num_points` vertices.
pub fn lattice_side(num_points: usize) -> usize {
    let mut side = MIN_SIDE;
    while side * side < num_points {
        side += 1;
    }
    side
}

fn hole_cells(side: usize) -> [usize; 2] {
    let cells = side - 1;
    [cells / 3, 2 * cells / 3]
}

struct Lattice {
    side: usize,
    builder: ComplexBuilder,
    edge_index: SimplexIndex,
    holes: [usize; 2],
}

impl Lattice {
    fn new(side: usize) -> anyhow::Result<Self> {
        let holes = hole_cells(side);
        let mut builder = ComplexBuilder::new(2);
        for r in 0..side - 1 {
            for c in 0..side - 1 {
                let (a, b) = (vertex(side, r, c), vertex(side, r, c + 1));
                let (d, e) = (vertex(side, r + 1, c), vertex(side, r + 1, c + 1));
                if r == c && holes.contains(&r) {
                    builder
                        .add_simplex(&[a, b])?
                        .add_simplex(&[a, d])?
                        .add_simplex(&[b, e])?
                        .add_simplex(&[d, e])?;
                } else {
                    builder.add_simplex(&[a, b, e])?.add_simplex(&[a, d, e])?;
                }
            }
        }
        let edge_index = SimplexIndex::from_mapping(1, &builder.mapping(1))?;
        Ok(Self {
            side,
            builder,
            edge_index,
            holes,
        })
    }

    fn graph(&self) -> LatticeGraph {
        let positions = (0..self.side * self.side)
            .map(|v| [(v % self.side) as f32, (v / self.side) as f32])
            .collect();
        let edges = self
            .builder
            .mapping(1)
            .iter()
            .map(|key| [key.nodes()[0], key.nodes()[1]])
            .collect();
        LatticeGraph {
            side: self.side,
            positions,
            edges,
            holes: self.holes.iter().map(|&i| [i, i]).collect(),
        }
    }

    /// Random monotone path from `(0, 0)` to `(side-1, side-1)` as
    /// `(row, column)` points, never crossing the main diagonal.
    fn sample_path(&self, class: usize, rng: &mut StdRng) -> Vec<(usize, usize)> {
        let last = self.side - 1;
        let (mut r, mut c) = (0, 0);
        let mut path = vec![(0, 0)];
        while (r, c) != (last, last) {
            // Sampled above the diagonal (r >= c), mirrored for class 1.
            let mut moves = Vec::with_capacity(3);
            if r < last {
                moves.push((r + 1, c));
            }
            if c < r {
                moves.push((r, c + 1));
            }
            if r < last && c < r {
                moves.push((r + 1, c + 1));
            }
            (r, c) = moves[rng.gen_range(0..moves.len())];
            path.push((r, c));
        }
        if class == 1 {
            path.iter_mut().for_each(|p| *p = (p.1, p.0));
        }
        path
    }

    fn flow_features(&self, path: &[(usize, usize)]) -> anyhow::Result<Array2<f32>> {
        let mut x = Array2::<f32>::zeros((self.edge_index.len(), 1));
        for step in path.windows(2) {
            let u = vertex(self.side, step[0].0, step[0].1);
            let v = vertex(self.side, step[1].0, step[1].1);
            let key = SimplexKey::new([u, v])?;
            let id = self
                .edge_index
                .get(&key)
                .ok_or_else(|| anyhow::anyhow!("path step {key} is not a lattice edge"))?;
            x[[id, 0]] += if u < v { 1.0 } else { -1.0 };
        }
        Ok(x)
    }

    fn sample(&self, class: usize, rng: &mut StdRng) -> anyhow::Result<Complex> {
        let path = self.sample_path(class, rng);
        let mut builder = self.builder.clone();
        let num_vertices = builder.num_simplices(0);
        let num_triangles = builder.num_simplices(2);
        builder
            .features(0, Array2::zeros((num_vertices, 1)))?
            .features(1, self.flow_features(&path)?)?
            .features(2, Array2::zeros((num_triangles, 1)))?
            .complex_label(array![class as i64]);
        Ok(builder.build()?)
    }
}

fn vertex(side: usize, r: usize, c: usize) -> u32 {
    (r * side + c) as u32
}

// ============================================================================
// Generator
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct FlowGenerator;

impl ComplexGenerator for FlowGenerator {
    type Graph = LatticeGraph;

    fn kind(&self) -> &'static str {
        "flow-lattice"
    }

    fn generate(&self, config: &DatasetConfig) -> anyhow::Result<Generated<LatticeGraph>> {
        let lattice = Lattice::new(lattice_side(config.num_points))?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let complexes = (0..config.num_samples())
            .map(|_| {
                let class = rng.gen_range(0..NUM_CLASSES);
                lattice.sample(class, &mut rng)
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        tracing::debug!(
            side = lattice.side,
            samples = complexes.len(),
            "generated flow samples"
        );
        Ok(Generated {
            complexes,
            graph: lattice.graph(),
        })
    }
}
