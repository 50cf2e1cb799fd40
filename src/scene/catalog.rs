use glam::{Vec3, Vec4};
use tracing::{debug, info};

use crate::builders::{antenna, leg, minerals, petal, tentacle, tentacle_straight};
use crate::config::CatalogConfig;
use crate::geometry::{
    CylinderParams, TorusKnotParams, TorusParams, cuboid, cylinder, octahedron, sphere,
    tetrahedron, torus, torus_knot,
};
use crate::noise::hash_index;
use crate::types::{Mesh, Shape};

const CRYSTAL: Vec4 = Vec4::new(0.55, 0.85, 1.0, 1.0);
const HORN: Vec4 = Vec4::new(0.95, 0.85, 0.6, 1.0);
const BUBBLE: Vec4 = Vec4::new(0.7, 1.0, 0.8, 1.0);
const SPIKE: Vec4 = Vec4::new(1.0, 0.45, 0.35, 1.0);
const DIAMOND: Vec4 = Vec4::new(0.9, 0.9, 1.0, 1.0);
const FLESH: Vec4 = Vec4::new(1.0, 0.6, 0.8, 1.0);

/// Where the creature parts sit before `spread` is applied.
const CREATURE_ORIGIN: Vec3 = Vec3::new(100.0, 100.0, 0.0);

/// The four placements shared by the horn, triangle and diamond families.
const CLUSTER_PLACEMENTS: [Placement; 4] = [
    Placement::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 20.0, 0.0)),
    Placement::new(Vec3::new(0.0, 0.0, -90.0), Vec3::new(20.0, 0.0, 0.0)),
    Placement::new(Vec3::new(0.0, 0.0, 90.0), Vec3::new(40.0, 0.0, 0.0)),
    Placement::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(30.0, 0.0, 0.0)),
];

const BUBBLE_PLACEMENTS: [Placement; 4] = [
    Placement::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(30.0, 0.0, 0.0)),
    Placement::new(Vec3::new(-90.0, 0.0, 0.0), Vec3::new(30.0, 0.0, 0.0)),
    Placement::new(Vec3::new(0.0, 90.0, 0.0), Vec3::new(30.0, 0.0, 0.0)),
    Placement::new(Vec3::new(0.0, -90.0, 0.0), Vec3::new(30.0, 0.0, 0.0)),
];

/// Authored placement of a catalog entry. Rotations are in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub rotation_degrees: Vec3,
    pub translation: Vec3,
    pub scale: Vec3,
}

impl Placement {
    pub const fn new(rotation_degrees: Vec3, translation: Vec3) -> Self {
        Self {
            rotation_degrees,
            translation,
            scale: Vec3::ONE,
        }
    }

    pub const fn with_scale(self, scale: Vec3) -> Self {
        Self { scale, ..self }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO)
    }
}

/// A named shape in the catalog.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub name: String,
    pub shape: Shape,
}

impl CatalogEntry {
    /// The entry's mesh with its placement baked in.
    pub fn world_mesh(&self) -> Mesh {
        self.shape.bake()
    }
}

/// Fixed, ordered collection of placed shapes built once at startup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    spread: f32,
}

impl Catalog {
    pub fn new(spread: f32) -> Self {
        Self {
            entries: Vec::new(),
            spread,
        }
    }

    /// Build the standard scene: crystal clusters, horns, bubbles, spikes,
    /// diamonds and (optionally) the creature parts.
    pub fn assemble(config: &CatalogConfig) -> Self {
        let mut catalog = Catalog::new(config.spread);

        catalog.add(
            "crystal",
            minerals(&tetrahedron(20.0), 1),
            Placement::new(Vec3::ZERO, Vec3::new(40.0, 0.0, 0.0)),
            Some(CRYSTAL),
        );

        let horn = cylinder(&CylinderParams::cylinder(3.0, 20.0, 3, 1));
        catalog.add_family("horn", &horn, &CLUSTER_PLACEMENTS, HORN);

        let bubble = sphere(4.0, 6);
        catalog.add_family("bubble", &bubble, &BUBBLE_PLACEMENTS, BUBBLE);

        let triangle = tetrahedron(20.0);
        catalog.add_family("triangle", &triangle, &CLUSTER_PLACEMENTS, CRYSTAL);

        let down = Vec3::new(-90.0, 0.0, 0.0);
        let long_spike = cylinder(&CylinderParams::cone(6.0, 60.0, 5));
        let spikes = [
            (
                long_spike.clone(),
                Placement::new(down, Vec3::new(0.0, 0.0, -30.0))
                    .with_scale(Vec3::new(1.5, 0.7, 1.0)),
            ),
            (
                long_spike.clone(),
                Placement::new(down, Vec3::new(0.0, 0.0, -30.0)),
            ),
            (long_spike, Placement::new(down, Vec3::new(20.0, 20.0, 0.0))),
            (
                cylinder(&CylinderParams::cone(6.0, 70.0, 4)),
                Placement::default(),
            ),
            (
                cylinder(&CylinderParams::cone(6.0, 80.0, 4)),
                Placement::new(Vec3::new(0.0, -90.0, 0.0), Vec3::ZERO),
            ),
        ];
        for (i, (mesh, placement)) in spikes.into_iter().enumerate() {
            catalog.add(format!("spike-{i}"), Shape::new(mesh), placement, Some(SPIKE));
        }

        let diamond = octahedron(15.0);
        catalog.add_family("diamond", &diamond, &CLUSTER_PLACEMENTS, DIAMOND);

        if config.include_creatures {
            let at = Placement::new(Vec3::ZERO, CREATURE_ORIGIN);
            catalog.add("petal", petal(), at, Some(FLESH));
            catalog.add("boxes", minerals(&cuboid(20.0, 20.0, 20.0), 4), at, Some(CRYSTAL));
            catalog.add("tentacle", tentacle(20), at, Some(FLESH));
            catalog.add("tentacle-straight", tentacle_straight(), at, Some(FLESH));
            catalog.add("antenna", antenna(20), at, Some(FLESH));
            catalog.add("leg", leg(10, 8.0), at, Some(FLESH));
            catalog.add(
                "knot",
                Shape::new(torus_knot(&TorusKnotParams::default())),
                at,
                Some(DIAMOND),
            );
            catalog.add("ring", Shape::new(torus(&TorusParams::default())), at, Some(HORN));
        }

        info!(
            entries = catalog.len(),
            vertices = catalog.total_vertices(),
            "Catalog assembled"
        );
        catalog
    }

    /// Place `shape` and push it. The translation is multiplied by the
    /// catalog spread and the rotation converted to radians.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        mut shape: Shape,
        placement: Placement,
        color: Option<Vec4>,
    ) {
        shape.apply_rotation(placement.rotation_degrees * (std::f32::consts::PI / 180.0));
        shape.apply_translation(placement.translation * self.spread);
        shape.apply_scale(placement.scale);
        if let Some(color) = color {
            shape.set_material_color(color);
        }

        let name = name.into();
        debug!(name = %name, vertices = shape.mesh.vertex_count(), "Catalog entry added");
        self.entries.push(CatalogEntry { name, shape });
    }

    /// One single-copy mineral per placement, named `<family>-<i>`.
    fn add_family(&mut self, family: &str, geom: &Mesh, placements: &[Placement], color: Vec4) {
        for (i, placement) in placements.iter().enumerate() {
            self.add(format!("{family}-{i}"), minerals(geom, 1), *placement, Some(color));
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Deterministic index for `(seed, salt)`, `None` when the catalog is empty.
    pub fn pick_index(&self, seed: f32, salt: f32) -> Option<usize> {
        hash_index(seed, salt, self.entries.len())
    }

    pub fn pick(&self, seed: f32, salt: f32) -> Option<&CatalogEntry> {
        self.pick_index(seed, salt).and_then(|i| self.entries.get(i))
    }

    pub fn total_vertices(&self) -> usize {
        self.entries.iter().map(|e| e.shape.mesh.vertex_count()).sum()
    }
}
