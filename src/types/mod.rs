pub mod material;
pub mod mesh;
pub mod shape;

pub use material::Material;
pub use mesh::{DEFAULT_COLOR, Mesh, PrimitiveMode};
pub use shape::Shape;
