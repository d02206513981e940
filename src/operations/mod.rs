mod combine;
mod filter;
mod simplify;

pub use combine::{combine, CombineMeshes, MeshSource};
pub use filter::{filter_extremal, FilterExtremal, FilterOutcome};
pub use simplify::{simplify, DissolveCoplanar, SimplifyOutcome};
