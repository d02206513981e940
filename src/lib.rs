pub mod error;
pub mod math;
pub mod mesh;
pub mod operations;
pub mod params;
pub mod pipeline;
pub mod scene;

pub use error::{Result, ShellError};
pub use mesh::{Face, MaterialPalette, Mesh};
pub use operations::{combine, filter_extremal, simplify};
pub use params::{EmptySlotPolicy, ShellParams};
pub use pipeline::{PipelineReport, ShellPipeline};
pub use scene::Scene;
