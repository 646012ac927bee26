pub mod color;
pub mod distribute;
pub mod dots;
pub mod mask;

pub use color::{bake_color, Hsl, Rgb};
pub use distribute::{render, CellRenderState, ProgressState, QUANTUM};
pub use dots::DotGroups;
pub use mask::{CellKind, CellMask, FillableCell, MaskError};
