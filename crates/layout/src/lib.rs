//! Text layout by measurement.
//!
//! The engine never shapes text itself. It clones rendered editor content
//! into a private surface and asks a [`RangeMeasurer`] where ranges of each
//! text node ended up, splitting runs wherever a range wraps.

mod engine;
mod measurer;
mod position;
pub mod scan;

pub use engine::{LayoutNode, TextLayout};
pub use measurer::{MonospaceMeasurer, RangeMeasurer, TextRange};
pub use position::{PositionData, default_fills};
pub use scan::{Run, split_runs};
