pub mod syntax;
pub mod values;
pub mod computed;

// Re-exports so other crates can just use `css::...` nicely.
pub use syntax::{Declaration, parse_declarations, serialize_declarations};
pub use values::{parse_px, strip_unit};
pub use computed::{ComputedStyle, Origin, compute_style, is_inherited, initial_value};
