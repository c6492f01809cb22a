// Renderer-agnostic chart core: data transforms, scale resolution and graph
// layout. A rendering collaborator feeds rows and specs in and draws from the
// resolved scales and position tables this crate produces.

pub mod error;
pub mod expr;
pub mod geom;
pub mod layout;
pub mod palette;
pub mod scale;
pub mod spec;
pub mod transform;
pub mod value;

pub use error::{Error, Result};
pub use layout::{compute_layout, LayoutBounds, PositionTable};
pub use scale::{resolve_channel_scale, resolve_color_scale, Scale};
pub use transform::apply_transforms;
pub use value::{rows_from_json, Row, Value};
