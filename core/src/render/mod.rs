pub mod display;
pub mod radar;
pub mod raster;
pub mod snapshot;

pub use display::{DisplayList, DrawCommand, Layer, Point, Rgba, TextAlign};
pub use radar::{render_radar, RadarView, Viewport};
pub use raster::{encode_png, rasterize};
pub use snapshot::compose_snapshot;
