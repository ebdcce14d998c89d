pub mod brand;
pub mod color;
pub mod host;
pub mod id;
pub mod layout;
pub mod memory;
pub mod model;
pub mod svg;

pub use brand::{BrandColors, extract_brand_colors};
pub use color::{Color, ColorInput, parse_color, parse_color_str};
pub use host::{ExportFormat, ExportSettings, Host, HostError};
pub use id::NodeRef;
pub use memory::MemoryHost;
pub use model::*;
