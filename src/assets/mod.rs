pub mod bundle;
pub mod decode;
pub mod specialize;
pub mod store;
pub mod svg_raster;
