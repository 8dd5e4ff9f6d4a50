pub mod backend;
pub mod blur;
pub mod composite;
pub mod cpu;
pub mod engine;
pub mod export;
pub mod fill;
pub mod opts;
pub mod placement;
pub mod plan;
pub mod shadow;
pub mod state;
