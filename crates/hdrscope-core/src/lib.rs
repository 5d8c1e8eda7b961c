pub mod command;
pub mod consts;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod export;
pub mod gateway;
pub mod metadata;
pub mod preview;
pub mod progress;
pub mod raster;
pub mod scope;
pub mod sequence;
