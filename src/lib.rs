#![forbid(unsafe_code)]
//! Procedural grid compositions for caption/image training data.
//!
//! [`generate`] lays a random 3..=8 x 3..=8 grid over a square canvas and fills every cell
//! with one shape from a fixed vocabulary, returning the vector [`Scene`] and a caption
//! summary. [`run`] repeats that for a whole batch: each scene is serialized to a transient
//! SVG, rasterized through a [`Rasterizer`] and written as `<base>_<i>.png` next to a
//! `<base>_<i>.txt` caption.

pub mod color;
pub mod compose;
pub mod config;
pub mod core;
pub mod error;
pub mod pipeline;
pub mod raster;
pub mod shape;
pub mod svg;

pub use color::{Palette, Rgb8};
pub use compose::{CellShape, Composition, Scene, ShapeTally, generate, generate_with_rng};
pub use config::BatchConfig;
pub use core::{Canvas, Grid};
pub use error::{ErrorKind, GridArtError, GridArtResult};
pub use pipeline::{BatchProgress, BatchResult, compose_caption, run, run_with_progress};
pub use raster::{RasterImage, Rasterizer, ResvgRasterizer};
pub use shape::{Corner, Shape, ShapeKind};
pub use svg::scene_to_svg;
