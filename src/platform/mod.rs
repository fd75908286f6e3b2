//! Platform abstraction layer
//!
//! Narrow contracts between the simulation and its host:
//! - Polled logical input
//! - Decoded asset handles
//! - A drawing surface for the render pass

pub mod assets;
pub mod input;

pub use assets::{
    AssetProvider, AssetTable, Canvas, Color, DrawCommand, ImageHandle, RecordingCanvas, Rect,
    SoundHandle,
};
pub use input::{ActionState, InputSource, LogicalAction};
