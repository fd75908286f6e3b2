//! Asset and drawing contracts
//!
//! Images and sounds arrive already decoded; the simulation only holds opaque,
//! cheaply clonable handles and hands them back to the host's [`Canvas`] or
//! audio sink.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in arena space (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Reflect about the rectangle's own vertical axis (negative width)
    pub fn mirrored_x(self) -> Self {
        Self {
            x: self.x + self.w,
            w: -self.w,
            ..self
        }
    }
}

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8, pub u8);

impl Color {
    /// Drawn where an image has not loaded
    pub const PLACEHOLDER: Color = Color(255, 0, 255, 160);
    pub const HEALTH_BACK: Color = Color(255, 0, 0, 204);
    pub const HEALTH_FILL: Color = Color(0, 255, 0, 204);
    pub const GAS_CLOUD: Color = Color(0, 255, 0, 90);
    pub const DASH_TRAIL: Color = Color(255, 0, 0, 70);
}

/// Decoded image owned by the host
#[derive(Debug, Clone, PartialEq)]
pub struct ImageHandle {
    key: Arc<str>,
    width: f32,
    height: f32,
    loaded: bool,
}

impl ImageHandle {
    pub fn new(key: &str, width: f32, height: f32) -> Self {
        Self {
            key: Arc::from(key),
            width,
            height,
            loaded: true,
        }
    }

    /// Handle for an image that is missing or still loading
    pub fn pending(key: &str) -> Self {
        Self {
            key: Arc::from(key),
            width: 0.0,
            height: 0.0,
            loaded: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded && self.width > 0.0 && self.height > 0.0
    }
}

/// Decoded audio buffer owned by the host
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SoundHandle {
    key: Arc<str>,
}

impl SoundHandle {
    pub fn new(key: &str) -> Self {
        Self { key: Arc::from(key) }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Supplies decoded assets by string key
pub trait AssetProvider {
    fn image(&self, key: &str) -> Option<ImageHandle>;
    fn sound(&self, key: &str) -> Option<SoundHandle>;
}

/// Look up an image, logging and falling back to a placeholder when absent
pub fn image_or_placeholder(assets: &dyn AssetProvider, key: &str) -> ImageHandle {
    assets.image(key).unwrap_or_else(|| {
        log::warn!("Image '{}' not found - drawing placeholder", key);
        ImageHandle::pending(key)
    })
}

/// Drawing surface provided by the host for the render pass
pub trait Canvas {
    fn draw_image(&mut self, image: &ImageHandle, src: Rect, dest: Rect);
    fn fill_rect(&mut self, rect: Rect, color: Color);
}

/// In-memory asset table
#[derive(Debug, Clone, Default)]
pub struct AssetTable {
    images: HashMap<String, ImageHandle>,
    sounds: HashMap<String, SoundHandle>,
}

impl AssetTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, key: &str, width: f32, height: f32) -> Self {
        self.images
            .insert(key.to_string(), ImageHandle::new(key, width, height));
        self
    }

    pub fn with_sound(mut self, key: &str) -> Self {
        self.sounds.insert(key.to_string(), SoundHandle::new(key));
        self
    }

    /// Every sprite sheet and sound the game references, at their sheet sizes
    pub fn standard() -> Self {
        let mut table = Self::new();
        for hero in ["btc", "eth", "solana", "real", "dollar"] {
            table = table.with_image(&format!("{hero}_idle"), 576.0, 96.0);
        }
        table
            .with_image("enemy_goblin", 360.0, 300.0)
            .with_image("enemy_reaper", 360.0, 300.0)
            .with_image("tucano", 480.0, 340.0)
            .with_image("squid_game", 690.0, 150.0)
            .with_image("power_brl", 64.0, 64.0)
            .with_image("power_eur", 64.0, 64.0)
            .with_image("power_usd", 64.0, 64.0)
            .with_image("power_enemy", 64.0, 64.0)
            .with_image("explosion", 400.0, 80.0)
            .with_image("life", 64.0, 64.0)
            .with_sound("punch")
            .with_sound("kick")
            .with_sound("power")
            .with_sound("crowd")
            .with_sound("whoosh")
            .with_sound("block")
    }
}

impl AssetProvider for AssetTable {
    fn image(&self, key: &str) -> Option<ImageHandle> {
        self.images.get(key).cloned()
    }

    fn sound(&self, key: &str) -> Option<SoundHandle> {
        self.sounds.get(key).cloned()
    }
}

/// A single recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Image { key: String, src: Rect, dest: Rect },
    Fill { rect: Rect, color: Color },
}

/// Canvas that records draw calls instead of drawing (headless hosts, tests)
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    pub commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destination rects of every image drawn with the given key
    pub fn images_drawn(&self, key: &str) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Image { key: k, dest, .. } if k == key => Some(*dest),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn draw_image(&mut self, image: &ImageHandle, src: Rect, dest: Rect) {
        self.commands.push(DrawCommand::Image {
            key: image.key().to_string(),
            src,
            dest,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Fill { rect, color });
    }
}
