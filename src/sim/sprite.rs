//! Frame-grid sprite playback
//!
//! Every visible entity owns an [`AnimatedSprite`]: a sheet split into
//! `columns x rows` cells, a list of frame indices to cycle through, and a
//! time accumulator advanced by the fixed step.

use std::collections::HashMap;

use crate::platform::assets::image_or_placeholder;
use crate::platform::{AssetProvider, Canvas, Color, ImageHandle, Rect};

/// Slack when comparing the accumulator against the frame interval (ms)
const INTERVAL_EPSILON: f64 = 1e-3;

#[derive(Debug, Clone)]
pub struct AnimatedSprite {
    image: ImageHandle,
    columns: u32,
    rows: u32,
    frame_range: Vec<u32>,
    /// Position within `frame_range`
    cursor: usize,
    frame_rate: f32,
    acc: f64,
}

impl AnimatedSprite {
    /// Sprite cycling through every cell of the sheet
    pub fn new(image: ImageHandle, columns: u32, rows: u32, frame_rate: f32) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        Self {
            image,
            columns,
            rows,
            frame_range: (0..columns * rows).collect(),
            cursor: 0,
            frame_rate,
            acc: 0.0,
        }
    }

    pub fn with_frames(mut self, frames: &[u32]) -> Self {
        self.set_frame_range(frames);
        self
    }

    /// Replace the cycle and restart from its first frame
    pub fn set_frame_range(&mut self, frames: &[u32]) {
        self.frame_range = if frames.is_empty() {
            vec![0]
        } else {
            frames.to_vec()
        };
        self.cursor = 0;
        self.acc = 0.0;
    }

    /// Like [`set_frame_range`](Self::set_frame_range), but a no-op when the
    /// same cycle is already playing
    pub fn play(&mut self, frames: &[u32]) {
        let same = if frames.is_empty() {
            self.frame_range == [0]
        } else {
            self.frame_range == frames
        };
        if !same {
            self.set_frame_range(frames);
        }
    }

    /// Hold a single pose until a new range is set
    pub fn set_frame(&mut self, frame: u32) {
        self.set_frame_range(&[frame]);
    }

    pub fn step(&mut self, dt: f32) {
        if self.frame_range.len() <= 1 || self.frame_rate <= 0.0 || dt <= 0.0 {
            return;
        }
        let interval = f64::from(1000.0 / self.frame_rate);
        self.acc += f64::from(dt);
        while self.acc + INTERVAL_EPSILON >= interval {
            self.acc -= interval;
            self.cursor = (self.cursor + 1) % self.frame_range.len();
        }
    }

    /// Current cell index; always an element of the frame range
    pub fn frame(&self) -> u32 {
        self.frame_range[self.cursor % self.frame_range.len()]
    }

    pub fn frame_range(&self) -> &[u32] {
        &self.frame_range
    }

    pub fn image(&self) -> &ImageHandle {
        &self.image
    }

    pub fn set_image(&mut self, image: ImageHandle) {
        self.image = image;
    }

    /// Cell of the sheet holding the current frame
    pub fn source_rect(&self) -> Rect {
        let frame = self.frame();
        let cell_w = self.image.width() / self.columns as f32;
        let cell_h = self.image.height() / self.rows as f32;
        Rect::new(
            (frame % self.columns) as f32 * cell_w,
            (frame / self.columns) as f32 * cell_h,
            cell_w,
            cell_h,
        )
    }

    /// Draw into `dest`; `mirror` flips horizontally within the same footprint
    pub fn draw(&self, canvas: &mut dyn Canvas, dest: Rect, mirror: bool) {
        if !self.image.is_loaded() {
            canvas.fill_rect(dest, Color::PLACEHOLDER);
            return;
        }
        let dest = if mirror { dest.mirrored_x() } else { dest };
        canvas.draw_image(&self.image, self.source_rect(), dest);
    }
}

/// Image handles resolved once at startup
#[derive(Debug, Clone, Default)]
pub struct SpriteBook {
    images: HashMap<String, ImageHandle>,
}

impl SpriteBook {
    /// Resolve every key, warning once for each missing image
    pub fn load(assets: &dyn AssetProvider, keys: &[&str]) -> Self {
        let images = keys
            .iter()
            .map(|&key| (key.to_string(), image_or_placeholder(assets, key)))
            .collect();
        Self { images }
    }

    pub fn image(&self, key: &str) -> ImageHandle {
        self.images
            .get(key)
            .cloned()
            .unwrap_or_else(|| ImageHandle::pending(key))
    }
}
