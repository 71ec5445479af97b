//! Preview image handles.
//!
//! Every session owns five image handles: one per face slot plus a spare.
//! Each gets a stable image number at session start. The host terminal
//! answers each allocation with an image id, images are (re)transmitted
//! through the handle when the sample file changes, and all five are deleted
//! when the session ends so no images leak into the terminal.
//!
//! The byte-level graphics protocol lives behind [`GraphicsSink`].

use crate::error::GraphicsError;
use fontpane_config::FaceSlot;
use std::path::{Path, PathBuf};

/// Transport for graphics commands to the host terminal.
pub trait GraphicsSink {
    /// Transmit a 1x1 placeholder to reserve `image_number`.
    fn allocate(&mut self, image_number: u32);
    /// Transmit the image file at `path` through `image_number` and place it.
    fn transmit(&mut self, image_number: u32, path: &Path, width: u32, height: u32);
    /// Place the image already held by `image_number` at the cursor.
    fn place(&mut self, image_number: u32);
    /// Free `image_number` and its image data.
    fn delete(&mut self, image_number: u32);
}

/// Which handle an image goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    Face(FaceSlot),
    Extra,
}

impl ImageSlot {
    fn index(self) -> usize {
        match self {
            ImageSlot::Face(FaceSlot::Regular) => 0,
            ImageSlot::Face(FaceSlot::Bold) => 1,
            ImageSlot::Face(FaceSlot::Italic) => 2,
            ImageSlot::Face(FaceSlot::BoldItalic) => 3,
            ImageSlot::Extra => 4,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ImageHandle {
    image_number: u32,
    /// Assigned by the terminal once it acknowledges the allocation
    image_id: Option<u32>,
    /// File and pixel size last transmitted through this handle
    current_file: Option<(PathBuf, u32, u32)>,
}

/// Stable image handles for one chooser session.
#[derive(Debug, Clone)]
pub struct GraphicsManager {
    handles: [ImageHandle; 5],
    initialized: bool,
}

impl GraphicsManager {
    /// Handles numbered `base + 1 ..= base + 5`.
    pub fn new(base: u32) -> Self {
        let handles = std::array::from_fn(|i| ImageHandle {
            image_number: base.wrapping_add(i as u32 + 1),
            ..ImageHandle::default()
        });
        Self {
            handles,
            initialized: false,
        }
    }

    pub fn image_number(&self, slot: ImageSlot) -> u32 {
        self.handles[slot.index()].image_number
    }

    pub fn image_id(&self, slot: ImageSlot) -> Option<u32> {
        self.handles[slot.index()].image_id
    }

    /// Reserve all handles with the terminal.
    pub fn initialize(&mut self, sink: &mut dyn GraphicsSink) {
        for handle in &self.handles {
            sink.allocate(handle.image_number);
        }
        self.initialized = true;
        log::debug!(
            "Allocated preview images {}..={}",
            self.handles[0].image_number,
            self.handles[4].image_number
        );
    }

    /// Record the terminal's reply to an allocation or transmission.
    pub fn on_response(&mut self, image_number: u32, image_id: u32, message: &str) -> Result<(), GraphicsError> {
        if message != "OK" {
            return Err(GraphicsError::LoadFailed(message.to_string()));
        }
        let handle = self
            .handles
            .iter_mut()
            .find(|h| h.image_number == image_number)
            .ok_or(GraphicsError::UnknownImage(image_number))?;
        handle.image_id = Some(image_id);
        Ok(())
    }

    /// Show the image at `path` through the handle for `slot`.
    ///
    /// The file is only transmitted when its path or pixel size differs from
    /// what the handle already holds.
    pub fn display_image(&mut self, sink: &mut dyn GraphicsSink, slot: ImageSlot, path: &Path, width: u32, height: u32) {
        let handle = &mut self.handles[slot.index()];
        let unchanged = handle
            .current_file
            .as_ref()
            .is_some_and(|(file, w, h)| file == path && (*w, *h) == (width, height));
        if unchanged {
            sink.place(handle.image_number);
        } else {
            sink.transmit(handle.image_number, path, width, height);
            handle.current_file = Some((path.to_path_buf(), width, height));
        }
    }

    /// Delete every handle. Safe to call more than once.
    pub fn finalize(&mut self, sink: &mut dyn GraphicsSink) {
        if !self.initialized {
            return;
        }
        for handle in &mut self.handles {
            sink.delete(handle.image_number);
            handle.image_id = None;
            handle.current_file = None;
        }
        self.initialized = false;
        log::debug!("Deleted preview images");
    }
}
