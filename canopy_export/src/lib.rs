// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Export turns a projected scene into a downloadable PNG.
//!
//! This crate plans the export: it frames the drawing in layout space with
//! a fixed margin, supersamples for crispness, and names the file after
//! the map's root label. Actual pixel pushing is behind the [`Rasterizer`]
//! trait, so hosts bring their own canvas, GPU, or software raster.
//!
//! An export is always all-or-nothing: a failure reports and produces no
//! file, and never disturbs the live scene.

use canopy_scene::{Color, Scene};
use kurbo::{Rect, Shape, Size, TranslateScale, Vec2};

/// Margin around the drawing, layout units.
pub const EXPORT_PADDING: f64 = 50.0;

/// Supersampling factor applied to the output bitmap.
pub const SUPERSAMPLE: f64 = 2.0;

/// Background painted behind the drawing.
pub const BACKGROUND: Color = Color("#ffffff");

/// Why an export produced no file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportError {
    /// The scene has no drawable nodes.
    NothingToExport,
    /// The rasterizer failed; the message is surfaced to the user.
    Raster(String),
}

impl core::fmt::Display for ExportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NothingToExport => write!(f, "there is nothing to export yet"),
            Self::Raster(message) => write!(f, "failed to render the export: {message}"),
        }
    }
}

impl std::error::Error for ExportError {}

/// A fully framed drawing, ready to rasterize.
#[derive(Clone, Debug)]
pub struct ExportPlan {
    /// The drawing, with its transform mapping layout space onto the
    /// bitmap (padding and supersampling already applied).
    pub scene: Scene,
    /// The framed region in layout space, padding included.
    pub bounds: Rect,
    /// Output bitmap size in pixels.
    pub pixel_size: Size,
    /// Opaque background to paint first.
    pub background: Color,
}

/// Pure function from a plan to encoded PNG bytes.
pub trait Rasterizer {
    /// Render `plan` and encode it as PNG.
    fn rasterize(&self, plan: &ExportPlan) -> Result<Vec<u8>, ExportError>;
}

/// A named, encoded export.
#[derive(Clone, Debug)]
pub struct ExportFile {
    /// Suggested download name, always ending in `.png`.
    pub filename: String,
    /// Encoded PNG bytes.
    pub bytes: Vec<u8>,
}

/// Frame `scene` for export.
///
/// The incoming scene's view transform is ignored; exports always frame
/// the whole drawing in layout space, whatever the user has panned to.
pub fn plan_export(scene: &Scene) -> Result<ExportPlan, ExportError> {
    if scene.nodes.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let mut bounds: Option<Rect> = None;
    for node in &scene.nodes {
        bounds = Some(match bounds {
            None => node.rect,
            Some(b) => b.union(node.rect),
        });
    }
    for edge in &scene.edges {
        let b = edge.path.bounding_box();
        bounds = Some(match bounds {
            None => b,
            Some(acc) => acc.union(b),
        });
    }
    let bounds = match bounds {
        Some(b) => b.inflate(EXPORT_PADDING, EXPORT_PADDING),
        None => return Err(ExportError::NothingToExport),
    };

    let mut scene = scene.clone();
    scene.transform = TranslateScale::new(
        Vec2::new(-bounds.x0, -bounds.y0) * SUPERSAMPLE,
        SUPERSAMPLE,
    );

    Ok(ExportPlan {
        scene,
        bounds,
        pixel_size: Size::new(bounds.width(), bounds.height()) * SUPERSAMPLE,
        background: BACKGROUND,
    })
}

/// Export `scene` as a PNG named after the map's root label.
pub fn export_png(
    scene: &Scene,
    root_label: &str,
    rasterizer: &dyn Rasterizer,
) -> Result<ExportFile, ExportError> {
    let plan = plan_export(scene)?;
    let bytes = rasterizer.rasterize(&plan)?;
    Ok(ExportFile {
        filename: filename_for(root_label),
        bytes,
    })
}

/// Download name for a root label: whitespace runs collapse to `_`, an
/// empty label falls back to `mindmap`.
pub fn filename_for(root_label: &str) -> String {
    let words: Vec<&str> = root_label.split_whitespace().collect();
    let stem = if words.is_empty() {
        "mindmap".to_owned()
    } else {
        words.join("_")
    };
    format!("{stem}.png")
}
