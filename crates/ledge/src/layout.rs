//! ASCII level layouts.
//!
//! A layout is a grid of glyphs, one character per tile, with the first line
//! at the top of the level:
//!
//! | Glyph | Meaning |
//! |-------|---------|
//! | `#` | Solid tile |
//! | `.` or space | Empty tile |
//! | `P` | Empty tile holding the player spawn point |
//!
//! The bottom row sits on `y = 0`, column 0 starts at `x = 0`. Horizontal
//! runs of solid tiles are merged into one solid so bodies sliding along a
//! floor never catch on tile seams.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::terrain::Terrain;
use crate::Aabb;

/// Errors produced while parsing a layout.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    /// The layout contains no rows.
    #[error("layout is empty")]
    Empty,
    /// Tile size must be a positive finite number.
    #[error("invalid tile size {0}")]
    InvalidTileSize(f32),
    /// A glyph outside the supported set.
    #[error("unknown glyph {glyph:?} at line {line}, column {column}")]
    UnknownGlyph {
        /// Offending character
        glyph: char,
        /// 1-based line number
        line: usize,
        /// 1-based column number
        column: usize,
    },
    /// More than one `P` marker.
    #[error("second spawn marker at line {line}, column {column}")]
    DuplicateSpawn {
        /// 1-based line number
        line: usize,
        /// 1-based column number
        column: usize,
    },
}

/// A parsed level: terrain plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Solid geometry
    pub terrain: Terrain,
    /// Center of the `P` tile, if present
    pub spawn: Option<Vec2>,
    /// Level extents in world units
    pub extents: Aabb,
}

impl Layout {
    /// Parse a layout from text.
    ///
    /// Blank lines before the first row and after the last row are ignored.
    /// Short lines are padded with empty tiles.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] for an empty layout, a non-positive tile size,
    /// an unknown glyph or a second spawn marker.
    ///
    /// # Example
    ///
    /// ```
    /// use ledge::Layout;
    ///
    /// let layout = Layout::parse(
    ///     "
    /// ....
    /// .P..
    /// ####
    /// ",
    ///     1.0,
    /// )
    /// .unwrap();
    /// assert_eq!(layout.terrain.len(), 1);
    /// assert!(layout.spawn.is_some());
    /// ```
    pub fn parse(text: &str, tile_size: f32) -> Result<Self, LayoutError> {
        if !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(LayoutError::InvalidTileSize(tile_size));
        }

        let lines: Vec<(usize, &str)> = text
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim_end_matches('\r')))
            .collect();
        let first = lines.iter().position(|(_, line)| !line.trim().is_empty());
        let last = lines.iter().rposition(|(_, line)| !line.trim().is_empty());
        let (Some(first), Some(last)) = (first, last) else {
            return Err(LayoutError::Empty);
        };
        let rows = &lines[first..=last];

        let height = rows.len();
        let width = rows.iter().map(|(_, line)| line.chars().count()).max().unwrap_or(0);

        let mut terrain = Terrain::new();
        let mut spawn = None;

        for (row_index, (line_number, line)) in rows.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let bottom = (height - 1 - row_index) as f32 * tile_size;
            let mut run_start: Option<usize> = None;

            for (column, glyph) in line.chars().chain(std::iter::once('.')).enumerate() {
                let solid = match glyph {
                    '#' => true,
                    '.' | ' ' => false,
                    'P' => {
                        if spawn.is_some() {
                            return Err(LayoutError::DuplicateSpawn {
                                line: *line_number,
                                column: column + 1,
                            });
                        }
                        #[allow(clippy::cast_precision_loss)]
                        let center = Vec2::new((column as f32 + 0.5) * tile_size, bottom + 0.5 * tile_size);
                        spawn = Some(center);
                        false
                    }
                    other => {
                        return Err(LayoutError::UnknownGlyph {
                            glyph: other,
                            line: *line_number,
                            column: column + 1,
                        })
                    }
                };

                match (solid, run_start) {
                    (true, None) => run_start = Some(column),
                    (false, Some(start)) => {
                        #[allow(clippy::cast_precision_loss)]
                        let solid = Aabb::from_min_max(
                            Vec2::new(start as f32 * tile_size, bottom),
                            Vec2::new(column as f32 * tile_size, bottom + tile_size),
                        );
                        terrain.add_solid(solid);
                        run_start = None;
                    }
                    _ => {}
                }
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let extents = Aabb::from_min_max(
            Vec2::ZERO,
            Vec2::new(width as f32 * tile_size, height as f32 * tile_size),
        );

        debug!(
            solids = terrain.len(),
            width,
            height,
            has_spawn = spawn.is_some(),
            "layout parsed"
        );

        Ok(Self {
            terrain,
            spawn,
            extents,
        })
    }
}
