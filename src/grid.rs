use bevy::{
    ecs::component::{Component, TableStorage},
    log::{debug, warn},
    math::{uvec2, vec2},
    prelude::*,
};
use num::ToPrimitive;
use std::ops::Index;
use std::sync::Arc;

use crate::error::{Result, TileGridError};
use crate::scene::SceneContainer;
use crate::tileset::{TileId, Tileset, TilesetCache, TilesetSource};

/// Tile size used when none (or a zero size) is given.
pub const DEFAULT_TILE_SIZE: UVec2 = UVec2::new(16, 16);

/// A single layer grid of tiles, rendered as one sprite per non-empty cell.
///
/// The grid keeps the tile ids (`data`) and the sprites (`instances`) in sync:
/// a cell has a visible sprite iff its id is non-zero and valid for the current
/// tileset. Sprites are only created for cells that need one and are reused
/// afterwards, clearing a cell just hides its sprite.
///
/// Cells are addressed by `(row, col)`, pixel positions are `(x, y)` with y
/// pointing downwards and `(0, 0)` at the top left corner of cell `(0, 0)`.
///
/// `I` is the sprite handle of the [`SceneContainer`] the grid was built with,
/// `Entity` for [`crate::CommandsScene`].
#[derive(Debug, Clone)]
pub struct TileGrid<I = Entity> {
    /// Size of each tile, in pixels.
    tile_size: UVec2,

    rows: usize,
    cols: usize,

    /// Tile ids, row-major.
    data: Vec<TileId>,

    tiles: Arc<Tileset>,

    /// Sprite per cell, row-major, same shape as `data`.
    instances: Vec<Option<I>>,
}

impl<I: Send + Sync + 'static> Component for TileGrid<I> {
    type Storage = TableStorage;
}

/// Replace zero components by the default size.
pub(crate) fn tile_size_or_default(tile_size: UVec2) -> UVec2 {
    uvec2(
        if tile_size.x == 0 { DEFAULT_TILE_SIZE.x } else { tile_size.x },
        if tile_size.y == 0 { DEFAULT_TILE_SIZE.y } else { tile_size.y },
    )
}

/// Flatten `rows` into a row-major vector.
/// All rows take the width of the first row, padded with `0` or truncated.
fn flatten_rows(rows: Vec<Vec<TileId>>) -> (usize, usize, Vec<TileId>) {
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);

    let mut data = Vec::with_capacity(n_rows * n_cols);
    for (r, mut row) in rows.into_iter().enumerate() {
        if row.len() != n_cols {
            warn!(
                "tile grid row {} has {} cells, expected {}; normalizing",
                r,
                row.len(),
                n_cols
            );
            row.resize(n_cols, 0);
        }
        data.extend(row);
    }

    (n_rows, n_cols, data)
}

impl<I: Copy> TileGrid<I> {
    /// Resolve `tileset` through `cache` and create sprites for all non-empty cells of
    /// `data` in `scene`.
    ///
    /// Zero components of `tile_size` fall back to [`DEFAULT_TILE_SIZE`].
    pub fn new<Src, S>(
        cache: &mut TilesetCache,
        source: &Src,
        scene: &mut S,
        tileset: &str,
        tile_size: UVec2,
        data: Vec<Vec<TileId>>,
    ) -> Result<Self>
    where
        Src: TilesetSource + ?Sized,
        S: SceneContainer<Instance = I>,
    {
        let tile_size = tile_size_or_default(tile_size);
        let tiles = cache.resolve(source, tileset, tile_size)?;
        let (rows, cols, data) = flatten_rows(data);

        let mut grid = Self {
            tile_size,
            rows,
            cols,
            instances: vec![None; data.len()],
            data,
            tiles,
        };
        grid.materialize(scene);
        Ok(grid)
    }

    fn materialize<S>(&mut self, scene: &mut S)
    where
        S: SceneContainer<Instance = I>,
    {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let idx = row * self.cols + col;
                let id = self.data[idx];
                if id == 0 {
                    continue;
                }

                let Some(texture) = self.tiles.get(id) else {
                    warn!(
                        "tile id {} at ({}, {}) is not in tileset '{}' ({} tiles)",
                        id,
                        row,
                        col,
                        self.tiles.name(),
                        self.tiles.len() - 1
                    );
                    continue;
                };

                let instance = scene.spawn_sprite(&texture, self.cell_to_pixel(row, col));
                scene.add_child(instance);
                self.instances[idx] = Some(instance);
            }
        }

        debug!(
            "materialized {} of {} cells with tileset '{}'",
            self.instance_count(),
            self.data.len(),
            self.tiles.name()
        );
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Width of the map in tiles, ie. the number of columns.
    pub fn width_in_tiles(&self) -> usize {
        self.cols
    }

    /// Height of the map in tiles, ie. the number of rows.
    pub fn height_in_tiles(&self) -> usize {
        self.rows
    }

    /// Size of this map in tiles, `x` is the number of columns.
    /// Saturates at `u32::MAX`.
    pub fn size(&self) -> UVec2 {
        uvec2(
            u32::try_from(self.cols).unwrap_or(u32::MAX),
            u32::try_from(self.rows).unwrap_or(u32::MAX),
        )
    }

    /// Size of each tile, in pixels.
    pub fn tile_size(&self) -> UVec2 {
        self.tile_size
    }

    /// Size of the whole map, in pixels.
    pub fn pixel_size(&self) -> Vec2 {
        vec2(self.cols as f32, self.rows as f32) * self.tile_size.as_vec2()
    }

    /// The tileset currently in use.
    pub fn tileset(&self) -> &Arc<Tileset> {
        &self.tiles
    }

    /// Top left corner of cell `(row, col)`, in pixels.
    pub fn cell_to_pixel(&self, row: usize, col: usize) -> Vec2 {
        // In f32, large grids of large tiles overflow u32
        vec2(col as f32, row as f32) * self.tile_size.as_vec2()
    }

    /// Cell `(row, col)` containing pixel position `(x, y)`, if any.
    pub fn pixel_to_cell(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        let size = self.pixel_size();
        if !(0.0..size.x).contains(&x) || !(0.0..size.y).contains(&y) {
            return None;
        }

        let row = (y / self.tile_size.y as f32).floor().to_usize()?;
        let col = (x / self.tile_size.x as f32).floor().to_usize()?;
        (row < self.rows && col < self.cols).then_some((row, col))
    }

    fn cell_index(&self, row: i32, col: i32) -> Option<usize> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    /// Tile id at `(row, col)`, `0` outside of the map.
    pub fn get_tile(&self, row: i32, col: i32) -> TileId {
        self.cell_index(row, col).map_or(0, |idx| self.data[idx])
    }

    /// Tile id at pixel position `(x, y)`, `0` outside of the map.
    pub fn get_tile_by_pixel(&self, x: f32, y: f32) -> TileId {
        self.pixel_to_cell(x, y)
            .map_or(0, |(row, col)| self.data[row * self.cols + col])
    }

    /// Sprite of cell `(row, col)`, if one was ever created.
    /// Note the sprite may be hidden.
    pub fn instance(&self, row: i32, col: i32) -> Option<I> {
        self.cell_index(row, col).and_then(|idx| self.instances[idx])
    }

    /// Number of sprites this grid created (visible or not).
    pub fn instance_count(&self) -> usize {
        self.instances.iter().filter(|i| i.is_some()).count()
    }

    /// Iterate over all cells as `(row, col, id)`, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, TileId)> + '_ {
        let cols = self.cols.max(1);
        self.data
            .iter()
            .enumerate()
            .map(move |(idx, id)| (idx / cols, idx % cols, *id))
    }

    /// Set the tile at `(row, col)` to `id` and update its sprite.
    ///
    /// - `0` hides the sprite (it is kept for later reuse).
    /// - An id not in the current tileset is stored but leaves the sprite alone.
    /// - Otherwise the sprite is retextured and shown, or created and added to the scene
    ///   if the cell never had one.
    ///
    /// Fails with [`TileGridError::IndexOutOfRange`] if the cell is outside of the map,
    /// nothing is changed in that case.
    pub fn set_tile<S>(&mut self, scene: &mut S, row: i32, col: i32, id: TileId) -> Result<()>
    where
        S: SceneContainer<Instance = I>,
    {
        let idx = self
            .cell_index(row, col)
            .ok_or(TileGridError::IndexOutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })?;
        self.set_cell(scene, idx, id);
        Ok(())
    }

    /// [`Self::set_tile`] for the cell at pixel position `(x, y)`.
    /// Positions outside of the map are ignored.
    pub fn set_tile_by_pixel<S>(&mut self, scene: &mut S, x: f32, y: f32, id: TileId) -> Result<()>
    where
        S: SceneContainer<Instance = I>,
    {
        if let Some((row, col)) = self.pixel_to_cell(x, y) {
            self.set_cell(scene, row * self.cols + col, id);
        }
        Ok(())
    }

    /// Set every cell to `id`.
    pub fn fill<S>(&mut self, scene: &mut S, id: TileId)
    where
        S: SceneContainer<Instance = I>,
    {
        for idx in 0..self.data.len() {
            self.set_cell(scene, idx, id);
        }
    }

    fn set_cell<S>(&mut self, scene: &mut S, idx: usize, id: TileId)
    where
        S: SceneContainer<Instance = I>,
    {
        self.data[idx] = id;
        let existing = self.instances[idx];

        if id == 0 {
            if let Some(instance) = existing {
                scene.set_visible(instance, false);
            }
            return;
        }

        // Invalid ids are kept in `data` but never rendered
        let Some(texture) = self.tiles.get(id) else {
            return;
        };

        match existing {
            Some(instance) => {
                scene.set_texture(instance, &texture);
                scene.set_visible(instance, true);
            }
            None => {
                let position = self.cell_to_pixel(idx / self.cols, idx % self.cols);
                let instance = scene.spawn_sprite(&texture, position);
                scene.add_child(instance);
                self.instances[idx] = Some(instance);
            }
        }
    }

    /// Switch to `tileset`, retexturing all existing sprites of non-empty cells.
    ///
    /// Sprites whose id does not exist in the new tileset are hidden.
    /// No sprites are created. On error the grid keeps its current tileset.
    pub fn set_tileset<Src, S>(
        &mut self,
        cache: &mut TilesetCache,
        source: &Src,
        scene: &mut S,
        tileset: &str,
    ) -> Result<()>
    where
        Src: TilesetSource + ?Sized,
        S: SceneContainer<Instance = I>,
    {
        let tiles = cache.resolve(source, tileset, self.tile_size)?;

        for (instance, id) in self.instances.iter().zip(self.data.iter()) {
            let (Some(instance), id) = (*instance, *id) else {
                continue;
            };
            if id == 0 {
                continue;
            }
            match tiles.get(id) {
                Some(texture) => {
                    scene.set_texture(instance, &texture);
                    scene.set_visible(instance, true);
                }
                None => scene.set_visible(instance, false),
            }
        }

        self.tiles = tiles;
        Ok(())
    }
}

impl<I> Index<IVec2> for TileGrid<I> {
    type Output = TileId;

    /// Tile id at `(x, y) = (col, row)`.
    /// Panics outside of the map, use [`TileGrid::get_tile`] for a checked read.
    fn index(&self, i: IVec2) -> &Self::Output {
        let in_bounds = i.x >= 0
            && i.y >= 0
            && (i.x as usize) < self.cols
            && (i.y as usize) < self.rows;
        assert!(
            in_bounds,
            "tile index {} out of bounds for {}x{} grid",
            i, self.rows, self.cols
        );
        &self.data[i.y as usize * self.cols + i.x as usize]
    }
}
