use bevy::prelude::*;

use crate::error::Result;
use crate::grid::{tile_size_or_default, TileGrid, DEFAULT_TILE_SIZE};
use crate::scene::{CommandsScene, SceneContainer};
use crate::tileset::{TileId, TilesetCache, TilesetSource};

/// Configuration of a [`TileGrid`] before it is built.
///
/// ```ignore
/// let grid = TileGridBuilder::new("dungeon")
///     .with_tile_size(uvec2(16, 16))
///     .with_data(vec![vec![0, 1], vec![2, 0]])
///     .spawn(&mut commands, &mut cache, &TilesetAssets::new(&registry, &images))?;
/// ```
#[derive(Debug, Clone)]
pub struct TileGridBuilder {
    tileset: String,
    tile_size: UVec2,
    data: Vec<Vec<TileId>>,
}

impl TileGridBuilder {
    /// Empty grid using `tileset` with tiles of [`DEFAULT_TILE_SIZE`].
    pub fn new(tileset: impl Into<String>) -> Self {
        Self {
            tileset: tileset.into(),
            tile_size: DEFAULT_TILE_SIZE,
            data: Vec::new(),
        }
    }

    /// Size of each tile in pixels.
    /// Zero components are replaced by the default.
    pub fn with_tile_size(mut self, tile_size: UVec2) -> Self {
        self.tile_size = tile_size_or_default(tile_size);
        self
    }

    /// Tile ids, one `Vec` per row.
    pub fn with_data(mut self, data: Vec<Vec<TileId>>) -> Self {
        self.data = data;
        self
    }

    pub fn tileset(&self) -> &str {
        &self.tileset
    }

    pub fn tile_size(&self) -> UVec2 {
        self.tile_size
    }

    pub fn build<Src, S>(
        self,
        cache: &mut TilesetCache,
        source: &Src,
        scene: &mut S,
    ) -> Result<TileGrid<S::Instance>>
    where
        Src: TilesetSource + ?Sized,
        S: SceneContainer,
    {
        TileGrid::new(cache, source, scene, &self.tileset, self.tile_size, self.data)
    }

    /// Spawn the grid as an entity with a `SpatialBundle` and one sprite child per
    /// non-empty cell. Nothing is spawned if the tileset can not be resolved.
    pub fn spawn<Src>(
        self,
        commands: &mut Commands,
        cache: &mut TilesetCache,
        source: &Src,
    ) -> Result<Entity>
    where
        Src: TilesetSource + ?Sized,
    {
        cache.resolve(source, &self.tileset, self.tile_size)?;

        let parent = commands.spawn(SpatialBundle::default()).id();
        let grid = self.build(cache, source, &mut CommandsScene::new(commands, parent))?;
        commands.entity(parent).insert(grid);
        Ok(parent)
    }
}
