//! Sprite based tile grids for bevy.
//! A tileset image is sliced into tiles once and shared by all grids using it, every
//! non-empty cell of a grid is rendered as its own sprite.
//!
//! ## Features
//!
//! - Tilesets are sliced at most once, no matter how many grids use them.
//! - Only occupied cells cost a sprite, mostly empty maps stay cheap.
//! - Cheap runtime edits: setting a tile touches a single sprite, clearing a cell hides
//!   its sprite so it can be reused later.
//! - Tilesets can be swapped on a live grid.
//!
//! ## How it works
//!
//! A [`TileGrid`] keeps the tile ids of the map and, for every cell, the sprite that
//! shows it (if any). Sprites are created through a [`SceneContainer`], which for bevy is
//! a [`CommandsScene`] spawning `SpriteBundle` children below the grid entity.
//! Tilesets come from a [`TilesetCache`] resource, which slices images provided by a
//! [`TilesetSource`] (usually [`TilesetAssets`]).

pub mod bundle;
pub mod error;
pub mod grid;
pub mod grid_builder;
pub mod loading;
pub mod plugin;
pub mod scene;
pub mod tileset;

#[cfg(test)]
mod test_support;

pub mod prelude {
    pub use crate::bundle::TileGridLoadingBundle;
    pub use crate::error::TileGridError;
    pub use crate::grid::TileGrid;
    pub use crate::grid_builder::TileGridBuilder;
    pub use crate::loading::TileGridReadyEvent;
    pub use crate::plugin::TileGridPlugin;
    pub use crate::scene::CommandsScene;
    pub use crate::tileset::{TileId, TilesetAssets, TilesetCache, TilesetRegistry};
}

pub use crate::bundle::TileGridLoadingBundle;
pub use crate::error::{Result, TileGridError};
pub use crate::grid::{TileGrid, DEFAULT_TILE_SIZE};
pub use crate::grid_builder::TileGridBuilder;
pub use crate::loading::{build_loading_grids, TileGridLoading, TileGridReadyEvent};
pub use crate::plugin::TileGridPlugin;
pub use crate::scene::{CommandsScene, SceneContainer};
pub use crate::tileset::{
    TileId, TileTexture, Tileset, TilesetAssets, TilesetCache, TilesetImage, TilesetRegistry,
    TilesetSource,
};
