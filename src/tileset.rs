//! Slicing of tileset images into addressable tile textures, and the cache that
//! makes sure each tileset is sliced only once.

use bevy::{
    log::{debug, warn},
    math::uvec2,
    prelude::*,
    utils::HashMap,
};
use std::sync::Arc;

use crate::error::{Result, TileGridError};

/// Index into a [`Tileset`]. `0` means "no tile".
pub type TileId = u16;

/// A rectangular region of a tileset image.
/// No pixel data is copied, this is just a view into the base texture.
#[derive(Debug, Clone, PartialEq)]
pub struct TileTexture {
    pub image: Handle<Image>,
    /// Region in pixels, `min` is the top left corner.
    pub rect: Rect,
}

/// Base texture of a tileset together with its size in pixels.
#[derive(Debug, Clone)]
pub struct TilesetImage {
    pub texture: Handle<Image>,
    pub size: UVec2,
}

/// Looks up tileset images by their identifier.
pub trait TilesetSource {
    /// `None` if the image is unknown or not available yet.
    fn image(&self, tileset: &str) -> Option<TilesetImage>;
}

/// The sliced tiles of one tileset image.
///
/// Tiles are numbered left-to-right, top-to-bottom starting at `1`,
/// id `0` is reserved for empty cells and never resolves to a texture.
#[derive(Debug)]
pub struct Tileset {
    name: String,
    image: Handle<Image>,
    tile_size: UVec2,
    /// Size of the tileset in tiles.
    n_tiles: UVec2,
    /// Region of tile `id` is at `regions[id - 1]`.
    regions: Vec<Rect>,
}

impl Tileset {
    /// Slice `image` into tiles of `tile_size`.
    /// Partial tiles at the right and bottom border are dropped.
    pub fn slice(name: &str, image: TilesetImage, tile_size: UVec2) -> Result<Self> {
        if tile_size.x == 0 || tile_size.y == 0 {
            return Err(TileGridError::InvalidTileSize {
                width: tile_size.x,
                height: tile_size.y,
            });
        }

        let n_tiles = image.size / tile_size;
        if n_tiles.x == 0 || n_tiles.y == 0 {
            warn!(
                "tileset '{}' ({:?} px) is smaller than a single {:?} px tile",
                name, image.size, tile_size
            );
        }

        let mut regions = Vec::with_capacity(n_tiles.x as usize * n_tiles.y as usize);
        for row in 0..n_tiles.y {
            for col in 0..n_tiles.x {
                let min = (uvec2(col, row) * tile_size).as_vec2();
                regions.push(Rect::from_corners(min, min + tile_size.as_vec2()));
            }
        }

        Ok(Self {
            name: name.to_owned(),
            image: image.texture,
            tile_size,
            n_tiles,
            regions,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image(&self) -> &Handle<Image> {
        &self.image
    }

    /// Size of a single tile, in pixels.
    pub fn tile_size(&self) -> UVec2 {
        self.tile_size
    }

    /// Number of tile columns and rows in the tileset image.
    pub fn n_tiles(&self) -> UVec2 {
        self.n_tiles
    }

    /// Length of the id sequence, including the reserved id `0`.
    /// Valid tile ids are `1..len()`.
    pub fn len(&self) -> usize {
        self.regions.len() + 1
    }

    /// True iff there is no actual tile in this tileset.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn contains(&self, id: TileId) -> bool {
        id != 0 && (id as usize) < self.len()
    }

    /// Texture for tile `id`, `None` for `0` and ids past the end.
    pub fn get(&self, id: TileId) -> Option<TileTexture> {
        if id == 0 {
            return None;
        }
        self.regions.get(id as usize - 1).map(|rect| TileTexture {
            image: self.image.clone(),
            rect: *rect,
        })
    }
}

/// Sliced tilesets by identifier.
///
/// Every tileset is sliced at most once, all grids using the same identifier share
/// the same [`Tileset`]. Callers sharing an identifier must agree on the tile size,
/// a cached tileset is returned as-is regardless of the requested size.
#[derive(Resource, Default, Debug)]
pub struct TilesetCache {
    tilesets: HashMap<String, Arc<Tileset>>,
}

impl TilesetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached tileset `name` or slice it from `source` and cache it.
    pub fn resolve<S>(&mut self, source: &S, name: &str, tile_size: UVec2) -> Result<Arc<Tileset>>
    where
        S: TilesetSource + ?Sized,
    {
        if let Some(tileset) = self.tilesets.get(name) {
            return Ok(Arc::clone(tileset));
        }

        let image = source
            .image(name)
            .ok_or_else(|| TileGridError::ResourceNotFound {
                tileset: name.to_owned(),
            })?;

        let tileset = Arc::new(Tileset::slice(name, image, tile_size)?);
        debug!(
            "sliced tileset '{}' into {} tiles of {:?} px",
            name,
            tileset.len() - 1,
            tile_size
        );

        self.tilesets.insert(name.to_owned(), Arc::clone(&tileset));
        Ok(tileset)
    }

    pub fn get(&self, name: &str) -> Option<Arc<Tileset>> {
        self.tilesets.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tilesets.contains_key(name)
    }

    /// Number of cached tilesets.
    pub fn len(&self) -> usize {
        self.tilesets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tilesets.is_empty()
    }

    /// Forget tileset `name`.
    /// Grids that already use it keep their copy of the [`Arc`].
    pub fn remove(&mut self, name: &str) -> Option<Arc<Tileset>> {
        self.tilesets.remove(name)
    }

    pub fn clear(&mut self) {
        self.tilesets.clear();
    }
}

/// Tileset identifiers and the images they refer to.
/// Register images here (typically from `AssetServer::load`) so grids can refer to
/// them by name.
#[derive(Resource, Default, Debug, Clone)]
pub struct TilesetRegistry {
    handles: HashMap<String, Handle<Image>>,
}

impl TilesetRegistry {
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        image: Handle<Image>,
    ) -> Option<Handle<Image>> {
        self.handles.insert(name.into(), image)
    }

    pub fn get(&self, name: &str) -> Option<&Handle<Image>> {
        self.handles.get(name)
    }
}

/// [`TilesetSource`] reading images from bevys asset storage.
/// Images that are registered but not loaded yet do not resolve.
pub struct TilesetAssets<'a> {
    registry: &'a TilesetRegistry,
    images: &'a Assets<Image>,
}

impl<'a> TilesetAssets<'a> {
    pub fn new(registry: &'a TilesetRegistry, images: &'a Assets<Image>) -> Self {
        Self { registry, images }
    }
}

impl<'a> TilesetSource for TilesetAssets<'a> {
    fn image(&self, tileset: &str) -> Option<TilesetImage> {
        let handle = self.registry.get(tileset)?;
        let image = self.images.get(handle)?;
        let size = image.texture_descriptor.size;
        Some(TilesetImage {
            texture: handle.clone(),
            size: uvec2(size.width, size.height),
        })
    }
}
