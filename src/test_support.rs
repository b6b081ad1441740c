//! In-memory collaborators for unit tests.

use bevy::{asset::HandleId, prelude::*, utils::HashMap};
use std::cell::RefCell;

use crate::scene::SceneContainer;
use crate::tileset::{TileTexture, TilesetImage, TilesetSource};

/// Tileset images by name, counting how often each name was looked up.
#[derive(Default)]
pub struct MemorySource {
    images: HashMap<String, TilesetImage>,
    lookups: RefCell<HashMap<String, usize>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, name: &str, size: UVec2) -> Self {
        self.images.insert(
            name.to_owned(),
            TilesetImage {
                texture: Handle::weak(HandleId::random::<Image>()),
                size,
            },
        );
        self
    }

    pub fn lookups(&self, name: &str) -> usize {
        self.lookups.borrow().get(name).copied().unwrap_or(0)
    }
}

impl TilesetSource for MemorySource {
    fn image(&self, tileset: &str) -> Option<TilesetImage> {
        *self
            .lookups
            .borrow_mut()
            .entry(tileset.to_owned())
            .or_insert(0) += 1;
        self.images.get(tileset).cloned()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSprite {
    pub texture: TileTexture,
    pub position: Vec2,
    pub visible: bool,
    pub in_scene: bool,
}

/// Keeps sprites in a plain vector, instances are indices into it.
#[derive(Default, Debug)]
pub struct RecordingScene {
    pub sprites: Vec<RecordedSprite>,
}

impl RecordingScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sprite(&self, instance: usize) -> &RecordedSprite {
        &self.sprites[instance]
    }

    pub fn visible_count(&self) -> usize {
        self.sprites.iter().filter(|s| s.visible).count()
    }
}

impl SceneContainer for RecordingScene {
    type Instance = usize;

    fn spawn_sprite(&mut self, texture: &TileTexture, position: Vec2) -> usize {
        self.sprites.push(RecordedSprite {
            texture: texture.clone(),
            position,
            visible: true,
            in_scene: false,
        });
        self.sprites.len() - 1
    }

    fn add_child(&mut self, instance: usize) {
        self.sprites[instance].in_scene = true;
    }

    fn set_texture(&mut self, instance: usize, texture: &TileTexture) {
        self.sprites[instance].texture = texture.clone();
    }

    fn set_visible(&mut self, instance: usize, visible: bool) {
        self.sprites[instance].visible = visible;
    }
}
