use bevy::{prelude::*, sprite::Anchor};

use crate::tileset::TileTexture;

/// Whatever owns and draws the sprites of a [`crate::TileGrid`].
///
/// Sprites are positioned in pixel coordinates, x to the right and y downwards,
/// with `(0, 0)` at the top left corner of the grid. Their position never changes
/// after creation. Once added, a sprite is never removed again; empty cells hide it.
pub trait SceneContainer {
    type Instance: Copy;

    fn spawn_sprite(&mut self, texture: &TileTexture, position: Vec2) -> Self::Instance;
    fn add_child(&mut self, instance: Self::Instance);
    fn set_texture(&mut self, instance: Self::Instance, texture: &TileTexture);
    fn set_visible(&mut self, instance: Self::Instance, visible: bool);
}

/// Sprites as children of a `parent` entity, spawned and updated via `Commands`.
///
/// Pixel positions are mapped to local translations with y flipped so the grid
/// grows downwards from the parents origin, the same way the tiles appear in the
/// tileset image.
pub struct CommandsScene<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    parent: Entity,
}

impl<'a, 'w, 's> CommandsScene<'a, 'w, 's> {
    pub fn new(commands: &'a mut Commands<'w, 's>, parent: Entity) -> Self {
        Self { commands, parent }
    }

    pub fn parent(&self) -> Entity {
        self.parent
    }
}

pub(crate) fn pixel_to_translation(position: Vec2) -> Vec3 {
    Vec3::new(position.x, -position.y, 0.0)
}

impl<'a, 'w, 's> SceneContainer for CommandsScene<'a, 'w, 's> {
    type Instance = Entity;

    fn spawn_sprite(&mut self, texture: &TileTexture, position: Vec2) -> Entity {
        self.commands
            .spawn(SpriteBundle {
                sprite: Sprite {
                    rect: Some(texture.rect),
                    anchor: Anchor::TopLeft,
                    ..default()
                },
                texture: texture.image.clone(),
                transform: Transform::from_translation(pixel_to_translation(position)),
                ..default()
            })
            .id()
    }

    fn add_child(&mut self, instance: Entity) {
        self.commands.entity(self.parent).add_child(instance);
    }

    fn set_texture(&mut self, instance: Entity, texture: &TileTexture) {
        // Patch in place so user changes to the sprite (color, flip, ..) survive
        let image = texture.image.clone();
        let rect = texture.rect;
        self.commands.add(move |world: &mut World| {
            if let Some(mut sprite) = world.get_mut::<Sprite>(instance) {
                sprite.rect = Some(rect);
            }
            if let Some(mut handle) = world.get_mut::<Handle<Image>>(instance) {
                *handle = image;
            }
        });
    }

    fn set_visible(&mut self, instance: Entity, visible: bool) {
        let visibility = if visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        self.commands.entity(instance).insert(visibility);
    }
}
