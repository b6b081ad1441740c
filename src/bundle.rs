use bevy::prelude::*;

use crate::grid_builder::TileGridBuilder;
use crate::loading::TileGridLoading;

// Bundle for a grid whose tileset image may still be loading.
// The `TileGrid` component is added by the plugin once the image is available.
#[derive(Bundle)]
pub struct TileGridLoadingBundle {
    pub loading: TileGridLoading,
    pub spatial: SpatialBundle,
}

impl TileGridLoadingBundle {
    pub fn new(builder: TileGridBuilder) -> Self {
        Self {
            loading: TileGridLoading(builder),
            spatial: SpatialBundle::default(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.spatial.transform = transform;
        self
    }
}
