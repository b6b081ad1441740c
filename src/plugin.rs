use bevy::prelude::*;

use crate::loading::{build_loading_grids, TileGridReadyEvent};
use crate::tileset::{TilesetCache, TilesetRegistry};

/// Plugin for tile grids.
/// Add this to your app, register tileset images in [`TilesetRegistry`] and then spawn
/// grids with [`crate::TileGridLoadingBundle`] or [`crate::TileGridBuilder::spawn`].
#[derive(Default)]
pub struct TileGridPlugin;

impl Plugin for TileGridPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TilesetCache>()
            .init_resource::<TilesetRegistry>()
            .add_event::<TileGridReadyEvent>()
            .add_systems(Update, build_loading_grids);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_resources() {
        let mut app = App::new();
        app.add_plugins(TileGridPlugin);

        assert!(app.world.contains_resource::<TilesetCache>());
        assert!(app.world.contains_resource::<TilesetRegistry>());
        assert!(app.world.contains_resource::<Events<TileGridReadyEvent>>());
    }
}
