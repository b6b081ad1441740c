use bevy::{
    log::{debug, info, warn},
    prelude::*,
};

use crate::grid_builder::TileGridBuilder;
use crate::scene::CommandsScene;
use crate::tileset::{TilesetAssets, TilesetCache, TilesetRegistry, TilesetSource};

/// A grid waiting for its tileset image to be loaded.
/// Once it is, [`build_loading_grids`] replaces this component with a [`crate::TileGrid`].
#[derive(Debug, Component, Clone)]
pub struct TileGridLoading(pub TileGridBuilder);

/// Signals that the [`crate::TileGrid`] component of `grid` has been built,
/// so `set_tile` & co can be used.
#[derive(Debug, Event)]
pub struct TileGridReadyEvent {
    pub grid: Entity,
}

/// Build all [`TileGridLoading`] grids whose tileset is available,
/// when thats the case, send out a [`TileGridReadyEvent`].
///
/// Grids whose tileset image is registered in [`TilesetRegistry`] but not loaded yet
/// are retried next frame. Grids whose tileset can not be built at all (eg. it is
/// not registered) lose their [`TileGridLoading`] marker without an event.
pub fn build_loading_grids(
    mut commands: Commands,
    mut cache: ResMut<TilesetCache>,
    registry: Res<TilesetRegistry>,
    images: Res<Assets<Image>>,
    loading: Query<(Entity, &TileGridLoading)>,
    mut send_ready_event: EventWriter<TileGridReadyEvent>,
) {
    let source = TilesetAssets::new(&registry, &images);

    for (entity, TileGridLoading(builder)) in loading.iter() {
        let tileset = builder.tileset();
        let still_loading = !cache.contains(tileset)
            && registry.get(tileset).is_some()
            && source.image(tileset).is_none();
        if still_loading {
            debug!("tileset '{}' of grid {:?} not loaded yet", tileset, entity);
            continue;
        }

        let mut scene = CommandsScene::new(&mut commands, entity);
        match builder.clone().build(&mut cache, &source, &mut scene) {
            Ok(grid) => {
                info!(
                    "tile grid {:?} ready, {}x{} tiles of '{}'",
                    entity,
                    grid.rows(),
                    grid.cols(),
                    tileset
                );
                commands
                    .entity(entity)
                    .remove::<TileGridLoading>()
                    .insert(grid);
                send_ready_event.send(TileGridReadyEvent { grid: entity });
            }
            Err(e) => {
                warn!("could not build tile grid {:?}: {}", entity, e);
                commands.entity(entity).remove::<TileGridLoading>();
            }
        }
    } // for loading
} // build_loading_grids()
