//! A mostly empty 48x32 map that loads its tileset in the background and then gets
//! random tiles set and cleared every frame.
//! Press space to switch between the two tilesets.

use bevy::{math::uvec2, prelude::*};
use bevy_tile_grid::prelude::*;
use bevy_tile_grid::TilesetAssets;
use rand::Rng;

const TILESETS: [&str; 2] = ["pixel_tiles", "pixel_tiles_dark"];

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: String::from("Tile grid example"),
                        resolution: (1024., 768.).into(),
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
            TileGridPlugin,
        ))
        .add_systems(Startup, startup)
        .add_systems(Update, (log_ready_grids, change_tiles, swap_tileset))
        .run();
}

fn startup(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut registry: ResMut<TilesetRegistry>,
) {
    commands.spawn(Camera2dBundle::default());

    registry.insert(TILESETS[0], asset_server.load("pixel_tiles_16.png"));
    registry.insert(TILESETS[1], asset_server.load("pixel_tiles_dark_16.png"));

    let mut rng = rand::thread_rng();
    let data: Vec<Vec<TileId>> = (0..32)
        .map(|_| {
            (0..48)
                .map(|_| if rng.gen_bool(0.2) { rng.gen_range(1..8) } else { 0 })
                .collect()
        })
        .collect();

    let builder = TileGridBuilder::new(TILESETS[0])
        .with_tile_size(uvec2(16, 16))
        .with_data(data);

    // Center the map, its origin is the top left corner
    commands.spawn(
        TileGridLoadingBundle::new(builder)
            .with_transform(Transform::from_xyz(-48. * 8., 32. * 8., 0.)),
    );
}

fn log_ready_grids(mut ready: EventReader<TileGridReadyEvent>) {
    for ev in ready.iter() {
        info!("grid {:?} is ready", ev.grid);
    }
}

/// Set or clear a few random cells
fn change_tiles(mut commands: Commands, mut grids: Query<(Entity, &mut TileGrid)>) {
    let mut rng = rand::thread_rng();

    for (entity, mut grid) in grids.iter_mut() {
        let mut scene = CommandsScene::new(&mut commands, entity);
        let size = grid.pixel_size();

        for _ in 0..4 {
            let x = rng.gen_range(0.0..size.x);
            let y = rng.gen_range(0.0..size.y);
            let id = if rng.gen_bool(0.5) { rng.gen_range(1..8) } else { 0 };
            if let Err(e) = grid.set_tile_by_pixel(&mut scene, x, y, id) {
                warn!("could not set tile: {}", e);
            }
        }
    }
} // fn change_tiles

fn swap_tileset(
    keys: Res<Input<KeyCode>>,
    mut commands: Commands,
    mut cache: ResMut<TilesetCache>,
    registry: Res<TilesetRegistry>,
    images: Res<Assets<Image>>,
    mut grids: Query<(Entity, &mut TileGrid)>,
) {
    if !keys.just_pressed(KeyCode::Space) {
        return;
    }

    let source = TilesetAssets::new(&registry, &images);
    for (entity, mut grid) in grids.iter_mut() {
        let next = if grid.tileset().name() == TILESETS[0] {
            TILESETS[1]
        } else {
            TILESETS[0]
        };
        let mut scene = CommandsScene::new(&mut commands, entity);
        match grid.set_tileset(&mut cache, &source, &mut scene, next) {
            Ok(()) => info!("switched to '{}'", next),
            Err(e) => warn!("{}", e),
        }
    }
}
