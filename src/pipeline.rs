//! # Generation Pipeline
//!
//! Drives one complete map generation: validate the configuration, build the
//! room topology, resolve pieces, then composite the three tile layers.
//!
//! The driver owns the room graph and layers for the duration of a run and
//! hands the finished result back to the caller.

use crate::compositor::{PropSpacing, TileCompositor};
use crate::pieces::{PieceCatalog, PieceSelector};
use crate::{
    GenerationReport, GenerationStatus, LayerExport, MapConfig, MazeError, MazeGenerator,
    MazeResult, RoomGraph,
};
use log::{debug, info};
use rand::Rng;

/// Everything produced by one generation run.
#[derive(Debug, Clone)]
pub struct GeneratedMap {
    pub graph: RoomGraph,
    pub report: GenerationReport,
    pub layers: TileCompositor,
    pub room_width: usize,
    pub room_height: usize,
}

impl GeneratedMap {
    pub fn export(&self) -> LayerExport {
        LayerExport::from_compositor(&self.layers, self.room_width, self.room_height)
    }
}

/// Checks that a catalog's fragments match the configured room size.
fn check_catalog<C: PieceCatalog + ?Sized>(config: &MapConfig, catalog: &C) -> MazeResult<()> {
    if catalog.room_width() != config.room_width || catalog.room_height() != config.room_height {
        return Err(MazeError::InvalidConfig(format!(
            "catalog rooms are {}x{} but configuration expects {}x{}",
            catalog.room_width(),
            catalog.room_height(),
            config.room_width,
            config.room_height
        )));
    }
    Ok(())
}

/// Generates a complete map.
///
/// # Examples
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use roomweave::{generate_map, CatalogData, MapConfig};
///
/// let config = MapConfig::for_testing();
/// let catalog = CatalogData::procedural(config.room_width, config.room_height, config.wall_tiles).unwrap();
/// let map = generate_map(&config, &catalog, &mut StdRng::seed_from_u64(42)).unwrap();
/// assert!(map.graph.is_connected());
/// assert_eq!(map.export().walls.len(), config.map_width * config.map_height);
/// ```
pub fn generate_map<C, R>(config: &MapConfig, catalog: &C, rng: &mut R) -> MazeResult<GeneratedMap>
where
    C: PieceCatalog + ?Sized,
    R: Rng + ?Sized,
{
    config.validate()?;
    check_catalog(config, catalog)?;

    let generator = MazeGenerator::from_config(config);
    let selector = PieceSelector::new(catalog);
    let (graph, report) = generator.generate(&selector, rng)?;

    let mut layers = TileCompositor::new(config.map_width, config.map_height);
    layers.fill_background(config.floor_tiles, rng);
    layers.inject_rooms(&graph, config.room_width, config.room_height)?;

    let shadows = layers.derive_shadows(config.floor_tiles, config.wall_tiles, config.shadow_offset);
    let spacing = PropSpacing {
        stride: config.prop_stride,
        min_distance: config.prop_min_distance,
    };
    let props = layers.distribute_props(config.floor_tiles, config.prop_tiles, spacing, rng);
    debug!("Composited {} shadows and {} props", shadows, props.len());

    let dead_ends = graph.dead_ends().count();
    match report.status() {
        GenerationStatus::Complete => info!(
            "Generated {}x{} rooms in {} steps: {} door pairs, {} dead ends",
            config.columns,
            config.rows,
            report.iterations,
            graph.open_door_pairs(),
            dead_ends
        ),
        status => info!(
            "Generated {}x{} rooms ({:?}, {} repaired): {} door pairs, {} dead ends",
            config.columns,
            config.rows,
            status,
            report.repaired.len(),
            graph.open_door_pairs(),
            dead_ends
        ),
    }

    Ok(GeneratedMap {
        graph,
        report,
        layers,
        room_width: config.room_width,
        room_height: config.room_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CatalogData;
    use rand::{rngs::StdRng, SeedableRng};

    fn catalog_for(config: &MapConfig) -> CatalogData {
        CatalogData::procedural(config.room_width, config.room_height, config.wall_tiles).unwrap()
    }

    #[test]
    fn test_generate_default_map() {
        let config = MapConfig::new();
        let catalog = catalog_for(&config);
        let map = generate_map(&config, &catalog, &mut StdRng::seed_from_u64(7)).unwrap();

        assert!(map.graph.is_connected());
        assert!(map.graph.doors_symmetric());
        assert!(map.graph.rooms().all(|room| room.resolved_piece.is_some()));
        assert_eq!(map.report.status(), GenerationStatus::Complete);
    }

    #[test]
    fn test_rejects_invalid_config_before_generation() {
        let mut config = MapConfig::new();
        config.map_width = 30;
        let catalog = catalog_for(&MapConfig::new());
        let result = generate_map(&config, &catalog, &mut StdRng::seed_from_u64(1));
        assert!(matches!(result, Err(MazeError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_mismatched_catalog() {
        let config = MapConfig::new();
        let catalog = CatalogData::procedural(8, 8, config.wall_tiles).unwrap();
        let result = generate_map(&config, &catalog, &mut StdRng::seed_from_u64(1));
        assert!(matches!(result, Err(MazeError::InvalidConfig(_))));
    }

    #[test]
    fn test_single_room_grid_fails_at_selection() {
        let config = MapConfig {
            columns: 1,
            rows: 1,
            ..MapConfig::for_testing()
        };
        let catalog = catalog_for(&config);
        let result = generate_map(&config, &catalog, &mut StdRng::seed_from_u64(1));
        assert!(matches!(
            result,
            Err(MazeError::InvalidDoorPattern { pattern: 0, .. })
        ));
    }
}
