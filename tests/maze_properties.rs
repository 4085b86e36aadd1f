//! Property tests for maze topology generation.

use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use roomweave::{
    CatalogData, Direction, GenerationStatus, MazeGenerator, PieceSelector, PieceType, TileRange,
};
use std::collections::{HashSet, VecDeque};

/// Breadth-first reachability written independently of `RoomGraph::reachable_from`.
fn reachable_count(graph: &roomweave::RoomGraph) -> usize {
    let start = graph.start().expect("generator always picks a start room");
    let mut seen = HashSet::from([start.coords()]);
    let mut queue = VecDeque::from([start.coords()]);

    while let Some((column, row)) = queue.pop_front() {
        let room = graph.room(column, row).unwrap();
        for direction in Direction::ALL {
            if !room.doors.is_open(direction) {
                continue;
            }
            if let Some(next) = graph.neighbor(column, row, direction) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
    }
    seen.len()
}

proptest! {
    #[test]
    fn generated_mazes_are_connected(seed in any::<u64>(), columns in 1usize..9, rows in 1usize..9, loops in any::<bool>()) {
        let mut generator = MazeGenerator::new(columns, rows);
        generator.loops_enabled = loops;
        let (graph, report) = generator.build_topology(&mut StdRng::seed_from_u64(seed));

        prop_assert!(graph.rooms().all(|room| room.visited));
        prop_assert_eq!(reachable_count(&graph), columns * rows);
        let expected = if columns * rows == 1 {
            GenerationStatus::Degenerate
        } else {
            GenerationStatus::Complete
        };
        prop_assert_eq!(report.status(), expected);
    }

    #[test]
    fn doors_are_symmetric(seed in any::<u64>(), columns in 1usize..9, rows in 1usize..9) {
        let (graph, _) = MazeGenerator::new(columns, rows).build_topology(&mut StdRng::seed_from_u64(seed));

        for room in graph.rooms() {
            for direction in room.doors.open_directions() {
                let (c, r) = graph.neighbor(room.column, room.row, direction)
                    .expect("open doors never face the grid edge");
                prop_assert!(graph.room(c, r).unwrap().doors.is_open(direction.opposite()));
            }
        }
    }

    #[test]
    fn perfect_mazes_are_spanning_trees(seed in any::<u64>(), columns in 1usize..9, rows in 1usize..9) {
        let generator = MazeGenerator::new(columns, rows).without_loops();
        let (graph, report) = generator.build_topology(&mut StdRng::seed_from_u64(seed));

        prop_assert!(!report.ceiling_reached);
        prop_assert!(report.repaired.is_empty());
        prop_assert_eq!(graph.open_door_pairs(), columns * rows - 1);
    }

    #[test]
    fn dead_ends_have_exactly_one_door(seed in any::<u64>(), columns in 2usize..8, rows in 2usize..8) {
        let config = roomweave::MapConfig {
            columns,
            rows,
            ..roomweave::MapConfig::new()
        };
        let catalog = CatalogData::procedural(8, 8, TileRange::new(11, 18)).unwrap();
        let selector = PieceSelector::new(&catalog);
        let generator = MazeGenerator::from_config(&config);
        let (graph, _) = generator.generate(&selector, &mut StdRng::seed_from_u64(seed)).unwrap();

        for room in graph.rooms() {
            prop_assert_eq!(room.is_dead_end, room.doors.open_count() == 1);
            let piece = room.resolved_piece.as_ref().unwrap();
            prop_assert_eq!(Some(piece.piece_type), PieceType::from_doors(room.doors));
        }
    }

    #[test]
    fn low_ceilings_still_connect_through_repair(seed in any::<u64>(), ceiling in 1u32..40) {
        let mut generator = MazeGenerator::new(6, 6).without_loops();
        generator.iteration_ceiling = ceiling;
        let (graph, report) = generator.build_topology(&mut StdRng::seed_from_u64(seed));

        prop_assert!(graph.doors_symmetric());
        let visited = graph.rooms().filter(|room| room.visited).count();
        prop_assert_eq!(visited + report.isolated.len(), graph.len());
        if report.isolated.is_empty() {
            prop_assert!(graph.is_connected());
        }
    }
}

#[test]
fn two_by_two_grid_has_three_door_pairs() {
    let generator = MazeGenerator::new(2, 2).without_loops();
    let (graph, _) = generator.build_topology(&mut StdRng::seed_from_u64(2));

    assert_eq!(graph.open_door_pairs(), 3);
    assert_eq!(graph.rooms().filter(|room| room.visited).count(), 4);
}
