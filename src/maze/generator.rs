//! # Maze Generation
//!
//! Builds a connected [`RoomGraph`] with a randomized depth-first traversal.
//!
//! A run moves through a fixed sequence of phases:
//! 1. Traverse the grid with an explicit stack, opening a door pair for every
//!    first valid move and backtracking on dead ends
//! 2. Repair any room the traversal missed by joining it to a visited neighbor
//! 3. Optionally inject loops by opening random extra door pairs
//! 4. Finalize: flag dead ends and audit the result, so the report describes
//!    the graph as it ends up after loop injection
//!
//! [`MazeGenerator::generate`] then resolves a piece for every room.
//!
//! Traversal is bounded by an iteration ceiling. Hitting it is recoverable and
//! recorded in the [`GenerationReport`].

use crate::pieces::{PieceCatalog, PieceSelector};
use crate::{defaults, Direction, MapConfig, MazeResult, Room, RoomGraph};
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;

/// Phases of a generation run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPhase {
    Idle,
    Traversing,
    Repairing,
    Looping,
    Finalizing,
    Done,
}

/// Overall outcome of the topology phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStatus {
    /// Traversal visited every room on its own
    Complete,
    /// The repair pass had to join one or more rooms
    Repaired,
    /// Every room is reachable but some room has no door, as in a 1×1 grid
    Degenerate,
    /// At least one room has no visited neighbor and stays unreachable
    Disconnected,
}

/// What happened during a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Traversal steps taken
    pub iterations: u32,
    /// Whether traversal stopped at the ceiling with rooms still on the stack
    pub ceiling_reached: bool,
    /// Rooms joined to the maze by the repair pass
    pub repaired: Vec<(usize, usize)>,
    /// Rooms still unreachable from the start room once generation finishes
    pub isolated: Vec<(usize, usize)>,
    /// Rooms left with every door closed
    pub doorless: Vec<(usize, usize)>,
    /// Door pairs opened by loop injection
    pub loops_added: u32,
}

impl GenerationReport {
    pub fn status(&self) -> GenerationStatus {
        if !self.isolated.is_empty() {
            GenerationStatus::Disconnected
        } else if !self.doorless.is_empty() {
            GenerationStatus::Degenerate
        } else if !self.repaired.is_empty() {
            GenerationStatus::Repaired
        } else {
            GenerationStatus::Complete
        }
    }
}

/// Settings for the topology generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeGenerator {
    pub columns: usize,
    pub rows: usize,
    pub iteration_ceiling: u32,
    pub loops_enabled: bool,
    pub loop_iterations: u32,
}

impl MazeGenerator {
    /// Creates a generator for a `columns × rows` grid with default tunables.
    ///
    /// # Examples
    ///
    /// ```
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use roomweave::MazeGenerator;
    ///
    /// let generator = MazeGenerator::new(4, 4);
    /// let mut rng = StdRng::seed_from_u64(1);
    /// let (graph, _report) = generator.build_topology(&mut rng);
    /// assert!(graph.is_connected());
    /// ```
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            iteration_ceiling: defaults::ITERATION_CEILING,
            loops_enabled: true,
            loop_iterations: defaults::LOOP_ITERATIONS,
        }
    }

    pub fn from_config(config: &MapConfig) -> Self {
        Self {
            columns: config.columns,
            rows: config.rows,
            iteration_ceiling: config.iteration_ceiling,
            loops_enabled: config.loops_enabled,
            loop_iterations: config.loop_iterations,
        }
    }

    /// Disables loop injection, producing a perfect maze.
    pub fn without_loops(mut self) -> Self {
        self.loops_enabled = false;
        self
    }

    /// Runs traversal, repair, loop injection and finalization.
    pub fn build_topology<R: Rng + ?Sized>(&self, rng: &mut R) -> (RoomGraph, GenerationReport) {
        let mut run = GenerationRun::new(self);
        while run.phase != GenerationPhase::Done {
            run.advance(rng);
        }
        (run.graph, run.report)
    }

    /// Runs every phase, resolving a piece for each room.
    ///
    /// Fails when a room reaches selection with a door pattern that has no
    /// piece, which only happens when topology generation left it isolated.
    pub fn generate<C, R>(
        &self,
        selector: &PieceSelector<'_, C>,
        rng: &mut R,
    ) -> MazeResult<(RoomGraph, GenerationReport)>
    where
        C: PieceCatalog + ?Sized,
        R: Rng + ?Sized,
    {
        let (mut graph, report) = self.build_topology(rng);
        resolve_pieces(&mut graph, selector, rng)?;
        Ok((graph, report))
    }
}

/// Resolves a piece for every room of a finished graph.
pub fn resolve_pieces<C, R>(
    graph: &mut RoomGraph,
    selector: &PieceSelector<'_, C>,
    rng: &mut R,
) -> MazeResult<()>
where
    C: PieceCatalog + ?Sized,
    R: Rng + ?Sized,
{
    for room in graph.rooms_mut() {
        let piece = selector.select(room, rng)?;
        room.resolved_piece = Some(piece);
    }
    Ok(())
}

/// Mutable state of one run of the topology state machine.
struct GenerationRun<'g> {
    settings: &'g MazeGenerator,
    phase: GenerationPhase,
    graph: RoomGraph,
    stack: Vec<(usize, usize)>,
    report: GenerationReport,
}

impl<'g> GenerationRun<'g> {
    fn new(settings: &'g MazeGenerator) -> Self {
        Self {
            settings,
            phase: GenerationPhase::Idle,
            graph: RoomGraph::new(settings.columns, settings.rows),
            stack: Vec::new(),
            report: GenerationReport::default(),
        }
    }

    /// Executes the current phase and moves to the next one.
    fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.phase = match self.phase {
            GenerationPhase::Idle => {
                self.initialize(rng);
                GenerationPhase::Traversing
            }
            GenerationPhase::Traversing => {
                self.traverse(rng);
                GenerationPhase::Repairing
            }
            GenerationPhase::Repairing => {
                self.repair(rng);
                if self.settings.loops_enabled {
                    GenerationPhase::Looping
                } else {
                    GenerationPhase::Finalizing
                }
            }
            GenerationPhase::Looping => {
                self.inject_loops(rng);
                GenerationPhase::Finalizing
            }
            GenerationPhase::Finalizing => {
                self.finalize();
                GenerationPhase::Done
            }
            GenerationPhase::Done => return,
        };
        debug!("Generation phase: {:?}", self.phase);
    }

    fn initialize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.graph.is_empty() {
            return;
        }
        let column = rng.gen_range(0..self.graph.columns());
        let row = rng.gen_range(0..self.graph.rows());
        if let Some(start) = self.graph.room_mut(column, row) {
            start.visited = true;
            start.is_start = true;
        }
        self.stack.push((column, row));
        debug!("Start room at ({}, {})", column, row);
    }

    /// Randomized depth-first traversal with backtracking.
    fn traverse<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut iterations = 0;

        while let Some(&(column, row)) = self.stack.last() {
            if iterations >= self.settings.iteration_ceiling {
                break;
            }
            iterations += 1;

            let mut directions = Direction::ALL;
            directions.shuffle(rng);

            let next = directions.into_iter().find_map(|direction| {
                let (nc, nr) = self.graph.neighbor(column, row, direction)?;
                let unvisited = self.graph.room(nc, nr).is_some_and(|room| !room.visited);
                unvisited.then_some((direction, nc, nr))
            });

            match next {
                Some((direction, nc, nr)) => {
                    self.graph.open_door_pair(column, row, direction);
                    if let Some(room) = self.graph.room_mut(nc, nr) {
                        room.visited = true;
                    }
                    self.stack.push((nc, nr));
                }
                None => {
                    self.stack.pop();
                }
            }
        }

        self.report.iterations = iterations;
        if !self.stack.is_empty() {
            self.report.ceiling_reached = true;
            warn!(
                "Traversal ceiling of {} steps reached with {} rooms on the stack; repairing",
                self.settings.iteration_ceiling,
                self.stack.len()
            );
        }
        self.stack.clear();
    }

    /// Single raster-order pass joining unvisited rooms to a visited neighbor.
    fn repair<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for row in 0..self.graph.rows() {
            for column in 0..self.graph.columns() {
                let visited = self.graph.room(column, row).is_some_and(|room| room.visited);
                if visited {
                    continue;
                }

                let candidates: Vec<Direction> = Direction::ALL
                    .into_iter()
                    .filter(|&direction| {
                        self.graph
                            .neighbor(column, row, direction)
                            .and_then(|(nc, nr)| self.graph.room(nc, nr))
                            .is_some_and(|neighbor| neighbor.visited)
                    })
                    .collect();

                match candidates.choose(rng) {
                    Some(&direction) => {
                        self.graph.open_door_pair(column, row, direction);
                        if let Some(room) = self.graph.room_mut(column, row) {
                            room.visited = true;
                        }
                        self.report.repaired.push((column, row));
                    }
                    None => self.report.isolated.push((column, row)),
                }
            }
        }

        if !self.report.repaired.is_empty() {
            info!("Repair pass joined {} rooms", self.report.repaired.len());
        }
        if !self.report.isolated.is_empty() {
            warn!(
                "{} rooms have no visited neighbor and remain disconnected: {:?}",
                self.report.isolated.len(),
                self.report.isolated
            );
        }
    }

    /// Flags dead ends and brings the report in line with the final graph.
    ///
    /// Loop injection may have joined rooms that repair could not, so
    /// `isolated` is narrowed to rooms still unreachable from the start.
    fn finalize(&mut self) {
        for room in self.graph.rooms_mut() {
            room.update_dead_end();
        }

        let reachable = self
            .graph
            .start()
            .map(|start| self.graph.reachable_from(start.column, start.row))
            .unwrap_or_default();
        let before = self.report.isolated.len();
        self.report.isolated.retain(|coords| !reachable.contains(coords));
        if self.report.isolated.len() < before {
            debug!(
                "Loop injection joined {} previously isolated rooms",
                before - self.report.isolated.len()
            );
        }

        self.report.doorless = self
            .graph
            .rooms()
            .filter(|room| room.doors.open_count() == 0)
            .map(Room::coords)
            .collect();
        if !self.report.doorless.is_empty() {
            warn!(
                "{} rooms have no open door: {:?}",
                self.report.doorless.len(),
                self.report.doorless
            );
        }
    }

    /// Opens random extra door pairs. Never closes a door.
    fn inject_loops<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.graph.is_empty() {
            return;
        }
        for _ in 0..self.settings.loop_iterations {
            let column = rng.gen_range(0..self.graph.columns());
            let row = rng.gen_range(0..self.graph.rows());
            let direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];

            let already_open = self
                .graph
                .room(column, row)
                .is_some_and(|room| room.doors.is_open(direction));
            if !already_open && self.graph.open_door_pair(column, row, direction).is_some() {
                self.report.loops_added += 1;
            }
        }
        debug!("Loop injection opened {} door pairs", self.report.loops_added);
    }
}
