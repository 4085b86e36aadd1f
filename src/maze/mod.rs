//! # Maze Module
//!
//! The grid-of-rooms topology: rooms, their doors, and the bounds-checked
//! graph that stores them.
//!
//! Rooms are addressed by `(column, row)`. Doors are always opened in pairs by
//! the generator, so the door graph stays symmetric.

pub mod generator;

pub use generator::*;

use crate::pieces::ResolvedPiece;
use pathfinding::prelude::bfs_reach;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Cardinal door directions, indexed North=0, East=1, South=2, West=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All directions in door-index order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Slot of this direction in a [`DoorSet`].
    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    /// Returns the geometrically opposite direction.
    ///
    /// # Examples
    ///
    /// ```
    /// use roomweave::Direction;
    ///
    /// assert_eq!(Direction::North.opposite(), Direction::South);
    /// assert_eq!(Direction::West.opposite(), Direction::East);
    /// ```
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Column and row deltas for one step in this direction.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }
}

/// The four door flags of a room.
///
/// Packs into a 4-bit key in `NESW` order, North being the high bit, so the
/// key reads the same as the door columns of the piece table.
///
/// # Examples
///
/// ```
/// use roomweave::DoorSet;
///
/// let doors = DoorSet::from([true, true, false, false]);
/// assert_eq!(doors.bits(), 0b1100);
/// assert_eq!(doors.open_count(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DoorSet([bool; 4]);

impl DoorSet {
    /// A door set with every door closed.
    pub fn closed() -> Self {
        Self([false; 4])
    }

    /// Rebuilds a door set from a packed `NESW` key. Bits above the low four
    /// are ignored.
    pub fn from_bits(bits: u8) -> Self {
        Self([
            bits & 0b1000 != 0,
            bits & 0b0100 != 0,
            bits & 0b0010 != 0,
            bits & 0b0001 != 0,
        ])
    }

    pub fn bits(&self) -> u8 {
        self.0
            .iter()
            .fold(0u8, |acc, &open| (acc << 1) | u8::from(open))
    }

    pub fn is_open(&self, direction: Direction) -> bool {
        self.0[direction.index()]
    }

    pub fn open(&mut self, direction: Direction) {
        self.0[direction.index()] = true;
    }

    pub fn open_count(&self) -> usize {
        self.0.iter().filter(|&&open| open).count()
    }

    /// Iterates over the directions whose doors are open.
    pub fn open_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL
            .into_iter()
            .filter(move |&direction| self.is_open(direction))
    }

    pub fn as_array(&self) -> [bool; 4] {
        self.0
    }
}

impl From<[bool; 4]> for DoorSet {
    fn from(doors: [bool; 4]) -> Self {
        Self(doors)
    }
}

/// One cell of the room grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub column: usize,
    pub row: usize,
    pub doors: DoorSet,
    /// Whether the generator has incorporated this room
    pub visited: bool,
    /// True for the traversal root only
    pub is_start: bool,
    /// Derived during finalization: exactly one door open
    pub is_dead_end: bool,
    /// Tile art chosen for this room's door pattern
    pub resolved_piece: Option<ResolvedPiece>,
}

impl Room {
    /// Creates an empty, unvisited room with every door closed.
    pub fn new(column: usize, row: usize) -> Self {
        Self {
            column,
            row,
            doors: DoorSet::closed(),
            visited: false,
            is_start: false,
            is_dead_end: false,
            resolved_piece: None,
        }
    }

    pub fn coords(&self) -> (usize, usize) {
        (self.column, self.row)
    }

    /// Recomputes the dead-end flag from the current doors.
    pub fn update_dead_end(&mut self) {
        self.is_dead_end = self.doors.open_count() == 1;
    }
}

/// The `columns × rows` matrix of rooms.
#[derive(Debug, Clone)]
pub struct RoomGraph {
    columns: usize,
    rows: usize,
    rooms: Vec<Room>,
}

impl RoomGraph {
    /// Allocates a grid of empty rooms.
    ///
    /// # Examples
    ///
    /// ```
    /// use roomweave::RoomGraph;
    ///
    /// let graph = RoomGraph::new(3, 2);
    /// assert_eq!(graph.len(), 6);
    /// assert!(graph.rooms().all(|room| !room.visited));
    /// ```
    pub fn new(columns: usize, rows: usize) -> Self {
        let rooms = (0..rows)
            .flat_map(|row| (0..columns).map(move |column| Room::new(column, row)))
            .collect();
        Self {
            columns,
            rows,
            rooms,
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn contains(&self, column: usize, row: usize) -> bool {
        column < self.columns && row < self.rows
    }

    fn index(&self, column: usize, row: usize) -> Option<usize> {
        self.contains(column, row).then(|| row * self.columns + column)
    }

    pub fn room(&self, column: usize, row: usize) -> Option<&Room> {
        self.index(column, row).map(|i| &self.rooms[i])
    }

    pub fn room_mut(&mut self, column: usize, row: usize) -> Option<&mut Room> {
        self.index(column, row).map(move |i| &mut self.rooms[i])
    }

    /// Iterates over rooms in raster order.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter()
    }

    pub fn rooms_mut(&mut self) -> impl Iterator<Item = &mut Room> {
        self.rooms.iter_mut()
    }

    /// Coordinates of the room one step away in `direction`, if inside the grid.
    pub fn neighbor(&self, column: usize, row: usize, direction: Direction) -> Option<(usize, usize)> {
        let (dc, dr) = direction.delta();
        let column = column.checked_add_signed(dc)?;
        let row = row.checked_add_signed(dr)?;
        self.contains(column, row).then_some((column, row))
    }

    /// Opens one door of one room. Symmetry is the caller's concern.
    pub fn open_door(&mut self, column: usize, row: usize, direction: Direction) {
        if let Some(room) = self.room_mut(column, row) {
            room.doors.open(direction);
        }
    }

    /// Opens the door toward `direction` and the matching door on the
    /// neighbor. Returns the neighbor's coordinates, or `None` when there is
    /// no neighbor in that direction.
    pub fn open_door_pair(
        &mut self,
        column: usize,
        row: usize,
        direction: Direction,
    ) -> Option<(usize, usize)> {
        let (nc, nr) = self.neighbor(column, row, direction)?;
        self.open_door(column, row, direction);
        self.open_door(nc, nr, direction.opposite());
        Some((nc, nr))
    }

    /// The start room, if one has been chosen.
    pub fn start(&self) -> Option<&Room> {
        self.rooms.iter().find(|room| room.is_start)
    }

    /// Rooms reachable from `(column, row)` through open doors, including itself.
    pub fn reachable_from(&self, column: usize, row: usize) -> HashSet<(usize, usize)> {
        if !self.contains(column, row) {
            return HashSet::new();
        }
        bfs_reach((column, row), |&(c, r)| {
            self.room(c, r)
                .map(|room| {
                    room.doors
                        .open_directions()
                        .filter_map(|direction| self.neighbor(c, r, direction))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default()
        })
        .collect()
    }

    /// Checks that every room is reachable from the start room.
    pub fn is_connected(&self) -> bool {
        match self.start() {
            Some(start) => self.reachable_from(start.column, start.row).len() == self.len(),
            None => false,
        }
    }

    /// Number of open doors, counting each connected pair once.
    pub fn open_door_pairs(&self) -> usize {
        let mut pairs = 0;
        for room in &self.rooms {
            for direction in [Direction::East, Direction::South] {
                if room.doors.is_open(direction)
                    && self.neighbor(room.column, room.row, direction).is_some()
                {
                    pairs += 1;
                }
            }
        }
        pairs
    }

    /// Checks that every open door has a matching open door on its neighbor.
    pub fn doors_symmetric(&self) -> bool {
        self.rooms.iter().all(|room| {
            room.doors.open_directions().all(|direction| {
                self.neighbor(room.column, room.row, direction)
                    .and_then(|(c, r)| self.room(c, r))
                    .is_some_and(|neighbor| neighbor.doors.is_open(direction.opposite()))
            })
        })
    }

    pub fn dead_ends(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(|room| room.is_dead_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_is_involution() {
        for direction in Direction::ALL {
            assert_ne!(direction.opposite(), direction);
            assert_eq!(direction.opposite().opposite(), direction);
        }
        assert_eq!(Direction::East.opposite(), Direction::West);
    }

    #[test]
    fn test_door_set_bits() {
        assert_eq!(DoorSet::closed().bits(), 0);
        assert_eq!(DoorSet::from([true, false, false, false]).bits(), 0b1000);
        assert_eq!(DoorSet::from([false, false, false, true]).bits(), 0b0001);
        for bits in 0..16u8 {
            assert_eq!(DoorSet::from_bits(bits).bits(), bits);
        }
    }

    #[test]
    fn test_neighbor_bounds() {
        let graph = RoomGraph::new(3, 2);

        assert_eq!(graph.neighbor(0, 0, Direction::North), None);
        assert_eq!(graph.neighbor(0, 0, Direction::West), None);
        assert_eq!(graph.neighbor(0, 0, Direction::East), Some((1, 0)));
        assert_eq!(graph.neighbor(0, 0, Direction::South), Some((0, 1)));
        assert_eq!(graph.neighbor(2, 1, Direction::East), None);
        assert_eq!(graph.neighbor(2, 1, Direction::South), None);
        assert_eq!(graph.neighbor(2, 1, Direction::North), Some((2, 0)));
    }

    #[test]
    fn test_open_door_does_not_touch_neighbor() {
        let mut graph = RoomGraph::new(2, 1);
        graph.open_door(0, 0, Direction::East);

        assert!(graph.room(0, 0).unwrap().doors.is_open(Direction::East));
        assert!(!graph.room(1, 0).unwrap().doors.is_open(Direction::West));
        assert!(!graph.doors_symmetric());
    }

    #[test]
    fn test_open_door_pair() {
        let mut graph = RoomGraph::new(2, 2);

        assert_eq!(graph.open_door_pair(0, 0, Direction::South), Some((0, 1)));
        assert_eq!(graph.open_door_pair(0, 0, Direction::North), None);
        assert!(!graph.room(0, 0).unwrap().doors.is_open(Direction::North));
        assert!(graph.doors_symmetric());
        assert_eq!(graph.open_door_pairs(), 1);
    }

    #[test]
    fn test_reachability() {
        let mut graph = RoomGraph::new(3, 1);
        graph.room_mut(0, 0).unwrap().is_start = true;
        graph.open_door_pair(0, 0, Direction::East);

        assert_eq!(graph.reachable_from(0, 0).len(), 2);
        assert!(!graph.is_connected());

        graph.open_door_pair(1, 0, Direction::East);
        assert!(graph.is_connected());
    }

    #[test]
    fn test_dead_end_flag() {
        let mut room = Room::new(0, 0);
        room.update_dead_end();
        assert!(!room.is_dead_end);

        room.doors.open(Direction::North);
        room.update_dead_end();
        assert!(room.is_dead_end);

        room.doors.open(Direction::West);
        room.update_dead_end();
        assert!(!room.is_dead_end);
    }
}
