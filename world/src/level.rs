//! Level parsing, the mutable tile grid and the walking route builder.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use bank_heist_core::{TileCoord, TileKind, WalkingPath, LEVEL_COLUMNS, LEVEL_ROWS};
use thiserror::Error;

const TILE_COUNT: usize = (LEVEL_COLUMNS * LEVEL_ROWS) as usize;

/// Failures raised while loading a level.
#[derive(Debug, Error)]
pub enum LevelError {
    /// The level file could not be read.
    #[error("failed to read level file {}", .path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The level text has fewer lines than the grid has rows.
    #[error("level has {found} rows, expected at least {}", LEVEL_ROWS)]
    TooFewRows {
        /// Number of lines found.
        found: usize,
    },
    /// A line is narrower than the grid.
    #[error("level row {row} has {found} columns, expected at least {}", LEVEL_COLUMNS)]
    ShortRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Number of characters found on the row.
        found: usize,
    },
    /// No `S` tile was found.
    #[error("level has no spawn tile")]
    MissingSpawn,
    /// No `G` tile was found.
    #[error("level has no gold tile")]
    MissingGold,
    /// The route from the spawn ran into a tile with nowhere left to go.
    #[error("walking route dead-ends at {at:?}")]
    DeadEnd {
        /// Last tile reached by the route.
        at: TileCoord,
    },
    /// The route loops without ever reaching the gold.
    #[error("walking route does not reach the gold within {steps} steps")]
    Cycle {
        /// Number of steps walked before giving up.
        steps: usize,
    },
}

/// Fixed-size grid of tile kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    tiles: Vec<TileKind>,
}

impl TileGrid {
    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> i32 {
        LEVEL_COLUMNS
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> i32 {
        LEVEL_ROWS
    }

    /// Tile stored at the coordinate. Anything outside the grid is a wall.
    #[must_use]
    pub fn peek(&self, tile: TileCoord) -> TileKind {
        index(tile)
            .and_then(|index| self.tiles.get(index).copied())
            .unwrap_or(TileKind::Wall)
    }

    /// Overwrites the tile at the coordinate. Writes outside the grid are ignored.
    pub(crate) fn poke(&mut self, tile: TileCoord, kind: TileKind) {
        if let Some(slot) = index(tile).and_then(|index| self.tiles.get_mut(index)) {
            *slot = kind;
        }
    }

    /// Iterates over every tile in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, TileKind)> + '_ {
        self.tiles.iter().enumerate().map(|(index, kind)| {
            let index = index as i32;
            (
                TileCoord::new(index % LEVEL_COLUMNS, index / LEVEL_COLUMNS),
                *kind,
            )
        })
    }

    fn find(&self, kind: TileKind) -> Option<TileCoord> {
        self.iter()
            .find(|(_, candidate)| *candidate == kind)
            .map(|(tile, _)| tile)
    }
}

fn index(tile: TileCoord) -> Option<usize> {
    if !tile.in_bounds() {
        return None;
    }
    usize::try_from(tile.row() * LEVEL_COLUMNS + tile.column()).ok()
}

/// Level layout as loaded from disk together with its walking route.
#[derive(Clone, Debug)]
pub struct Level {
    grid: TileGrid,
    path: WalkingPath,
}

impl Level {
    /// Parses a level from its textual representation.
    ///
    /// Extra lines and extra characters beyond the grid are ignored.
    pub fn parse(text: &str) -> Result<Self, LevelError> {
        let lines: Vec<&str> = text.lines().collect();
        let rows = LEVEL_ROWS as usize;
        let columns = LEVEL_COLUMNS as usize;
        if lines.len() < rows {
            return Err(LevelError::TooFewRows { found: lines.len() });
        }

        let mut tiles = Vec::with_capacity(TILE_COUNT);
        for (row, line) in lines.iter().take(rows).enumerate() {
            let found = line.chars().count();
            if found < columns {
                return Err(LevelError::ShortRow { row, found });
            }
            tiles.extend(line.chars().take(columns).map(TileKind::from_level_char));
        }

        let grid = TileGrid { tiles };
        let path = build_path(&grid)?;
        Ok(Self { grid, path })
    }

    /// Reads and parses the level stored at the provided path.
    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let text = fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Tile layout as it was loaded, before anything was placed on it.
    #[must_use]
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Route walked by every enemy of the level.
    #[must_use]
    pub fn path(&self) -> &WalkingPath {
        &self.path
    }
}

/// Walks from the spawn tile along the corridor until the gold is adjacent.
///
/// At a fork the last free neighbour in left, right, up, down order wins.
fn build_path(grid: &TileGrid) -> Result<WalkingPath, LevelError> {
    let spawn = grid.find(TileKind::Spawn).ok_or(LevelError::MissingSpawn)?;
    if grid.find(TileKind::Gold).is_none() {
        return Err(LevelError::MissingGold);
    }

    let mut waypoints = Vec::new();
    let mut previous = spawn;
    let mut current = spawn;
    for _ in 0..TILE_COUNT {
        waypoints.push(current);
        let neighbours = current.neighbours();

        if let Some(gold) = neighbours
            .iter()
            .rev()
            .find(|tile| grid.peek(**tile) == TileKind::Gold)
        {
            waypoints.push(*gold);
            return Ok(WalkingPath::from_waypoints(waypoints));
        }

        let next = neighbours
            .iter()
            .rev()
            .find(|tile| **tile != previous && grid.peek(**tile) == TileKind::Floor)
            .copied()
            .ok_or(LevelError::DeadEnd { at: current })?;
        previous = current;
        current = next;
    }

    Err(LevelError::Cycle { steps: TILE_COUNT })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORRIDOR: &str = "\
####################
#S.................#
##################.#
#G.................#
####################
####################
####################
####################
####################
####################
####################
####################
####################
####################
####################
";

    #[test]
    fn parses_corridor_and_builds_route() {
        let level = Level::parse(CORRIDOR).expect("valid level");
        let path = level.path();
        assert_eq!(path.spawn(), Some(TileCoord::new(1, 1)));
        assert_eq!(path.gold(), Some(TileCoord::new(1, 3)));
        assert_eq!(path.waypoints()[path.len() - 2], TileCoord::new(2, 3));
        assert_eq!(path.len(), 18 + 1 + 17 + 1);
        for pair in path.waypoints().windows(2) {
            let dx = (pair[0].column() - pair[1].column()).abs();
            let dy = (pair[0].row() - pair[1].row()).abs();
            assert_eq!(dx + dy, 1, "route must move one tile at a time");
        }
    }

    #[test]
    fn out_of_bounds_queries_yield_walls() {
        let level = Level::parse(CORRIDOR).expect("valid level");
        let grid = level.grid();
        for tile in [
            TileCoord::new(-1, 0),
            TileCoord::new(0, -1),
            TileCoord::new(LEVEL_COLUMNS, 3),
            TileCoord::new(3, LEVEL_ROWS),
            TileCoord::new(i32::MIN, i32::MAX),
        ] {
            assert_eq!(grid.peek(tile), TileKind::Wall);
        }
    }

    #[test]
    fn pokes_outside_the_grid_are_ignored() {
        let level = Level::parse(CORRIDOR).expect("valid level");
        let mut grid = level.grid().clone();
        grid.poke(TileCoord::new(-4, 2), TileKind::Floor);
        assert_eq!(&grid, level.grid());
        grid.poke(TileCoord::new(0, 0), TileKind::UziTurret);
        assert_eq!(grid.peek(TileCoord::new(0, 0)), TileKind::UziTurret);
    }

    #[test]
    fn rejects_truncated_levels() {
        let short = CORRIDOR.lines().take(5).collect::<Vec<_>>().join("\n");
        assert!(matches!(
            Level::parse(&short),
            Err(LevelError::TooFewRows { found: 5 })
        ));

        let narrow = CORRIDOR.replacen("#S.................#", "#S...", 1);
        assert!(matches!(
            Level::parse(&narrow),
            Err(LevelError::ShortRow { row: 1, found: 5 })
        ));
    }

    #[test]
    fn rejects_levels_without_a_route() {
        let no_spawn = CORRIDOR.replace('S', ".");
        assert!(matches!(
            Level::parse(&no_spawn),
            Err(LevelError::MissingSpawn)
        ));

        let no_gold = CORRIDOR.replace('G', ".");
        assert!(matches!(Level::parse(&no_gold), Err(LevelError::MissingGold)));

        let blocked = CORRIDOR.replacen("##################.#", "####################", 1);
        assert!(matches!(
            Level::parse(&blocked),
            Err(LevelError::DeadEnd { .. })
        ));
    }

    #[test]
    fn route_building_is_deterministic() {
        let first = Level::parse(CORRIDOR).expect("valid level");
        let second = Level::parse(CORRIDOR).expect("valid level");
        assert_eq!(first.path(), second.path());
    }
}
