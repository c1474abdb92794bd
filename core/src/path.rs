//! Tile coordinates and the walking route shared by every moving entity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{LEVEL_COLUMNS, LEVEL_ROWS, TILE_LENGTH};

/// Integer coordinate of a tile within the level grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    column: i32,
    row: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column of the tile.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row of the tile.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Tile containing the provided world position.
    ///
    /// Positions left of or above the grid map to negative coordinates.
    #[must_use]
    pub fn containing(position: Vec2) -> Self {
        let scaled = position / TILE_LENGTH;
        Self::new(scaled.x.floor() as i32, scaled.y.floor() as i32)
    }

    /// Top-left corner of the tile in world units.
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.column as f32, self.row as f32) * TILE_LENGTH
    }

    /// Centre of the tile in world units.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.origin() + Vec2::splat(TILE_LENGTH * 0.5)
    }

    /// Reports whether a world position lies within the tile, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let origin = self.origin();
        point.x >= origin.x
            && point.x <= origin.x + TILE_LENGTH
            && point.y >= origin.y
            && point.y <= origin.y + TILE_LENGTH
    }

    /// Reports whether the coordinate addresses a tile of the level grid.
    #[must_use]
    pub const fn in_bounds(&self) -> bool {
        self.column >= 0 && self.column < LEVEL_COLUMNS && self.row >= 0 && self.row < LEVEL_ROWS
    }

    /// Orthogonal neighbours in left, right, up, down order.
    #[must_use]
    pub const fn neighbours(&self) -> [Self; 4] {
        [
            Self::new(self.column - 1, self.row),
            Self::new(self.column + 1, self.row),
            Self::new(self.column, self.row - 1),
            Self::new(self.column, self.row + 1),
        ]
    }
}

/// Ordered route from the spawn tile to the gold tile.
///
/// A path position `t` counts waypoints: `t = 0` is the spawn and
/// `t = len - 1` is the gold.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WalkingPath {
    waypoints: Vec<TileCoord>,
}

impl WalkingPath {
    /// Creates a path visiting the provided waypoints in order.
    #[must_use]
    pub fn from_waypoints(waypoints: Vec<TileCoord>) -> Self {
        Self { waypoints }
    }

    /// Waypoints of the route in walking order.
    #[must_use]
    pub fn waypoints(&self) -> &[TileCoord] {
        &self.waypoints
    }

    /// Number of waypoints on the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Reports whether the route has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Number of unit segments joining consecutive waypoints.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    /// First waypoint of the route.
    #[must_use]
    pub fn spawn(&self) -> Option<TileCoord> {
        self.waypoints.first().copied()
    }

    /// Last waypoint of the route.
    #[must_use]
    pub fn gold(&self) -> Option<TileCoord> {
        self.waypoints.last().copied()
    }

    /// Resolves a path position into tile units.
    ///
    /// Positions are clamped to the route and NaN collapses to the spawn.
    #[must_use]
    pub fn resolve(&self, t: f32) -> Vec2 {
        if self.waypoints.is_empty() {
            return Vec2::ZERO;
        }
        let last = self.segment_count();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, last as f32) };
        let lower = (t.floor() as usize).min(last);
        let upper = (t.ceil() as usize).min(last);
        let from = as_vec(self.waypoints[lower]);
        let to = as_vec(self.waypoints[upper]);
        from.lerp(to, t - lower as f32)
    }

    /// Resolves a path position into the world-space top-left corner of the
    /// sprite walking the route.
    #[must_use]
    pub fn resolve_world(&self, t: f32) -> Vec2 {
        self.resolve(t) * TILE_LENGTH
    }
}

fn as_vec(tile: TileCoord) -> Vec2 {
    Vec2::new(tile.column as f32, tile.row as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elbow() -> WalkingPath {
        WalkingPath::from_waypoints(vec![
            TileCoord::new(1, 1),
            TileCoord::new(2, 1),
            TileCoord::new(3, 1),
            TileCoord::new(3, 2),
            TileCoord::new(3, 3),
        ])
    }

    #[test]
    fn resolve_hits_spawn_and_gold_at_the_extremes() {
        let path = elbow();
        assert_eq!(path.resolve(0.0), Vec2::new(1.0, 1.0));
        assert_eq!(path.resolve(4.0), Vec2::new(3.0, 3.0));
        assert_eq!(path.resolve(1_000.0), Vec2::new(3.0, 3.0));
        assert_eq!(path.resolve(-2.0), Vec2::new(1.0, 1.0));
        assert_eq!(path.resolve(f32::NAN), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn resolve_is_continuous_across_waypoints() {
        let path = elbow();
        let epsilon = 0.001;
        let mut t = 0.0;
        while t < 4.0 {
            let step = path.resolve(t + epsilon) - path.resolve(t);
            assert!(step.length() <= epsilon + 1e-4, "jump at t = {t}");
            t += 0.01;
        }
    }

    #[test]
    fn resolve_interpolates_between_waypoints() {
        let path = elbow();
        let midway = path.resolve(2.5);
        assert!((midway - Vec2::new(3.0, 1.5)).length() < 1e-5);
    }

    #[test]
    fn empty_and_single_paths_resolve_safely() {
        assert_eq!(WalkingPath::default().resolve(3.0), Vec2::ZERO);
        let single = WalkingPath::from_waypoints(vec![TileCoord::new(4, 5)]);
        assert_eq!(single.resolve(2.0), Vec2::new(4.0, 5.0));
        assert_eq!(single.segment_count(), 0);
    }

    #[test]
    fn containment_includes_tile_edges() {
        let tile = TileCoord::new(2, 3);
        assert!(tile.contains(Vec2::new(32.0, 48.0)));
        assert!(tile.contains(Vec2::new(48.0, 64.0)));
        assert!(!tile.contains(Vec2::new(48.1, 50.0)));
        assert_eq!(TileCoord::containing(Vec2::new(40.0, 50.0)), tile);
        assert_eq!(
            TileCoord::containing(Vec2::new(-0.5, 3.0)),
            TileCoord::new(-1, 0)
        );
    }

    #[test]
    fn bounds_follow_level_dimensions() {
        assert!(TileCoord::new(0, 0).in_bounds());
        assert!(TileCoord::new(19, 14).in_bounds());
        assert!(!TileCoord::new(20, 0).in_bounds());
        assert!(!TileCoord::new(0, -1).in_bounds());
    }
}
