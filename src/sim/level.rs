//! Level: the live brick set for one stage
//!
//! Bricks live in a flat collection keyed by id and are also indexed by row.
//! Ball collision checks only look at the rows a ball spans (plus one frame
//! ahead), so a check costs O(bricks in nearby rows) instead of O(all bricks).
//! Destroying a brick removes it from both collections in one step.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;
use rand::Rng;

use super::brick::{Brick, MoveContext, MovingState};
use super::brick_map::{BrickMap, Cell};
use super::geometry::Rect;
use crate::error::SimError;
use crate::settings::Settings;

/// Where level layouts come from
#[derive(Debug, Clone, Default)]
pub enum LevelSource {
    /// Random map per level, density driven by difficulty
    #[default]
    Procedural,
    /// Hand-made layouts; running past the last one ends the game
    Fixed(Vec<BrickMap>),
}

impl LevelSource {
    /// Brick map for the level at `index`
    pub fn map_for(
        &self,
        index: u32,
        settings: &Settings,
        difficulty: f32,
        rng: &mut impl Rng,
    ) -> Result<BrickMap, SimError> {
        match self {
            LevelSource::Procedural => Ok(BrickMap::generate(
                settings.max_bricks_x(),
                settings.max_bricks_y(),
                difficulty,
                settings.moving_brick_chance,
                rng,
            )),
            LevelSource::Fixed(maps) => {
                let map = maps
                    .get(index as usize)
                    .ok_or(SimError::NoMoreLevels { index })?;
                let (max_x, max_y) = (settings.max_bricks_x(), settings.max_bricks_y());
                if map.cols() > max_x || map.rows() > max_y {
                    return Err(SimError::InvalidLayout {
                        line: if map.cols() > max_x { 1 } else { max_y + 1 },
                        reason: format!(
                            "layout is {}x{} but the playfield holds {}x{} bricks",
                            map.cols(),
                            map.rows(),
                            max_x,
                            max_y
                        ),
                    });
                }
                Ok(map.clone())
            }
        }
    }

    /// Parse fixed layouts separated by blank-line-delimited `---` markers
    pub fn parse_fixed(text: &str) -> Result<Self, SimError> {
        let maps = text
            .split("---")
            .filter(|chunk| !chunk.trim().is_empty())
            .map(BrickMap::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(LevelSource::Fixed(maps))
    }
}

/// A playable level
#[derive(Debug, Clone)]
pub struct Level {
    /// Zero-based level index
    pub index: u32,
    pub max_bricks_x: usize,
    pub max_bricks_y: usize,
    brick_size: (f32, f32),
    screen_width: f32,
    bricks: BTreeMap<u32, Brick>,
    rows: BTreeMap<usize, Vec<u32>>,
    next_id: u32,
}

impl Level {
    /// Build the level at `index` from `source`
    pub fn new(
        index: u32,
        settings: &Settings,
        difficulty: f32,
        source: &LevelSource,
        rng: &mut impl Rng,
    ) -> Result<Self, SimError> {
        let map = source.map_for(index, settings, difficulty, rng)?;
        let level = Self::from_map(index, &map, settings, rng);
        log::info!(
            "Level {} loaded: {} bricks ({} moving), difficulty {:.1}",
            level.level_number(),
            level.brick_count(),
            level.bricks.values().filter(|b| b.is_moving()).count(),
            difficulty
        );
        Ok(level)
    }

    /// Instantiate one brick per occupied cell
    pub fn from_map(index: u32, map: &BrickMap, settings: &Settings, rng: &mut impl Rng) -> Self {
        let mut level = Self::empty(
            index,
            settings.max_bricks_x(),
            settings.max_bricks_y(),
            settings,
        );
        let (w, h) = settings.brick_size;
        for (col, row, cell) in map.occupied() {
            let rect = Rect::new(col as f32 * w, row as f32 * h, w, h);
            match cell {
                Cell::Static => {
                    level.insert(|id| Brick::new_static(id, rect, row));
                }
                Cell::Moving => {
                    let state = MovingState::new(settings.moving_brick_speed, rng.random_bool(0.5));
                    level.insert(|id| Brick::new_moving(id, rect, row, state));
                }
                Cell::Empty => {}
            }
        }
        level
    }

    /// A level with no bricks
    pub fn empty(index: u32, max_bricks_x: usize, max_bricks_y: usize, settings: &Settings) -> Self {
        Self {
            index,
            max_bricks_x,
            max_bricks_y,
            brick_size: settings.brick_size,
            screen_width: settings.screen_width,
            bricks: BTreeMap::new(),
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Add a brick built from a fresh id; registers it in its row bucket
    pub fn insert(&mut self, build: impl FnOnce(u32) -> Brick) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        let brick = build(id);
        self.rows.entry(brick.row).or_default().push(id);
        self.bricks.insert(id, brick);
        id
    }

    /// One-based number for display
    pub fn level_number(&self) -> u32 {
        self.index + 1
    }

    /// Advance moving bricks one frame
    pub fn update(&mut self) {
        let moving: Vec<u32> = self
            .bricks
            .values()
            .filter(|b| b.is_moving() && !b.is_destroyed)
            .map(|b| b.id)
            .collect();

        for id in moving {
            let Some(ctx) = self.move_context(id) else {
                continue;
            };
            if let Some(brick) = self.bricks.get_mut(&id) {
                brick.update(ctx);
            }
        }
    }

    fn move_context(&self, id: u32) -> Option<MoveContext> {
        let brick = self.bricks.get(&id)?;
        let probe = brick.probe_rect()?;
        let blocked = self
            .row_bricks(brick.row)
            .any(|other| other.id != id && other.rect.overlaps(&probe));
        Some(MoveContext {
            frozen: self.should_be_frozen(id),
            blocked,
            screen_width: self.screen_width,
        })
    }

    /// Moving bricks freeze while their row is more than half full
    pub fn should_be_frozen(&self, id: u32) -> bool {
        let Some(brick) = self.bricks.get(&id) else {
            return false;
        };
        self.row_occupancy(brick.row) as f32 > self.max_bricks_x as f32 / 2.0
    }

    /// Live bricks in `row`
    pub fn row_occupancy(&self, row: usize) -> usize {
        self.row_bricks(row).count()
    }

    fn row_bricks(&self, row: usize) -> impl Iterator<Item = &Brick> + '_ {
        self.rows
            .get(&row)
            .into_iter()
            .flatten()
            .filter_map(|id| self.bricks.get(id))
            .filter(|b| !b.is_destroyed)
    }

    /// True once every brick is destroyed
    pub fn is_level_complete(&self) -> bool {
        self.bricks.values().all(|b| b.is_destroyed)
    }

    /// Rows a ball spans now, plus the row its leading edge reaches next frame
    pub fn get_ball_collision_rows(&self, ball_rect: &Rect, ball_velocity: Vec2) -> Vec<usize> {
        let h = self.brick_size.1;
        let mut rows = BTreeSet::new();

        let top = (ball_rect.top() / h).floor() as i64;
        // Bottom edge is exclusive: a ball resting on a row boundary is not in the row below
        let bottom = ((ball_rect.bottom() / h).ceil() as i64 - 1).max(top);
        rows.extend(top..=bottom);

        if ball_velocity.y > 0.0 {
            rows.insert(((ball_rect.bottom() + ball_velocity.y) / h).ceil() as i64 - 1);
        } else if ball_velocity.y < 0.0 {
            rows.insert(((ball_rect.top() + ball_velocity.y) / h).floor() as i64);
        }

        rows.into_iter()
            .filter(|&r| r >= 0 && (r as usize) < self.max_bricks_y)
            .map(|r| r as usize)
            .collect()
    }

    /// Brick ids in the given rows, row by row, in insertion order
    pub fn bricks_in_rows(&self, rows: &[usize]) -> Vec<u32> {
        rows.iter()
            .filter_map(|row| self.rows.get(row))
            .flatten()
            .copied()
            .collect()
    }

    /// Remove a brick from the flat collection and its row bucket
    pub fn destroy_brick(&mut self, id: u32) -> Option<Brick> {
        let mut brick = self.bricks.remove(&id)?;
        brick.destroy();
        if let Some(bucket) = self.rows.get_mut(&brick.row) {
            bucket.retain(|&other| other != id);
            if bucket.is_empty() {
                self.rows.remove(&brick.row);
            }
        }
        Some(brick)
    }

    pub fn brick(&self, id: u32) -> Option<&Brick> {
        self.bricks.get(&id)
    }

    /// All live bricks, for drawing
    pub fn bricks(&self) -> impl Iterator<Item = &Brick> + '_ {
        self.bricks.values()
    }

    pub fn brick_count(&self) -> usize {
        self.bricks.len()
    }

    /// Ids registered in a row bucket
    pub fn row_bucket(&self, row: usize) -> &[u32] {
        self.rows.get(&row).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    fn level_from(layout: &str) -> Level {
        let map = BrickMap::parse(layout).unwrap();
        Level::from_map(0, &map, &Settings::default(), &mut rng())
    }

    #[test]
    fn test_row_buckets_match_bricks() {
        let settings = Settings {
            difficulty: 6.0,
            ..Default::default()
        };
        let level = Level::new(0, &settings, 6.0, &LevelSource::Procedural, &mut rng()).unwrap();
        let bucketed: usize = (0..level.max_bricks_y).map(|r| level.row_bucket(r).len()).sum();
        assert_eq!(bucketed, level.brick_count());
        for row in 0..level.max_bricks_y {
            for id in level.row_bucket(row) {
                assert_eq!(level.brick(*id).map(|b| b.row), Some(row));
            }
        }
    }

    #[test]
    fn test_brick_positions_from_grid() {
        let level = level_from("00000000\n00100000");
        let brick = level.bricks().next().unwrap();
        assert_eq!(brick.rect, Rect::new(200.0, 20.0, 100.0, 20.0));
        assert_eq!(brick.row, 1);
    }

    #[test]
    fn test_destroy_is_atomic() {
        let mut level = level_from("11000000\n00100000");
        let ids: Vec<u32> = level.row_bucket(0).to_vec();
        let removed = level.destroy_brick(ids[0]).unwrap();

        assert!(removed.is_destroyed);
        assert!(level.brick(ids[0]).is_none());
        assert!(!level.row_bucket(0).contains(&ids[0]));
        assert_eq!(level.row_bucket(0), &[ids[1]]);
        assert!(level.destroy_brick(ids[0]).is_none());
    }

    #[test]
    fn test_level_complete_after_all_destroyed() {
        let mut level = level_from("10100000\n00020000");
        let ids: Vec<u32> = level.bricks().map(|b| b.id).collect();
        assert_eq!(ids.len(), 3);
        for (i, id) in ids.iter().enumerate() {
            assert!(!level.is_level_complete());
            level.destroy_brick(*id);
            assert_eq!(level.brick_count(), ids.len() - i - 1);
        }
        assert!(level.is_level_complete());
    }

    #[test]
    fn test_collision_rows_single_row() {
        let level = level_from("00000000\n00000000\n00000000\n00000000");
        // Ball fully inside row 2
        let rect = Rect::new(100.0, 41.0, 18.0, 18.0);
        assert_eq!(level.get_ball_collision_rows(&rect, Vec2::ZERO), vec![2]);
        // Downward, reaching row 3 next frame
        assert_eq!(
            level.get_ball_collision_rows(&rect, Vec2::new(0.0, 5.0)),
            vec![2, 3]
        );
        // Upward, reaching row 1 next frame
        assert_eq!(
            level.get_ball_collision_rows(&rect, Vec2::new(1.0, -5.0)),
            vec![1, 2]
        );
    }

    #[test]
    fn test_collision_rows_exact_row_rect() {
        let level = level_from("00000000\n00000000\n00000000\n00000000");
        let rect = Rect::new(0.0, 40.0, 100.0, 20.0);
        assert_eq!(level.get_ball_collision_rows(&rect, Vec2::ZERO), vec![2]);
    }

    #[test]
    fn test_collision_rows_outside_grid() {
        let level = level_from("00000000\n00000000");
        // Rows 20-21 and 19 next frame, past the 15-row playfield
        let rect = Rect::new(0.0, 400.0, 30.0, 30.0);
        assert!(level.get_ball_collision_rows(&rect, Vec2::new(0.0, -5.0)).is_empty());
    }

    #[test]
    fn test_dense_row_freezes_moving_bricks() {
        // 5 of 8 cells occupied: more than half
        let mut level = level_from("21111000");
        let moving_id = level.bricks().find(|b| b.is_moving()).unwrap().id;
        let before = level.brick(moving_id).unwrap().rect;

        assert!(level.should_be_frozen(moving_id));
        level.update();
        assert_eq!(level.brick(moving_id).unwrap().rect, before);
    }

    #[test]
    fn test_narrow_layout_uses_playfield_width() {
        // 3 of 8 playfield columns occupied, though the layout is only 4 wide
        let mut level = level_from("1102");
        assert_eq!(level.max_bricks_x, 8);
        assert_eq!(level.max_bricks_y, 15);
        let id = level.bricks().find(|b| b.is_moving()).unwrap().id;
        assert!(!level.should_be_frozen(id));
        let before = level.brick(id).unwrap().rect.x;
        for _ in 0..3 {
            level.update();
        }
        assert_ne!(level.brick(id).unwrap().rect.x, before);
    }

    #[test]
    fn test_fixed_layout_wider_than_playfield_rejected() {
        let source = LevelSource::parse_fixed("111111111
").unwrap();
        let err = Level::new(0, &Settings::default(), 1.0, &source, &mut rng()).unwrap_err();
        assert!(matches!(err, SimError::InvalidLayout { line: 1, .. }));
    }

    #[test]
    fn test_sparse_row_moves_and_unfreezes() {
        let mut level = level_from("20000000");
        let id = level.bricks().next().unwrap().id;
        assert!(!level.should_be_frozen(id));
        let before = level.brick(id).unwrap().rect.x;
        for _ in 0..3 {
            level.update();
        }
        assert_ne!(level.brick(id).unwrap().rect.x, before);
    }

    #[test]
    fn test_moving_brick_never_overlaps_neighbor() {
        let mut level = level_from("00200100");
        for _ in 0..600 {
            level.update();
            let bricks: Vec<&Brick> = level.bricks().collect();
            assert!(!bricks[0].rect.overlaps(&bricks[1].rect));
            assert!(bricks[0].rect.left() >= 0.0);
            assert!(bricks[0].rect.right() <= 800.0);
        }
    }

    #[test]
    fn test_fixed_source_runs_out() {
        let source = LevelSource::parse_fixed("1100\n---\n0011\n").unwrap();
        let settings = Settings::default();
        assert!(Level::new(1, &settings, 1.0, &source, &mut rng()).is_ok());
        let err = Level::new(2, &settings, 1.0, &source, &mut rng()).unwrap_err();
        assert_eq!(err, SimError::NoMoreLevels { index: 2 });
    }
}
