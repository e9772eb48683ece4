//! Compiles floor and stair placements into movement limits.
//!
//! Placements arrive in authoring order. Consecutive placements of the same
//! kind that touch along one row (floors) or one column (stairs) form a run;
//! every run yields exactly one start limit and one end limit.

use glam::Vec2;

use crate::core::geometry::{BoundingBox, Rect, TILE_SIZE};

/// Every limit shares this box.
pub const LIMIT_BOX: BoundingBox = BoundingBox::new(TILE_SIZE, 2.0);

const STAIR_START_OFFSET: f32 = 1.5 * TILE_SIZE;
const STAIR_END_OFFSET: f32 = 0.5625 * TILE_SIZE;

/// Kind of the last placement seen by the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldKind {
    #[default]
    None,
    Floor,
    Stair,
}

/// Boundary marker at one end of a floor or stair run. Never rendered, never updated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limit {
    pub pos: Vec2,
    pub bbox: BoundingBox,
}

impl Limit {
    fn at(pos: Vec2) -> Self {
        Self { pos, bbox: LIMIT_BOX }
    }

    pub fn rect(&self) -> Rect {
        self.bbox.at(self.pos)
    }
}

/// The four derived limit sets of a level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LimitSets {
    pub left_floor: Vec<Limit>,
    pub right_floor: Vec<Limit>,
    pub up_stair: Vec<Limit>,
    pub down_stair: Vec<Limit>,
}

impl LimitSets {
    /// Number of start limits emitted so far.
    pub fn starts(&self) -> usize {
        self.left_floor.len() + self.up_stair.len()
    }

    /// Number of end limits emitted so far.
    pub fn ends(&self) -> usize {
        self.right_floor.len() + self.down_stair.len()
    }
}

/// Streaming run detector.
#[derive(Debug, Clone, Default)]
pub struct LimitBuilder {
    previous_field: FieldKind,
    previous_position: Vec2,
    limits: LimitSets,
}

impl LimitBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_floor(&mut self, pos: Vec2) {
        self.place(FieldKind::Floor, pos);
    }

    pub fn add_stair(&mut self, pos: Vec2) {
        self.place(FieldKind::Stair, pos);
    }

    /// Feed one placement. `FieldKind::None` only closes the open run.
    pub fn place(&mut self, field: FieldKind, pos: Vec2) {
        if self.is_new_run(field, pos) {
            self.close_run();
            self.open_run(field, pos);
        }
        self.previous_field = field;
        self.previous_position = pos;
    }

    /// Emit the end limit of the open run, if any.
    ///
    /// The stream has no terminator, so the caller must do this once after the
    /// last placement.
    pub fn close_final_run(&mut self) {
        self.close_run();
        self.previous_field = FieldKind::None;
    }

    /// Limits emitted so far.
    pub fn limits(&self) -> &LimitSets {
        &self.limits
    }

    /// Close the open run and hand over the limit sets.
    pub fn finish(mut self) -> LimitSets {
        self.close_final_run();
        log::debug!(
            "compiled limits: {} floor run(s), {} stair run(s)",
            self.limits.left_floor.len(),
            self.limits.up_stair.len()
        );
        self.limits
    }

    fn is_new_run(&self, field: FieldKind, pos: Vec2) -> bool {
        let prev = self.previous_position;
        if field != self.previous_field {
            return true;
        }
        match field {
            FieldKind::Floor => pos.y != prev.y || (pos.x - prev.x).abs() > TILE_SIZE,
            FieldKind::Stair => pos.x != prev.x || (pos.y - prev.y).abs() > TILE_SIZE,
            FieldKind::None => false,
        }
    }

    fn close_run(&mut self) {
        let prev = self.previous_position;
        match self.previous_field {
            FieldKind::Floor => self
                .limits
                .right_floor
                .push(Limit::at(Vec2::new(prev.x + TILE_SIZE, prev.y))),
            FieldKind::Stair => self
                .limits
                .down_stair
                .push(Limit::at(Vec2::new(prev.x, prev.y + STAIR_END_OFFSET))),
            FieldKind::None => {}
        }
    }

    fn open_run(&mut self, field: FieldKind, pos: Vec2) {
        match field {
            FieldKind::Floor => self
                .limits
                .left_floor
                .push(Limit::at(Vec2::new(pos.x - TILE_SIZE, pos.y))),
            FieldKind::Stair => self
                .limits
                .up_stair
                .push(Limit::at(Vec2::new(pos.x, pos.y - STAIR_START_OFFSET))),
            FieldKind::None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    fn positions(limits: &[Limit]) -> Vec<Vec2> {
        limits.iter().map(|l| l.pos).collect()
    }

    fn build(placements: &[(FieldKind, Vec2)]) -> LimitSets {
        let mut builder = LimitBuilder::new();
        for &(field, pos) in placements {
            builder.place(field, pos);
        }
        builder.finish()
    }

    #[test]
    fn isolated_floor_tile() {
        let limits = build(&[(FieldKind::Floor, v(64.0, 48.0))]);
        assert_eq!(positions(&limits.left_floor), vec![v(48.0, 48.0)]);
        assert_eq!(positions(&limits.right_floor), vec![v(80.0, 48.0)]);
        assert!(limits.up_stair.is_empty());
        assert!(limits.down_stair.is_empty());
    }

    #[test]
    fn isolated_stair_tile() {
        let limits = build(&[(FieldKind::Stair, v(64.0, 48.0))]);
        assert_eq!(positions(&limits.up_stair), vec![v(64.0, 24.0)]);
        assert_eq!(positions(&limits.down_stair), vec![v(64.0, 57.0)]);
        assert!(limits.left_floor.is_empty());
    }

    #[test]
    fn floor_run_emits_outer_limits_only() {
        let limits = build(&[
            (FieldKind::Floor, v(0.0, 100.0)),
            (FieldKind::Floor, v(16.0, 100.0)),
            (FieldKind::Floor, v(32.0, 100.0)),
        ]);
        assert_eq!(positions(&limits.left_floor), vec![v(-16.0, 100.0)]);
        assert_eq!(positions(&limits.right_floor), vec![v(48.0, 100.0)]);
    }

    #[test]
    fn stair_run_emits_top_and_bottom() {
        let limits = build(&[
            (FieldKind::Stair, v(32.0, 0.0)),
            (FieldKind::Stair, v(32.0, 16.0)),
            (FieldKind::Stair, v(32.0, 32.0)),
        ]);
        assert_eq!(positions(&limits.up_stair), vec![v(32.0, -24.0)]);
        assert_eq!(positions(&limits.down_stair), vec![v(32.0, 41.0)]);
    }

    #[rstest]
    #[case::adjacent(v(16.0, 0.0), false)]
    #[case::same_tile(v(0.0, 0.0), false)]
    #[case::one_past_adjacent(v(17.0, 0.0), true)]
    #[case::gap(v(48.0, 0.0), true)]
    #[case::other_row(v(16.0, 16.0), true)]
    #[case::adjacent_leftwards(v(-16.0, 0.0), false)]
    fn floor_contiguity(#[case] next: Vec2, #[case] new_run: bool) {
        let limits = build(&[(FieldKind::Floor, v(0.0, 0.0)), (FieldKind::Floor, next)]);
        let runs = if new_run { 2 } else { 1 };
        assert_eq!(limits.left_floor.len(), runs);
        assert_eq!(limits.right_floor.len(), runs);
    }

    #[rstest]
    #[case::below(v(0.0, 16.0), false)]
    #[case::above(v(0.0, -16.0), false)]
    #[case::gap(v(0.0, 17.0), true)]
    #[case::other_column(v(16.0, 16.0), true)]
    fn stair_contiguity(#[case] next: Vec2, #[case] new_run: bool) {
        let limits = build(&[(FieldKind::Stair, v(0.0, 0.0)), (FieldKind::Stair, next)]);
        let runs = if new_run { 2 } else { 1 };
        assert_eq!(limits.up_stair.len(), runs);
        assert_eq!(limits.down_stair.len(), runs);
    }

    #[test]
    fn kind_change_splits_runs() {
        let limits = build(&[
            (FieldKind::Floor, v(0.0, 0.0)),
            (FieldKind::Stair, v(16.0, 0.0)),
            (FieldKind::Floor, v(32.0, 0.0)),
        ]);
        assert_eq!(limits.left_floor.len(), 2);
        assert_eq!(limits.right_floor.len(), 2);
        assert_eq!(limits.up_stair.len(), 1);
        assert_eq!(limits.down_stair.len(), 1);
        // the first floor run closes at its own last tile, not at the stair
        assert_eq!(limits.right_floor[0].pos, v(16.0, 0.0));
    }

    #[test]
    fn starts_equal_ends_equal_runs() {
        let stream = [
            (FieldKind::Floor, v(0.0, 0.0)),
            (FieldKind::Floor, v(16.0, 0.0)),
            (FieldKind::Floor, v(64.0, 0.0)),
            (FieldKind::Floor, v(0.0, 64.0)),
            (FieldKind::Stair, v(16.0, 0.0)),
            (FieldKind::Stair, v(16.0, 16.0)),
            (FieldKind::Stair, v(16.0, 32.0)),
            (FieldKind::Stair, v(16.0, 64.0)),
            (FieldKind::Floor, v(16.0, 64.0)),
        ];
        let limits = build(&stream);
        // runs: [0,16]@0, [64]@0, [0]@64, stair 0..32, stair 64, floor 16@64
        assert_eq!(limits.starts(), 6);
        assert_eq!(limits.ends(), 6);
    }

    #[test]
    fn final_run_stays_open_until_closed() {
        let mut builder = LimitBuilder::new();
        builder.add_floor(v(0.0, 0.0));
        builder.add_floor(v(16.0, 0.0));
        assert_eq!(builder.limits().starts(), 1);
        assert_eq!(builder.limits().ends(), 0);
        builder.close_final_run();
        assert_eq!(builder.limits().ends(), 1);
        // a second close has nothing left to close
        builder.close_final_run();
        assert_eq!(builder.limits().ends(), 1);
    }

    #[test]
    fn rebuilding_is_deterministic() {
        let stream = [
            (FieldKind::Floor, v(0.0, 0.0)),
            (FieldKind::Floor, v(16.0, 0.0)),
            (FieldKind::Stair, v(0.0, 0.0)),
            (FieldKind::Stair, v(0.0, 16.0)),
        ];
        assert_eq!(build(&stream), build(&stream));
    }

    #[test]
    fn limits_share_the_fixed_box() {
        let limits = build(&[(FieldKind::Floor, v(0.0, 0.0)), (FieldKind::Stair, v(0.0, 0.0))]);
        for l in limits.left_floor.iter().chain(&limits.down_stair) {
            assert_eq!(l.bbox, BoundingBox::new(16.0, 2.0));
        }
    }
}
