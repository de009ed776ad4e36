//! Scene: the table plus every ball on it
//!
//! Balls are addressed by `BallId` handles. Ids are allocated monotonically
//! and storage stays sorted by id, so a handle stays valid (and iteration
//! order stays stable) when other balls are added or removed.

use glam::Vec2;

use super::ball::Ball;
use super::collision::{CollisionModel, collide_if_overlapping};
use super::table::SurfaceBounds;
use crate::error::SetupError;
use crate::view::{BallColor, BallView};

/// Stable handle to a ball in a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BallId(u32);

impl BallId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// The table and the balls rolling on it
#[derive(Debug, Clone)]
pub struct Scene {
    table: SurfaceBounds,
    /// Sorted by id
    balls: Vec<(BallId, Ball)>,
    collision_model: CollisionModel,
    next_id: u32,
}

impl Scene {
    pub fn new(table: SurfaceBounds) -> Self {
        log::info!(
            "Scene on {}x{} table, restitution {}",
            table.width(),
            table.height(),
            table.rail_restitution()
        );
        Self {
            table,
            balls: Vec::new(),
            collision_model: CollisionModel::default(),
            next_id: 1,
        }
    }

    pub fn with_collision_model(mut self, model: CollisionModel) -> Self {
        self.collision_model = model;
        self
    }

    pub fn table(&self) -> &SurfaceBounds {
        &self.table
    }

    pub fn collision_model(&self) -> CollisionModel {
        self.collision_model
    }

    /// Place a new ball at rest on the table
    pub fn spawn_ball(&mut self, position: Vec2, radius: f32, color: BallColor) -> Result<BallId, SetupError> {
        let ball = Ball::new(position, radius, color, &self.table)?;
        Ok(self.insert(ball))
    }

    /// Add a ball built elsewhere. It must fit the current table.
    pub fn add_ball(&mut self, ball: Ball) -> Result<BallId, SetupError> {
        if !self.table.fits(ball.radius()) {
            return Err(SetupError::BallDoesNotFit {
                radius: ball.radius(),
                width: self.table.width(),
                height: self.table.height(),
            });
        }
        if !ball.in_bounds(&self.table) {
            let c = ball.center();
            return Err(SetupError::OutOfBounds { x: c.x, y: c.y });
        }
        Ok(self.insert(ball))
    }

    fn insert(&mut self, ball: Ball) -> BallId {
        let id = BallId(self.next_id);
        self.next_id += 1;
        self.balls.push((id, ball));
        id
    }

    pub fn remove_ball(&mut self, id: BallId) -> Option<Ball> {
        let idx = self.position(id)?;
        Some(self.balls.remove(idx).1)
    }

    fn position(&self, id: BallId) -> Option<usize> {
        self.balls.binary_search_by_key(&id, |(bid, _)| *bid).ok()
    }

    pub fn get(&self, id: BallId) -> Option<&Ball> {
        self.position(id).map(|idx| &self.balls[idx].1)
    }

    pub fn get_mut(&mut self, id: BallId) -> Option<&mut Ball> {
        let idx = self.position(id)?;
        Some(&mut self.balls[idx].1)
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = BallId> + '_ {
        self.balls.iter().map(|(id, _)| *id)
    }

    pub fn balls(&self) -> impl Iterator<Item = (BallId, &Ball)> {
        self.balls.iter().map(|(id, ball)| (*id, ball))
    }

    /// Borrow the table and all balls at once (table read-only)
    pub(crate) fn split_mut(&mut self) -> (&SurfaceBounds, impl Iterator<Item = &mut Ball>) {
        (&self.table, self.balls.iter_mut().map(|(_, ball)| ball))
    }

    /// Surface resize. Rejected if the new table is invalid or too small for
    /// any ball. Balls left outside the new band are clamped onto its edge.
    pub fn resize(&mut self, x_min: i32, x_max: i32, y_min: i32, y_max: i32) -> Result<(), SetupError> {
        let mut resized = self.table.clone();
        resized.resize(x_min, x_max, y_min, y_max)?;
        if let Some((_, ball)) = self.balls.iter().find(|(_, b)| !resized.fits(b.radius())) {
            log::warn!(
                "Rejecting resize to {}x{}: ball of radius {} does not fit",
                resized.width(),
                resized.height(),
                ball.radius()
            );
            return Err(SetupError::BallDoesNotFit {
                radius: ball.radius(),
                width: resized.width(),
                height: resized.height(),
            });
        }
        log::info!("Table resized to {}x{}", resized.width(), resized.height());
        self.table = resized;
        let (table, balls) = self.split_mut();
        for ball in balls {
            ball.clamp_to(table);
        }
        Ok(())
    }

    /// Resolve every ball overlapping the ball `id` against it.
    /// Returns the partners that were touched.
    pub fn find_overlaps(&mut self, id: BallId) -> Vec<BallId> {
        let Some(i) = self.position(id) else {
            return Vec::new();
        };
        let model = self.collision_model;
        let mut touched = Vec::new();
        for j in 0..self.balls.len() {
            if j == i {
                continue;
            }
            if let Some((a, b)) = pair_mut(&mut self.balls, i, j) {
                if collide_if_overlapping(a, b, model) {
                    touched.push(self.balls[j].0);
                }
            }
        }
        touched
    }

    /// One overlap pass over every unordered pair. Returns the number of
    /// overlapping pairs found.
    pub fn resolve_overlaps(&mut self) -> usize {
        let model = self.collision_model;
        let mut pairs = 0;
        for i in 0..self.balls.len() {
            for j in (i + 1)..self.balls.len() {
                if let Some((a, b)) = pair_mut(&mut self.balls, i, j) {
                    if collide_if_overlapping(a, b, model) {
                        pairs += 1;
                    }
                }
            }
        }
        pairs
    }

    /// Render snapshot, in id order
    pub fn views(&self) -> Vec<BallView> {
        self.balls.iter().map(|(_, ball)| ball.view()).collect()
    }
}

fn pair_mut(balls: &mut [(BallId, Ball)], i: usize, j: usize) -> Option<(&mut Ball, &mut Ball)> {
    if i == j || i >= balls.len() || j >= balls.len() {
        return None;
    }
    if i < j {
        let (left, right) = balls.split_at_mut(j);
        Some((&mut left[i].1, &mut right[0].1))
    } else {
        let (left, right) = balls.split_at_mut(i);
        Some((&mut right[0].1, &mut left[j].1))
    }
}
