//! The ball set
//!
//! A fixed-capacity, indexed collection of balls sharing one radius. Balls
//! only ever get added: a fresh batch at the start of each game, then one
//! per spawn tick until the capacity is reached.

use glam::{IVec2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::rebound_axis;
use super::state::Color;
use crate::Settings;

/// Border colors a ball can be drawn with
const BORDER_PALETTE: [Color; 4] = [Color::BLACK, Color::RED, Color::GREEN, Color::BLUE];

/// A single ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// Center position
    pub pos: Vec2,
    /// Displacement per frame
    pub vel: Vec2,
    pub fill: Color,
    pub border: Color,
}

/// All balls in play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balls {
    balls: Vec<Ball>,
    capacity: usize,
    initial_count: usize,
    radius: u32,
    launch_point: Vec2,
    min_speed: f32,
    max_speed: f32,
}

impl Default for Balls {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl Balls {
    /// Create an empty ball set
    pub fn new(settings: &Settings) -> Self {
        Self {
            balls: Vec::with_capacity(settings.ball_capacity),
            capacity: settings.ball_capacity,
            initial_count: settings.initial_balls,
            radius: settings.ball_radius,
            launch_point: settings.ball_launch_point(),
            min_speed: settings.ball_min_speed,
            max_speed: settings.ball_max_speed,
        }
    }

    /// Replace all balls with a fresh initial batch
    pub fn initial_launch<R: Rng>(&mut self, rng: &mut R) {
        self.balls.clear();
        for _ in 0..self.initial_count {
            self.spawn_one(rng);
        }
    }

    /// Launch one more ball from the launch point.
    ///
    /// Returns `false` without doing anything once the set is full.
    pub fn spawn_one<R: Rng>(&mut self, rng: &mut R) -> bool {
        if self.balls.len() >= self.capacity {
            return false;
        }

        let ball = Ball {
            pos: self.launch_point,
            vel: self.random_velocity(rng),
            fill: Color::new(rng.random(), rng.random(), rng.random()),
            border: BORDER_PALETTE[rng.random_range(0..BORDER_PALETTE.len())],
        };
        self.balls.push(ball);
        true
    }

    /// Draw a launch velocity: each axis in [min, max), never upward,
    /// and down-right or down-left with equal odds
    fn random_velocity<R: Rng>(&self, rng: &mut R) -> Vec2 {
        let mut vel = Vec2::new(
            rng.random_range(self.min_speed..self.max_speed),
            rng.random_range(self.min_speed..self.max_speed),
        );

        if vel.y < 0.0 {
            vel.y = -vel.y;
        }

        let quadrant: u8 = rng.random_range(1..=2);
        match quadrant {
            1 if vel.x < 0.0 => vel.x = -vel.x,
            2 if vel.x > 0.0 => vel.x = -vel.x,
            _ => {}
        }

        vel
    }

    /// Move every ball one step, then rebound off the arena walls.
    ///
    /// Axes are handled independently, so a ball can rebound off a corner.
    pub fn advance(&mut self, arena_width: u32, arena_height: u32) {
        for ball in &mut self.balls {
            ball.pos += ball.vel;
        }

        let radius = self.radius as f32;
        let (width, height) = (arena_width as f32, arena_height as f32);
        for ball in &mut self.balls {
            (ball.pos.x, ball.vel.x) = rebound_axis(ball.pos.x, ball.vel.x, radius, width);
            (ball.pos.y, ball.vel.y) = rebound_axis(ball.pos.y, ball.vel.y, radius, height);
        }
    }

    /// Active balls
    pub fn iter(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Ball> {
        self.balls.get(index)
    }

    /// Number of active balls
    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.balls.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn diameter(&self) -> u32 {
        self.radius * 2
    }

    // Indexed queries below are total: an index past the active count
    // yields a neutral value instead of panicking.

    /// Center of a ball, or the origin
    pub fn center(&self, index: usize) -> Vec2 {
        self.get(index).map(|b| b.pos).unwrap_or(Vec2::ZERO)
    }

    /// Top-left corner of a ball's bounding box, truncated to pixels
    pub fn corner(&self, index: usize) -> IVec2 {
        let radius = self.radius as f32;
        self.get(index)
            .map(|b| IVec2::new((b.pos.x - radius) as i32, (b.pos.y - radius) as i32))
            .unwrap_or(IVec2::ZERO)
    }

    pub fn fill_color(&self, index: usize) -> Color {
        self.get(index).map(|b| b.fill).unwrap_or(Color::BLACK)
    }

    pub fn border_color(&self, index: usize) -> Color {
        self.get(index).map(|b| b.border).unwrap_or(Color::BLACK)
    }

    /// Place a ball directly, ignoring the launch procedure
    #[cfg(test)]
    pub(crate) fn push(&mut self, pos: Vec2, vel: Vec2) {
        self.balls.push(Ball {
            pos,
            vel,
            fill: Color::BLACK,
            border: Color::BLACK,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_initial_launch_resets_to_batch() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut balls = Balls::default();
        assert!(balls.is_empty());

        balls.initial_launch(&mut rng);
        assert_eq!(balls.len(), 5);
        for _ in 0..10 {
            balls.spawn_one(&mut rng);
        }
        assert_eq!(balls.len(), 15);

        balls.initial_launch(&mut rng);
        assert_eq!(balls.len(), 5);
        assert!(balls.iter().all(|b| b.pos == Vec2::new(320.0, 30.0)));
    }

    #[test]
    fn test_spawn_stops_at_capacity() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut balls = Balls::default();
        for _ in 0..50 {
            assert!(balls.spawn_one(&mut rng));
        }
        assert!(balls.is_full());

        for _ in 0..10 {
            assert!(!balls.spawn_one(&mut rng));
        }
        assert_eq!(balls.len(), 50);
    }

    #[test]
    fn test_spawn_colors_come_from_palette() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut balls = Balls::default();
        for _ in 0..50 {
            balls.spawn_one(&mut rng);
        }
        assert!(balls.iter().all(|b| BORDER_PALETTE.contains(&b.border)));
    }

    #[test]
    fn test_spawn_launches_both_down_left_and_down_right() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut balls = Balls::default();
        for _ in 0..50 {
            balls.spawn_one(&mut rng);
        }
        assert!(balls.iter().any(|b| b.vel.x < 0.0));
        assert!(balls.iter().any(|b| b.vel.x > 0.0));
        assert!(balls.iter().all(|b| b.vel.y > 0.0));
    }

    #[test]
    fn test_advance_moves_then_rebounds() {
        let mut balls = Balls::default();
        balls.push(Vec2::new(638.0, 100.0), Vec2::new(3.0, 1.0));
        balls.push(Vec2::new(100.0, 100.0), Vec2::new(-2.0, 2.0));

        balls.advance(640, 480);

        let hit = balls.get(0).unwrap();
        assert_eq!(hit.pos, Vec2::new(623.0, 101.0));
        assert_eq!(hit.vel, Vec2::new(-3.0, 1.0));

        let free = balls.get(1).unwrap();
        assert_eq!(free.pos, Vec2::new(98.0, 102.0));
        assert_eq!(free.vel, Vec2::new(-2.0, 2.0));
    }

    #[test]
    fn test_advance_rebounds_off_corner() {
        let mut balls = Balls::default();
        balls.push(Vec2::new(9.0, 9.0), Vec2::new(-3.0, -3.0));

        balls.advance(640, 480);

        let ball = balls.get(0).unwrap();
        assert_eq!(ball.pos, Vec2::new(10.0, 10.0));
        assert_eq!(ball.vel, Vec2::new(3.0, 3.0));
    }

    #[test]
    fn test_out_of_range_queries_are_neutral() {
        let mut balls = Balls::default();
        balls.push(Vec2::new(100.5, 50.5), Vec2::ONE);

        assert_eq!(balls.center(0), Vec2::new(100.5, 50.5));
        assert_eq!(balls.corner(0), IVec2::new(92, 42));

        assert_eq!(balls.center(1), Vec2::ZERO);
        assert_eq!(balls.corner(7), IVec2::ZERO);
        assert_eq!(balls.fill_color(1), Color::BLACK);
        assert_eq!(balls.border_color(usize::MAX), Color::BLACK);
        assert_eq!(balls.diameter(), 16);
    }

    proptest! {
        #[test]
        fn spawned_velocity_is_downward_within_range(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut balls = Balls::default();
            for _ in 0..20 {
                balls.spawn_one(&mut rng);
            }
            for ball in balls.iter() {
                prop_assert!(ball.vel.y >= 1.0 && ball.vel.y < 3.0);
                prop_assert!(ball.vel.x.abs() >= 1.0 && ball.vel.x.abs() < 3.0);
            }
        }

        #[test]
        fn balls_stay_in_arena(seed in any::<u64>(), steps in 1usize..600) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut balls = Balls::default();
            balls.initial_launch(&mut rng);
            for _ in 0..steps {
                balls.advance(640, 480);
                for ball in balls.iter() {
                    prop_assert!(ball.pos.x - 8.0 >= 0.0 && ball.pos.x + 8.0 <= 640.0);
                    prop_assert!(ball.pos.y - 8.0 >= 0.0 && ball.pos.y + 8.0 <= 480.0);
                }
            }
        }
    }
}
