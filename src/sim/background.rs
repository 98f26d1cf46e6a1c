//! Twinkling starfield behind the arena
//!
//! Animates every frame, including while paused and after game over.

use glam::Vec2;
use rand::Rng;

use super::entity::Bounds;
use crate::consts::STAR_FADE;

/// A background star
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    pub radius: f32,
    pub alpha: f32,
}

/// Background starfield
#[derive(Debug, Clone, Default)]
pub struct Starfield {
    pub stars: Vec<Star>,
}

impl Starfield {
    pub fn new(rng: &mut impl Rng, bounds: Bounds, count: usize) -> Self {
        let mut field = Self::default();
        field.reseed(rng, bounds, count);
        field
    }

    /// Scatter a fresh set of stars (after resize or a density change)
    pub fn reseed(&mut self, rng: &mut impl Rng, bounds: Bounds, count: usize) {
        self.stars.clear();
        for _ in 0..count {
            self.stars.push(Star {
                pos: bounds.random_point(rng),
                radius: rng.random_range(0.0..2.0),
                alpha: rng.random_range(0.0..1.0),
            });
        }
    }

    /// Fade every star; burnt-out stars reappear elsewhere at full brightness
    pub fn update(&mut self, rng: &mut impl Rng, bounds: Bounds) {
        for star in &mut self.stars {
            star.alpha -= STAR_FADE;
            if star.alpha <= 0.0 {
                star.alpha = 1.0;
                star.pos = bounds.random_point(rng);
            }
        }
    }
}
