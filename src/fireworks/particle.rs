use std::collections::VecDeque;

use super::{Surface, Vector, hue_to_rgb};

/// Number of past positions kept for the comet tail.
pub const MAX_TRAIL: usize = 5;
/// Opacity lost per trail index, newest point first.
pub const TRAIL_FADE: f64 = 0.15;
pub const INITIAL_LIFESPAN: f64 = 100.0;

const HEAD_RADIUS: f64 = 2.0;
const TRAIL_RADIUS: f64 = 1.0;

/// A point mass with a bounded position history.
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vector,
    pub velocity: Vector,
    acceleration: Vector,
    pub lifespan: f64,
    pub decay: f64,
    pub hue: f64,
    trail: VecDeque<Vector>,
}

impl Particle {
    pub fn new(position: Vector, velocity: Vector, hue: f64, decay: f64) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vector::ZERO,
            lifespan: INITIAL_LIFESPAN,
            decay,
            hue,
            trail: VecDeque::with_capacity(MAX_TRAIL + 1),
        }
    }

    /// Ascending projectile: does not age until it bursts.
    pub fn projectile(position: Vector, velocity: Vector, hue: f64) -> Self {
        Self::new(position, velocity, hue, 0.0)
    }

    /// Burst fragment: loses one unit of lifespan per step.
    pub fn fragment(position: Vector, velocity: Vector, hue: f64) -> Self {
        Self::new(position, velocity, hue, 1.0)
    }

    pub fn apply_force(&mut self, force: Vector) {
        self.acceleration += force;
    }

    /// Semi-implicit Euler step. The trail captures the position from before
    /// the move, so it always lags the head by one step.
    pub fn step(&mut self) {
        self.trail.push_front(self.position);
        self.trail.truncate(MAX_TRAIL);

        self.velocity += self.acceleration;
        self.position += self.velocity;
        self.lifespan -= self.decay;
        self.acceleration = Vector::ZERO;
    }

    pub fn is_dead(&self) -> bool {
        self.lifespan <= 0.0
    }

    /// Trail points, most recent first.
    pub fn trail(&self) -> impl ExactSizeIterator<Item = &Vector> {
        self.trail.iter()
    }

    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }

    pub fn alpha(&self) -> f64 {
        (self.lifespan / INITIAL_LIFESPAN).clamp(0.0, 1.0)
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        let alpha = self.alpha();
        if alpha <= 0.0 {
            return;
        }
        let color = hue_to_rgb(self.hue);
        surface.fill_disc(self.position, HEAD_RADIUS, color, alpha);

        for (i, point) in self.trail.iter().enumerate() {
            let fade = 1.0 - (i + 1) as f64 * TRAIL_FADE;
            if fade <= 0.0 {
                break;
            }
            surface.fill_disc(*point, TRAIL_RADIUS, color, alpha * fade);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fireworks::Rgb;
    use proptest::prelude::*;

    #[derive(Default)]
    struct RecordingSurface {
        discs: Vec<(Vector, f64, f64)>,
    }

    impl Surface for RecordingSurface {
        fn width(&self) -> f64 {
            100.0
        }

        fn height(&self) -> f64 {
            100.0
        }

        fn fill_disc(&mut self, center: Vector, radius: f64, _color: Rgb, alpha: f64) {
            self.discs.push((center, radius, alpha));
        }
    }

    #[test]
    fn test_step_integrates_and_resets_acceleration() {
        let mut p = Particle::fragment(Vector::new(10.0, 10.0), Vector::new(1.0, 0.0), 30.0);
        p.apply_force(Vector::new(0.0, 0.5));
        p.apply_force(Vector::new(0.0, 0.5));
        p.step();

        assert_eq!(p.velocity, Vector::new(1.0, 1.0));
        assert_eq!(p.position, Vector::new(11.0, 11.0));
        assert_eq!(p.lifespan, 99.0);

        // No force this time: velocity is unchanged
        p.step();
        assert_eq!(p.velocity, Vector::new(1.0, 1.0));
        assert_eq!(p.position, Vector::new(12.0, 12.0));
    }

    #[test]
    fn test_trail_lags_by_one_step() {
        let mut p = Particle::fragment(Vector::new(0.0, 0.0), Vector::new(2.0, 0.0), 0.0);
        p.step();
        p.step();
        let trail: Vec<_> = p.trail().copied().collect();
        assert_eq!(trail, vec![Vector::new(2.0, 0.0), Vector::new(0.0, 0.0)]);
        assert_eq!(p.position, Vector::new(4.0, 0.0));
    }

    #[test]
    fn test_projectile_does_not_age() {
        let mut p = Particle::projectile(Vector::ZERO, Vector::new(0.0, -3.0), 0.0);
        for _ in 0..500 {
            p.step();
        }
        assert_eq!(p.lifespan, INITIAL_LIFESPAN);
        assert!(!p.is_dead());
    }

    #[test]
    fn test_fragment_dies_after_lifespan() {
        let mut p = Particle::fragment(Vector::ZERO, Vector::ZERO, 0.0);
        for _ in 0..99 {
            p.step();
        }
        assert!(!p.is_dead());
        p.step();
        assert!(p.is_dead());
    }

    #[test]
    fn test_render_fades_trail() {
        let mut p = Particle::fragment(Vector::ZERO, Vector::new(1.0, 0.0), 0.0);
        for _ in 0..3 {
            p.step();
        }
        let mut surface = RecordingSurface::default();
        p.render(&mut surface);

        assert_eq!(surface.discs.len(), 4);
        let head_alpha = surface.discs[0].2;
        assert!((head_alpha - 0.97).abs() < 1e-9);
        for pair in surface.discs[1..].windows(2) {
            assert!(pair[0].2 > pair[1].2);
        }
    }

    #[test]
    fn test_dead_particle_draws_nothing() {
        let mut p = Particle::fragment(Vector::ZERO, Vector::ZERO, 0.0);
        p.lifespan = 0.0;
        let mut surface = RecordingSurface::default();
        p.render(&mut surface);
        assert!(surface.discs.is_empty());
    }

    proptest! {
        #[test]
        fn prop_trail_is_bounded(steps in 0usize..64, vx in -5.0..5.0f64, vy in -5.0..5.0f64) {
            let mut p = Particle::fragment(Vector::ZERO, Vector::new(vx, vy), 0.0);
            for _ in 0..steps {
                p.apply_force(Vector::new(0.0, 0.07));
                p.step();
                prop_assert!(p.trail_len() <= MAX_TRAIL);
            }
            prop_assert_eq!(p.trail_len(), steps.min(MAX_TRAIL));
        }
    }
}
