use super::{BurstSettings, Particle, Shape, Surface, Vector};
use crate::error::{Error, Result};

/// Ticks a burst stays alive after detonation.
pub const FRAGMENT_LIFESPAN: i32 = 200;
/// A shell aimed at a point bursts once it is this close to it.
pub const TARGET_RADIUS: f64 = 10.0;

#[derive(Debug, Clone)]
enum Stage {
    /// Exactly one shell, climbing
    Ascending(Particle),
    Exploded {
        fragments: Vec<Particle>,
        lifespan: i32,
    },
}

/// One shell: rises until its apex (or its target), then bursts into a
/// swarm of fragments that fall and fade.
#[derive(Debug, Clone)]
pub struct Firework {
    origin: Vector,
    /// Launch direction, normalized
    heading: Vector,
    shape: Shape,
    hue: f64,
    target: Option<Vector>,
    stage: Stage,
    burst_shape: Option<Shape>,
}

impl Firework {
    pub fn new(
        origin: Vector,
        velocity: Vector,
        hue: f64,
        shape: Shape,
        target: Option<Vector>,
    ) -> Self {
        Self {
            origin,
            heading: velocity.normalized(),
            shape,
            hue,
            target,
            stage: Stage::Ascending(Particle::projectile(origin, velocity, hue)),
            burst_shape: None,
        }
    }

    /// Advance one tick under `gravity`.
    ///
    /// Fails only when the shell's state stops being finite, which lets the
    /// owner drop this firework without disturbing the others.
    pub fn step(
        &mut self,
        gravity: Vector,
        settings: &BurstSettings,
        rng: &mut fastrand::Rng,
    ) -> Result<()> {
        match &mut self.stage {
            Stage::Ascending(shell) => {
                shell.apply_force(gravity);
                shell.step();
                if !shell.position.is_finite() || !shell.velocity.is_finite() {
                    return Err(Error::InvalidOperand {
                        x: shell.position.x,
                        y: shell.position.y,
                    });
                }
                if Self::reached_apex(shell, self.target) {
                    let origin = shell.position;
                    self.explode(origin, settings, rng);
                }
            }
            Stage::Exploded {
                fragments,
                lifespan,
            } => {
                for fragment in fragments.iter_mut() {
                    fragment.apply_force(gravity);
                    fragment.step();
                }
                fragments.retain(|f| !f.is_dead());
                *lifespan -= 1;
            }
        }
        Ok(())
    }

    fn reached_apex(shell: &Particle, target: Option<Vector>) -> bool {
        if shell.velocity.y >= 0.0 {
            return true;
        }
        target.is_some_and(|t| shell.position.distance(t) < TARGET_RADIUS)
    }

    fn explode(&mut self, origin: Vector, settings: &BurstSettings, rng: &mut fastrand::Rng) {
        let (shape, fragments) = settings.detonate(self.shape, origin, self.hue, self.heading, rng);
        tracing::debug!(
            shape = %shape,
            fragments = fragments.len(),
            x = origin.x,
            y = origin.y,
            "firework exploded"
        );
        self.burst_shape = Some(shape);
        self.stage = Stage::Exploded {
            fragments,
            lifespan: FRAGMENT_LIFESPAN,
        };
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        for particle in self.particles() {
            particle.render(surface);
        }
    }

    /// The shell while ascending, the fragments afterwards.
    pub fn particles(&self) -> &[Particle] {
        match &self.stage {
            Stage::Ascending(shell) => std::slice::from_ref(shell),
            Stage::Exploded { fragments, .. } => fragments,
        }
    }

    pub fn exploded(&self) -> bool {
        matches!(self.stage, Stage::Exploded { .. })
    }

    /// Remaining burst ticks; stays at the full value until detonation.
    pub fn fragment_lifespan(&self) -> i32 {
        match self.stage {
            Stage::Ascending(_) => FRAGMENT_LIFESPAN,
            Stage::Exploded { lifespan, .. } => lifespan,
        }
    }

    pub fn is_dead(&self) -> bool {
        match &self.stage {
            Stage::Ascending(_) => false,
            Stage::Exploded {
                fragments,
                lifespan,
            } => *lifespan <= 0 && fragments.is_empty(),
        }
    }

    pub fn origin(&self) -> Vector {
        self.origin
    }

    pub fn heading(&self) -> Vector {
        self.heading
    }

    pub fn hue(&self) -> f64 {
        self.hue
    }

    /// Requested shape, possibly `Random`.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Shape actually used for the burst, once it happened.
    pub fn burst_shape(&self) -> Option<Shape> {
        self.burst_shape
    }

    pub fn target(&self) -> Option<Vector> {
        self.target
    }
}
