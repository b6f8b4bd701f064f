use super::{BurstSettings, FRAMES_PER_SECOND, Firework, Shape, Surface, Vector};

/// Gravity per tick, in logical units.
pub const DEFAULT_GRAVITY: Vector = Vector::new(0.0, 0.07);
/// Every shell takes two seconds to cross the horizontal distance to its target.
pub const ASCENT_TICKS: f64 = (FRAMES_PER_SECOND * 2) as f64;

// Random targets, as fractions of the width and from the top of the height
const TARGET_X_BAND: (f64, f64) = (0.1, 0.9);
const TARGET_Y_BAND: (f64, f64) = (0.2, 0.4);

/// All live fireworks of one display. Extents are fixed for the lifetime of
/// the box; a resized surface gets a new box.
pub struct FireworkBox {
    width: f64,
    height: f64,
    gravity: Vector,
    shape: Shape,
    settings: BurstSettings,
    fireworks: Vec<Firework>,
    rng: fastrand::Rng,
    peak_count: usize,
    ignitions: u64,
}

impl FireworkBox {
    pub fn new(
        width: f64,
        height: f64,
        shape: Shape,
        settings: BurstSettings,
        rng: fastrand::Rng,
    ) -> Self {
        Self {
            width,
            height,
            gravity: DEFAULT_GRAVITY,
            shape,
            settings,
            fireworks: Vec::new(),
            rng,
            peak_count: 0,
            ignitions: 0,
        }
    }

    pub fn with_gravity(mut self, gravity: Vector) -> Self {
        self.gravity = gravity;
        self
    }

    /// Launch a shell from the middle of the bottom edge towards `target`,
    /// or towards a random point in the upper part of the box.
    pub fn start_new_firework(&mut self, target: Option<Vector>) {
        let hue = self.rng.f64() * 360.0;
        let origin = Vector::new(self.width / 2.0, self.height);
        let aim = target.unwrap_or_else(|| self.random_target());
        let velocity = launch_velocity(origin, aim, self.height, self.gravity);

        self.fireworks
            .push(Firework::new(origin, velocity, hue, self.shape, target));
        self.ignitions += 1;
        self.peak_count = self.peak_count.max(self.fireworks.len());

        tracing::debug!(
            hue,
            target_x = aim.x,
            target_y = aim.y,
            live = self.fireworks.len(),
            "firework launched"
        );
    }

    fn random_target(&mut self) -> Vector {
        let (x_min, x_max) = TARGET_X_BAND;
        let (y_min, y_max) = TARGET_Y_BAND;
        let x = self.width * (x_min + self.rng.f64() * (x_max - x_min));
        let y = self.height * (y_min + self.rng.f64() * (y_max - y_min));
        Vector::new(x, y)
    }

    /// Advance every firework one tick and drop the ones that are done.
    /// A firework that fails is dropped on its own.
    pub fn step(&mut self) {
        let gravity = self.gravity;
        let settings = &self.settings;
        let rng = &mut self.rng;
        self.fireworks.retain_mut(|firework| match firework.step(gravity, settings, rng) {
            Ok(()) => !firework.is_dead(),
            Err(err) => {
                tracing::warn!(error = %err, "dropping firework");
                false
            }
        });
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        for firework in self.fireworks.iter().rev() {
            firework.render(surface);
        }
    }

    pub fn count(&self) -> usize {
        self.fireworks.len()
    }

    /// Most fireworks alive at the same time so far.
    pub fn peak_count(&self) -> usize {
        self.peak_count
    }

    pub fn ignitions(&self) -> u64 {
        self.ignitions
    }

    pub fn fireworks(&self) -> &[Firework] {
        &self.fireworks
    }
}

/// Launch velocity for a shell heading to `target`.
///
/// Horizontal speed covers the distance in `ASCENT_TICKS`; vertical speed is
/// what constant gravity needs to bring the shell to rest at the target
/// height, measured from the bottom edge.
pub fn launch_velocity(origin: Vector, target: Vector, height: f64, gravity: Vector) -> Vector {
    let x = (target.x - origin.x) / ASCENT_TICKS;
    let y = -(2.0 * gravity.y * (height - target.y)).max(0.0).sqrt();
    Vector::new(x, y)
}
