//! Display handle: one firework box plus the ignition policy that drives it.
//!
//! A host calls [`start`], then [`Display::tick`] and [`Display::render`]
//! once per frame, and finally [`stop`]. Displays share nothing, so several
//! surfaces can run side by side.

use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::fireworks::{BurstSettings, Density, FireworkBox, PathLibrary, Shape, Surface, Vector};

pub const MIN_FREQUENCY: u32 = 1;
pub const MAX_FREQUENCY: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Launches per second, 1..=10
    pub frequency: u32,
    pub shape: Shape,
    /// Outline id traced by `Shape::CustomPath`
    pub path_reference: Option<String>,
    /// Live fireworks allowed at once
    pub max_fireworks: usize,
    pub density: Density,
    /// Fixed seed for reproducible shows
    pub seed: Option<u64>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            frequency: 5,
            shape: Shape::Normal,
            path_reference: None,
            max_fireworks: 10,
            density: Density::Standard,
            seed: None,
        }
    }
}

impl Options {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_FREQUENCY..=MAX_FREQUENCY).contains(&self.frequency) {
            return Err(Error::InvalidConfig(format!(
                "frequency must be between {MIN_FREQUENCY} and {MAX_FREQUENCY}, got {}",
                self.frequency
            )));
        }
        if self.max_fireworks == 0 {
            return Err(Error::InvalidConfig(
                "max_fireworks must be at least 1".to_string(),
            ));
        }
        if self.shape == Shape::CustomPath && self.path_reference.is_none() {
            return Err(Error::InvalidConfig(
                "shape custom-path needs a path reference".to_string(),
            ));
        }
        Ok(())
    }

    /// Minimum time between two launches.
    pub fn ignition_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.frequency.max(MIN_FREQUENCY)))
    }
}

/// Final numbers of a display, returned by [`stop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub peak_count: usize,
    pub ignitions: u64,
}

pub struct Display {
    fireworks: FireworkBox,
    options: Options,
    last_ignition: Option<Instant>,
}

/// Create a display for a `width` x `height` surface.
pub fn start(width: f64, height: f64, options: Options, paths: PathLibrary) -> Result<Display> {
    options.validate()?;
    if let Some(reference) = &options.path_reference {
        if !paths.contains(reference) {
            tracing::warn!(
                reference = %reference,
                "path reference not defined, bursts will fall back to normal"
            );
        }
    }

    let rng = match options.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    let settings = BurstSettings {
        density: options.density,
        path_reference: options.path_reference.clone(),
        paths,
    };
    tracing::info!(
        width,
        height,
        shape = %options.shape,
        frequency = options.frequency,
        "display started"
    );

    Ok(Display {
        fireworks: FireworkBox::new(width, height, options.shape, settings, rng),
        options,
        last_ignition: None,
    })
}

pub fn stop(display: Display) -> Stats {
    let stats = display.stats();
    tracing::info!(peak = stats.peak_count, ignitions = stats.ignitions, "display stopped");
    stats
}

impl Display {
    /// One animation frame: launch if due, then advance the physics.
    pub fn tick(&mut self, now: Instant) {
        self.ignite_if_due(now);
        self.fireworks.step();
    }

    /// Launch when the interval since the last launch has passed and the
    /// live count is under the cap. Returns whether a shell went up.
    pub fn ignite_if_due(&mut self, now: Instant) -> bool {
        let interval = self.options.ignition_interval();
        let due = self
            .last_ignition
            .is_none_or(|last| now.saturating_duration_since(last) >= interval);
        if !due || !self.has_capacity() {
            return false;
        }
        self.fireworks.start_new_firework(None);
        self.last_ignition = Some(now);
        true
    }

    /// Launch towards a chosen point, still respecting the cap.
    pub fn launch_at(&mut self, target: Vector) -> bool {
        if !self.has_capacity() {
            return false;
        }
        self.fireworks.start_new_firework(Some(target));
        true
    }

    fn has_capacity(&self) -> bool {
        self.fireworks.count() < self.options.max_fireworks
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        self.fireworks.render(surface);
    }

    pub fn stats(&self) -> Stats {
        Stats {
            peak_count: self.fireworks.peak_count(),
            ignitions: self.fireworks.ignitions(),
        }
    }

    pub fn fireworks(&self) -> &FireworkBox {
        &self.fireworks
    }
}
