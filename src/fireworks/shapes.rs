//! Burst patterns. Every generator returns fragments starting at the
//! detonation origin; the pattern lives entirely in the initial velocities.

use std::f64::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use super::{Particle, PathLibrary, ShapePath, Vector};
use crate::error::{Error, Result};

/// Angles used by ring-like patterns and samples taken along paths.
pub const RING_SAMPLES: usize = 180;
pub const RING_SPEED: f64 = 0.8;
const DONUT_INNER: f64 = 0.8;
const HEART_SCALE: f64 = 0.05;
// Twinkle radii are 4, 3 and 1; velocities use them times TWINKLE_SCALE
pub const TWINKLE_SCALE: f64 = 0.25;
const TWINKLE_RADII: [f64; 3] = [4.0, 3.0, 1.0];

// (n, d) pairs for rose curves r = cos(n/d * a)
const ROSE_RATIOS: [(u32, u32); 14] = [
    (1, 2),
    (2, 1),
    (3, 1),
    (3, 2),
    (4, 1),
    (5, 1),
    (5, 2),
    (5, 3),
    (5, 4),
    (6, 5),
    (7, 2),
    (7, 3),
    (7, 4),
    (8, 3),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Normal,
    Circle,
    Donut,
    Heart,
    Rose,
    Twinkle,
    Star,
    Skull,
    Rabbit,
    Eagle,
    Umbrella,
    CustomPath,
    Random,
}

impl Shape {
    /// Every shape `Random` can pick from.
    pub const CONCRETE: [Shape; 12] = [
        Shape::Normal,
        Shape::Circle,
        Shape::Donut,
        Shape::Heart,
        Shape::Rose,
        Shape::Twinkle,
        Shape::Star,
        Shape::Skull,
        Shape::Rabbit,
        Shape::Eagle,
        Shape::Umbrella,
        Shape::CustomPath,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Shape::Normal => "normal",
            Shape::Circle => "circle",
            Shape::Donut => "donut",
            Shape::Heart => "heart",
            Shape::Rose => "rose",
            Shape::Twinkle => "twinkle",
            Shape::Star => "star",
            Shape::Skull => "skull",
            Shape::Rabbit => "rabbit",
            Shape::Eagle => "eagle",
            Shape::Umbrella => "umbrella",
            Shape::CustomPath => "custom-path",
            Shape::Random => "random",
        }
    }

    /// Id of the built-in outline this shape traces, if any.
    pub fn builtin_path(self) -> Option<&'static str> {
        match self {
            Shape::Star | Shape::Skull | Shape::Rabbit | Shape::Eagle | Shape::Umbrella => {
                Some(self.name())
            }
            _ => None,
        }
    }

    /// Pick the concrete shape for one detonation.
    pub fn resolve(self, rng: &mut fastrand::Rng) -> Shape {
        match self {
            Shape::Random => Shape::CONCRETE[rng.usize(0..Shape::CONCRETE.len())],
            shape => shape,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Shape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let shape = match s.trim().to_ascii_lowercase().as_str() {
            "normal" | "default" => Shape::Normal,
            "circle" | "circles" | "ring" => Shape::Circle,
            "donut" | "donuts" => Shape::Donut,
            "heart" | "hearts" => Shape::Heart,
            "rose" | "roses" | "flower" => Shape::Rose,
            "twinkle" | "twinkles" | "sparkle" => Shape::Twinkle,
            "star" | "stars" => Shape::Star,
            "skull" | "skulls" => Shape::Skull,
            "rabbit" | "rabbits" | "bunny" => Shape::Rabbit,
            "eagle" | "eagles" => Shape::Eagle,
            "umbrella" | "umbrellas" => Shape::Umbrella,
            "custom-path" | "custom" | "path" | "svg" => Shape::CustomPath,
            "random" => Shape::Random,
            _ => return Err(Error::UnknownShape(s.to_string())),
        };
        Ok(shape)
    }
}

/// Fragment count of the default scatter burst.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Density {
    #[default]
    Standard,
    /// The older, heavier burst
    Dense,
}

impl Density {
    pub fn fragments(self) -> usize {
        match self {
            Density::Standard => 180,
            Density::Dense => 360,
        }
    }
}

/// How bursts are built for one display: scatter density and the outlines
/// path shapes can trace.
#[derive(Debug, Clone)]
pub struct BurstSettings {
    pub density: Density,
    /// Outline used by `Shape::CustomPath`
    pub path_reference: Option<String>,
    pub paths: PathLibrary,
}

impl Default for BurstSettings {
    fn default() -> Self {
        Self {
            density: Density::Standard,
            path_reference: None,
            paths: PathLibrary::with_builtins(),
        }
    }
}

impl BurstSettings {
    /// Build the fragments for `shape` detonating at `origin`. `Random` is
    /// resolved here, so each burst rolls its own shape. Outline shapes whose
    /// path cannot be found or sampled fall back to the normal scatter.
    pub fn detonate(
        &self,
        shape: Shape,
        origin: Vector,
        hue: f64,
        heading: Vector,
        rng: &mut fastrand::Rng,
    ) -> (Shape, Vec<Particle>) {
        let shape = shape.resolve(rng);
        let particles = match shape {
            Shape::Normal | Shape::Random => normal(origin, hue, heading, self.density, rng),
            Shape::Circle => circle(origin, hue),
            Shape::Donut => donut(origin, hue),
            Shape::Heart => heart(origin, hue),
            Shape::Rose => rose(origin, hue, rng),
            Shape::Twinkle => twinkle(origin, hue, rng),
            outline => {
                let id = outline.builtin_path().or(self.path_reference.as_deref());
                let traced = match id.and_then(|id| self.paths.get(id)) {
                    Some(path) => path_sample(origin, hue, path),
                    None => Err(Error::DegenerateGeometry(format!(
                        "path '{}' is not defined",
                        id.unwrap_or("<none>")
                    ))),
                };
                match traced {
                    Ok(particles) => particles,
                    Err(err) => {
                        tracing::debug!(
                            shape = %outline,
                            error = %err,
                            "falling back to normal burst"
                        );
                        return (Shape::Normal, normal(origin, hue, heading, self.density, rng));
                    }
                }
            }
        };
        (shape, particles)
    }
}

/// Random-speed scatter biased along the launch heading.
pub fn normal(
    origin: Vector,
    hue: f64,
    heading: Vector,
    density: Density,
    rng: &mut fastrand::Rng,
) -> Vec<Particle> {
    let count = density.fragments();
    let bias = heading.normalized();
    (0..count)
        .map(|i| {
            let angle = i as f64 * TAU / count as f64;
            let magnitude = 0.1 + 1.5 * rng.f64();
            Particle::fragment(origin, Vector::from_polar(angle, magnitude) + bias, hue)
        })
        .collect()
}

pub fn circle(origin: Vector, hue: f64) -> Vec<Particle> {
    ring_angles()
        .map(|angle| Particle::fragment(origin, Vector::from_polar(angle, RING_SPEED), hue))
        .collect()
}

/// A circle plus a slower inner ring for thickness.
pub fn donut(origin: Vector, hue: f64) -> Vec<Particle> {
    ring_angles()
        .flat_map(|angle| {
            [
                Particle::fragment(origin, Vector::from_polar(angle, RING_SPEED), hue),
                Particle::fragment(
                    origin,
                    Vector::from_polar(angle, RING_SPEED * DONUT_INNER),
                    hue,
                ),
            ]
        })
        .collect()
}

pub fn heart(origin: Vector, hue: f64) -> Vec<Particle> {
    ring_angles()
        .map(|a| {
            let x = 16.0 * a.sin().powi(3);
            let y = -(13.0 * a.cos()
                - 5.0 * (2.0 * a).cos()
                - 2.0 * (3.0 * a).cos()
                - (4.0 * a).cos());
            Particle::fragment(origin, Vector::new(x, y) * HEART_SCALE, hue)
        })
        .collect()
}

pub fn rose(origin: Vector, hue: f64, rng: &mut fastrand::Rng) -> Vec<Particle> {
    let (n, d) = ROSE_RATIOS[rng.usize(0..ROSE_RATIOS.len())];
    rose_with_ratio(origin, hue, n, d)
}

pub fn rose_with_ratio(origin: Vector, hue: f64, n: u32, d: u32) -> Vec<Particle> {
    let plan = RosePlan::new(n, d);
    (0..plan.samples)
        .map(|i| {
            let a = i as f64 * plan.step;
            Particle::fragment(origin, Vector::from_polar(a, RING_SPEED * (plan.k * a).cos()), hue)
        })
        .collect()
}

/// Sweep of a rose curve with ratio `n/d`. The curve closes after
/// `2π · d/gcd(n, d)`; the step doubles until at most 180 samples remain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RosePlan {
    pub k: f64,
    pub sweep: f64,
    pub step: f64,
    pub samples: usize,
}

impl RosePlan {
    pub fn new(n: u32, d: u32) -> Self {
        let divisor = gcd(n, d).max(1);
        let k = n as f64 / d as f64;
        let sweep = TAU * (d / divisor) as f64;

        let mut step = TAU / RING_SAMPLES as f64;
        let mut samples = sample_count(sweep, step);
        while samples > RING_SAMPLES {
            step *= 2.0;
            samples = sample_count(sweep, step);
        }
        Self {
            k,
            sweep,
            step,
            samples,
        }
    }
}

fn sample_count(sweep: f64, step: f64) -> usize {
    // Shave rounding noise so exact multiples don't gain a sample
    (sweep / step - 1e-9).ceil() as usize
}

/// Euclid's algorithm.
pub fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

pub fn twinkle(origin: Vector, hue: f64, rng: &mut fastrand::Rng) -> Vec<Particle> {
    twinkle_with_arms(origin, hue, rng.usize(4..=7))
}

/// Star silhouette with `arms` points: `3 · arms` fragments whose radii
/// cycle through 4, 3, 1.
pub fn twinkle_with_arms(origin: Vector, hue: f64, arms: usize) -> Vec<Particle> {
    let increment = PI / arms as f64;
    (0..3 * arms)
        .map(|i| {
            let radius = TWINKLE_RADII[i % TWINKLE_RADII.len()];
            let velocity = Vector::from_polar(i as f64 * increment, radius * TWINKLE_SCALE);
            Particle::fragment(origin, velocity, hue)
        })
        .collect()
}

/// Trace an outline: sample it evenly, scale so the farthest sample has
/// unit length and fire each fragment with its scaled sample as velocity.
pub fn path_sample(origin: Vector, hue: f64, path: &ShapePath) -> Result<Vec<Particle>> {
    if path.length() <= 0.0 {
        return Err(Error::DegenerateGeometry("path has zero length".to_string()));
    }
    let samples = path
        .sample(RING_SAMPLES)
        .into_iter()
        .map(|p| Vector::try_new(p.x, p.y))
        .collect::<Result<Vec<_>>>()?;

    let largest = samples.iter().map(|v| v.magnitude()).fold(0.0, f64::max);
    if largest <= 0.0 {
        return Err(Error::DegenerateGeometry(
            "every path sample is at the origin".to_string(),
        ));
    }
    Ok(samples
        .into_iter()
        .map(|v| Particle::fragment(origin, v / largest, hue))
        .collect())
}

fn ring_angles() -> impl Iterator<Item = f64> {
    (0..RING_SAMPLES).map(|i| i as f64 * TAU / RING_SAMPLES as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Vector = Vector::new(50.0, 60.0);

    fn speeds(particles: &[Particle]) -> Vec<f64> {
        particles.iter().map(|p| p.velocity.magnitude()).collect()
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(3, 2), 1);
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(7, 0), 7);
        assert_eq!(gcd(0, 5), 5);
    }

    #[test]
    fn test_rose_three_halves() {
        let plan = RosePlan::new(3, 2);
        assert!(plan.samples <= RING_SAMPLES);
        assert_eq!(plan.samples, 180);
        assert!((plan.sweep - 2.0 * TAU).abs() < 1e-12);
        assert!((plan.k - 1.5).abs() < 1e-12);

        let particles = rose_with_ratio(ORIGIN, 10.0, 3, 2);
        assert_eq!(particles.len(), plan.samples);
    }

    #[test]
    fn test_rose_reduces_ratio() {
        // 4/2 closes like 2/1
        assert_eq!(RosePlan::new(4, 2).sweep, RosePlan::new(2, 1).sweep);
        for (n, d) in ROSE_RATIOS {
            assert!(RosePlan::new(n, d).samples <= RING_SAMPLES, "{n}/{d}");
        }
    }

    #[test]
    fn test_rose_magnitude_follows_curve() {
        let particles = rose_with_ratio(ORIGIN, 0.0, 2, 1);
        let plan = RosePlan::new(2, 1);
        for (i, p) in particles.iter().enumerate() {
            let a = i as f64 * plan.step;
            let expected = RING_SPEED * (2.0 * a).cos();
            assert!((p.velocity.magnitude() - expected.abs()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_twinkle_five_arms() {
        let particles = twinkle_with_arms(ORIGIN, 0.0, 5);
        assert_eq!(particles.len(), 15);
        for (i, speed) in speeds(&particles).into_iter().enumerate() {
            let radius = speed / TWINKLE_SCALE;
            assert!((radius - [4.0, 3.0, 1.0][i % 3]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_twinkle_arm_range() {
        let mut rng = fastrand::Rng::with_seed(3);
        for _ in 0..50 {
            let n = twinkle(ORIGIN, 0.0, &mut rng).len();
            assert!((12..=21).contains(&n) && n % 3 == 0);
        }
    }

    #[test]
    fn test_circle_and_donut() {
        let ring = circle(ORIGIN, 0.0);
        assert_eq!(ring.len(), 180);
        assert!(speeds(&ring).iter().all(|s| (s - 0.8).abs() < 1e-9));

        let donut = donut(ORIGIN, 0.0);
        assert_eq!(donut.len(), 360);
        assert!((donut[1].velocity.magnitude() - 0.64).abs() < 1e-9);
    }

    #[test]
    fn test_heart_top_and_bottom() {
        let particles = heart(ORIGIN, 0.0);
        assert_eq!(particles.len(), 180);
        // a = 0: the notch at the top, y = -(13 - 5 - 2 - 1) * 0.05
        assert!((particles[0].velocity.y + 0.25).abs() < 1e-9);
        // a = π: the point at the bottom, y = -(-13 - 5 + 2 - 1) * 0.05
        assert!((particles[90].velocity.y - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_normal_is_biased_by_heading() {
        let mut rng = fastrand::Rng::with_seed(11);
        let heading = Vector::new(0.0, -4.0);
        let particles = normal(ORIGIN, 0.0, heading, Density::Standard, &mut rng);
        assert_eq!(particles.len(), 180);
        for p in &particles {
            let own = p.velocity - Vector::new(0.0, -1.0);
            assert!(own.magnitude() >= 0.1 - 1e-9 && own.magnitude() < 1.6);
        }

        let dense = normal(ORIGIN, 0.0, heading, Density::Dense, &mut rng);
        assert_eq!(dense.len(), 360);
    }

    #[test]
    fn test_fragments_share_origin_hue_and_decay() {
        let particles = heart(ORIGIN, 42.0);
        assert!(particles.iter().all(|p| p.position == ORIGIN && p.hue == 42.0 && p.decay == 1.0));
    }

    #[test]
    fn test_path_sample_normalizes_by_largest() {
        let path = ShapePath::parse("box", "M -10 -10 L 10 -10 L 10 10 L -10 10 Z").unwrap();
        let particles = path_sample(ORIGIN, 0.0, &path).unwrap();
        assert_eq!(particles.len(), 180);
        let max = speeds(&particles).into_iter().fold(0.0, f64::max);
        assert!((max - 1.0).abs() < 1e-9);
        // First sample is the corner (-10, -10)
        let first = particles[0].velocity;
        assert!((first.x - first.y).abs() < 1e-9 && first.x < 0.0);
    }

    #[test]
    fn test_path_sample_rejects_degenerate_path() {
        let dot = ShapePath::parse("dot", "M 0 0 L 0 0").unwrap();
        assert!(matches!(path_sample(ORIGIN, 0.0, &dot), Err(Error::DegenerateGeometry(_))));
    }

    #[test]
    fn test_shape_aliases() {
        assert_eq!("hearts".parse::<Shape>().unwrap(), Shape::Heart);
        assert_eq!("Heart".parse::<Shape>().unwrap(), Shape::Heart);
        assert_eq!("custom".parse::<Shape>().unwrap(), Shape::CustomPath);
        assert!(matches!("triangle".parse::<Shape>(), Err(Error::UnknownShape(_))));
        for shape in Shape::CONCRETE {
            assert_eq!(shape.name().parse::<Shape>().unwrap(), shape);
        }
    }

    #[test]
    fn test_random_never_resolves_to_random() {
        let mut rng = fastrand::Rng::with_seed(5);
        for _ in 0..200 {
            assert_ne!(Shape::Random.resolve(&mut rng), Shape::Random);
        }
        assert_eq!(Shape::Donut.resolve(&mut rng), Shape::Donut);
    }

    #[test]
    fn test_detonation_falls_back_without_path() {
        let settings = BurstSettings {
            density: Density::Standard,
            path_reference: Some("missing".to_string()),
            paths: PathLibrary::new(),
        };
        let heading = Vector::new(0.0, -1.0);
        let mut rng = fastrand::Rng::with_seed(1);
        let (shape, particles) =
            settings.detonate(Shape::CustomPath, ORIGIN, 0.0, heading, &mut rng);
        assert_eq!(shape, Shape::Normal);
        assert_eq!(particles.len(), 180);

        let (shape, _) = settings.detonate(Shape::Star, ORIGIN, 0.0, heading, &mut rng);
        assert_eq!(shape, Shape::Normal);
    }

    #[test]
    fn test_detonation_traces_outlines() {
        let mut settings = BurstSettings::default();
        settings.paths.define("diamond", "M 0 -10 L 10 0 L 0 10 L -10 0 Z").unwrap();
        settings.path_reference = Some("diamond".to_string());
        let heading = Vector::new(0.0, -1.0);
        let mut rng = fastrand::Rng::with_seed(1);

        let (shape, particles) = settings.detonate(Shape::Umbrella, ORIGIN, 0.0, heading, &mut rng);
        assert_eq!(shape, Shape::Umbrella);
        assert_eq!(particles.len(), RING_SAMPLES);

        let (shape, particles) =
            settings.detonate(Shape::CustomPath, ORIGIN, 0.0, heading, &mut rng);
        assert_eq!(shape, Shape::CustomPath);
        // First sample is the top vertex, scaled to unit length
        assert!((particles[0].velocity.y + 1.0).abs() < 1e-9);
    }
}
