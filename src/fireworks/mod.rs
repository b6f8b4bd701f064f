pub mod firework;
pub mod firework_box;
pub mod particle;
pub mod path;
pub mod shapes;
pub mod vector;

pub use firework::Firework;
pub use firework_box::FireworkBox;
pub use particle::Particle;
pub use path::{PathLibrary, ShapePath};
pub use shapes::{BurstSettings, Density, Shape};
pub use vector::Vector;

/// Nominal tick rate the physics constants are tuned for.
pub const FRAMES_PER_SECOND: u32 = 60;

/// 24-bit colour, same layout the canvas writes as ANSI true colour.
pub type Rgb = (u8, u8, u8);

/// Anything fireworks can be drawn onto. Coordinates are logical units with
/// the origin in the top-left corner.
pub trait Surface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    /// Blend a filled disc of `color` at `alpha` (0..=1) into the surface.
    fn fill_disc(&mut self, center: Vector, radius: f64, color: Rgb, alpha: f64);
}

/// Convert a hue in degrees to RGB at full saturation, 60% lightness.
pub fn hue_to_rgb(hue: f64) -> Rgb {
    const SATURATION: f64 = 1.0;
    const LIGHTNESS: f64 = 0.6;

    let h = hue.rem_euclid(360.0) / 60.0;
    let chroma = (1.0 - (2.0 * LIGHTNESS - 1.0).abs()) * SATURATION;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = LIGHTNESS - chroma / 2.0;
    let channel = |c: f64| ((c + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (channel(r), channel(g), channel(b))
}
