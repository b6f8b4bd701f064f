//! Outline geometry for path-traced bursts.
//!
//! Paths are SVG path data parsed by `kurbo`. A burst samples the outline at
//! evenly spaced arc-length positions, so the curve type of each segment does
//! not change the spacing of the fragments.

use std::collections::HashMap;

use kurbo::{BezPath, ParamCurve, ParamCurveArclen, PathSeg, Point};

use crate::error::{Error, Result};

/// Arc-length accuracy in path units.
const ACCURACY: f64 = 1e-3;

// Outlines are drawn around the origin in a roughly 100x100 box.
const BUILTIN_PATHS: [(&str, &str); 5] = [
    (
        "star",
        "M 0 -50 L 11.8 -16.2 L 47.6 -15.5 L 19.1 6.2 L 29.4 40.5 L 0 20 \
         L -29.4 40.5 L -19.1 6.2 L -47.6 -15.5 L -11.8 -16.2 Z",
    ),
    (
        "skull",
        "M -35 10 C -50 -20 -35 -50 0 -50 C 35 -50 50 -20 35 10 L 25 20 L 25 35 \
         L -25 35 L -25 20 Z \
         M -28 -12 C -28 -22 -12 -22 -12 -12 C -12 -2 -28 -2 -28 -12 Z \
         M 12 -12 C 12 -22 28 -22 28 -12 C 28 -2 12 -2 12 -12 Z \
         M 0 0 L -5 10 L 5 10 Z \
         M -12 25 L -12 35 M 0 25 L 0 35 M 12 25 L 12 35",
    ),
    (
        "rabbit",
        "M -20 45 C -42 45 -42 8 -15 2 C -26 -8 -26 -18 -12 -22 \
         C -22 -45 -18 -55 -10 -50 C -5 -45 -5 -30 -4 -22 L 3 -22 \
         C 6 -36 13 -55 21 -48 C 26 -42 16 -30 9 -20 C 21 -14 21 -4 13 2 \
         C 36 8 42 38 20 45 Z \
         M 26 30 C 34 26 40 32 36 38 C 32 42 26 38 26 30 Z",
    ),
    (
        "eagle",
        "M 0 -30 L 6 -22 L 4 -15 C 20 -22 35 -35 50 -30 L 42 -22 L 48 -18 \
         L 38 -12 L 44 -6 L 30 -4 C 20 0 10 5 8 15 L 15 35 L 0 28 L -15 35 \
         L -8 15 C -10 5 -20 0 -30 -4 L -44 -6 L -38 -12 L -48 -18 L -42 -22 \
         L -50 -30 C -35 -35 -20 -22 -4 -15 L -6 -22 Z",
    ),
    (
        "umbrella",
        "M -50 0 Q -50 -45 0 -45 Q 50 -45 50 0 Q 37.5 -10 25 0 Q 12.5 -10 0 0 \
         Q -12.5 -10 -25 0 Q -37.5 -10 -50 0 Z \
         M 0 0 L 0 40 Q 0 50 -10 50 Q -18 50 -18 42",
    ),
];

/// A parsed outline with its total arc length.
#[derive(Debug, Clone)]
pub struct ShapePath {
    segments: Vec<(PathSeg, f64)>,
    length: f64,
}

impl ShapePath {
    pub fn parse(id: &str, data: &str) -> Result<Self> {
        let path = BezPath::from_svg(data).map_err(|e| Error::InvalidPath {
            id: id.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_bez_path(&path))
    }

    pub fn from_bez_path(path: &BezPath) -> Self {
        let segments: Vec<(PathSeg, f64)> = path
            .segments()
            .map(|seg| (seg, seg.arclen(ACCURACY)))
            .collect();
        let length = segments.iter().map(|(_, len)| len).sum();
        Self { segments, length }
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Point `distance` units along the outline, clamped to its ends.
    /// Returns `None` for an empty path.
    pub fn point_at(&self, distance: f64) -> Option<Point> {
        let (last, _) = self.segments.last()?;
        let mut remaining = distance.max(0.0);
        for (seg, len) in &self.segments {
            if *len <= 0.0 {
                continue;
            }
            if remaining <= *len {
                let t = seg.inv_arclen(remaining, ACCURACY);
                return Some(seg.eval(t));
            }
            remaining -= len;
        }
        Some(last.eval(1.0))
    }

    /// `count` points at distances `i * length / count`.
    pub fn sample(&self, count: usize) -> Vec<Point> {
        if count == 0 {
            return Vec::new();
        }
        let spacing = self.length / count as f64;
        (0..count)
            .filter_map(|i| self.point_at(i as f64 * spacing))
            .collect()
    }
}

/// Named outlines a display can reference. Each display owns its own copy.
#[derive(Debug, Clone, Default)]
pub struct PathLibrary {
    paths: HashMap<String, ShapePath>,
}

impl PathLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut library = Self::new();
        for (id, data) in BUILTIN_PATHS {
            // Built-in data is static and known to parse
            if let Ok(path) = ShapePath::parse(id, data) {
                library.paths.insert(id.to_string(), path);
            }
        }
        library
    }

    /// Register (or replace) an outline under `id`.
    pub fn define(&mut self, id: &str, data: &str) -> Result<()> {
        let path = ShapePath::parse(id, data)?;
        tracing::debug!(id, length = path.length(), "path defined");
        self.paths.insert(id.to_string(), path);
        Ok(())
    }

    /// Parse an `ID=SVG_DATA` definition as given on the command line.
    pub fn define_spec(&mut self, spec: &str) -> Result<()> {
        let (id, data) = spec.split_once('=').ok_or_else(|| Error::InvalidPath {
            id: spec.to_string(),
            reason: "expected ID=SVG_PATH_DATA".to_string(),
        })?;
        self.define(id.trim(), data)
    }

    pub fn get(&self, id: &str) -> Option<&ShapePath> {
        self.paths.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.paths.contains_key(id)
    }
}
