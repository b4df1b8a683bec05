//! Touch calibration tables and raw-to-display coordinate mapping
//!
//! Each supported controller kind has a fixed raw range per axis and a
//! fixed per-rotation assignment of raw axis to display axis, direct or
//! inverted. The assignments were measured on real panels; changing an
//! entry manifests as transposed or mirrored touch input, so the tables
//! are data, not derived.

use crate::traits::touch::RawPoint;

/// Screen rotation, matching the display driver's 0-3 convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// All rotations, in table order
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// From the 0-3 convention used by display drivers (wraps modulo 4)
    pub const fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Rotation::Deg0,
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            _ => Rotation::Deg270,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Inclusive raw value range of one touch axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisRange {
    pub min: u16,
    pub max: u16,
}

impl AxisRange {
    pub const fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    /// Mirror a raw value within the range: `min + max - v`.
    ///
    /// Used for panels whose raw X axis runs opposite to the wiring
    /// the tables were measured with.
    pub const fn mirror(&self, v: u16) -> u16 {
        self.min + self.max - v
    }

    pub const fn contains(&self, v: u16) -> bool {
        v >= self.min && v <= self.max
    }
}

/// Which raw axis feeds a display axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisSource {
    RawX,
    RawY,
}

/// Direction of the linear mapping
///
/// `Direct` sends the raw minimum to display 0; `Inverted` sends the
/// raw maximum to display 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MapDirection {
    Direct,
    Inverted,
}

/// One display axis: where it reads from and which way it runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisMap {
    pub source: AxisSource,
    pub direction: MapDirection,
}

impl AxisMap {
    const fn new(source: AxisSource, direction: MapDirection) -> Self {
        Self { source, direction }
    }
}

/// Axis assignment for one rotation: display X map, display Y map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RotationMap {
    pub x: AxisMap,
    pub y: AxisMap,
}

/// Calibration profile for one controller kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationProfile {
    pub x_range: AxisRange,
    pub y_range: AxisRange,
    /// Axis assignment per rotation, indexed by `Rotation::index`
    pub table: [RotationMap; 4],
}

use AxisSource::{RawX, RawY};
use MapDirection::{Direct, Inverted};

/// Resistive/ADC touchscreen profile
pub const ADC_PROFILE: CalibrationProfile = CalibrationProfile {
    x_range: AxisRange::new(325, 750),
    y_range: AxisRange::new(240, 840),
    table: [
        // Deg0: raw X drives display X directly, raw Y inverted
        RotationMap {
            x: AxisMap::new(RawX, Direct),
            y: AxisMap::new(RawY, Inverted),
        },
        // Deg90: axes swap, both inverted
        RotationMap {
            x: AxisMap::new(RawY, Inverted),
            y: AxisMap::new(RawX, Inverted),
        },
        // Deg180: mirror of Deg0
        RotationMap {
            x: AxisMap::new(RawX, Inverted),
            y: AxisMap::new(RawY, Direct),
        },
        // Deg270: mirror of Deg90
        RotationMap {
            x: AxisMap::new(RawY, Direct),
            y: AxisMap::new(RawX, Direct),
        },
    ],
};

/// FIFO (STMPE610-class) touch controller profile
pub const FIFO_PROFILE: CalibrationProfile = CalibrationProfile {
    x_range: AxisRange::new(100, 3800),
    y_range: AxisRange::new(100, 3750),
    table: [
        // Deg0: raw X inverted, raw Y direct
        RotationMap {
            x: AxisMap::new(RawX, Inverted),
            y: AxisMap::new(RawY, Direct),
        },
        // Deg90: axes swap, both direct
        RotationMap {
            x: AxisMap::new(RawY, Direct),
            y: AxisMap::new(RawX, Direct),
        },
        // Deg180: mirror of Deg0
        RotationMap {
            x: AxisMap::new(RawX, Direct),
            y: AxisMap::new(RawY, Inverted),
        },
        // Deg270: mirror of Deg90
        RotationMap {
            x: AxisMap::new(RawY, Inverted),
            y: AxisMap::new(RawX, Inverted),
        },
    ],
};

impl CalibrationProfile {
    /// Map a raw sample into display space for the given rotation.
    ///
    /// Any raw value within the profile's documented range lands in
    /// `[0, width-1] x [0, height-1]`; values outside it are clamped to
    /// the nearest edge (resistive panels drift a few counts past the
    /// measured corners).
    pub fn map(&self, rotation: Rotation, raw: RawPoint, width: u16, height: u16) -> (u16, u16) {
        let entry = &self.table[rotation.index()];
        let x = self.map_axis(&entry.x, raw, width);
        let y = self.map_axis(&entry.y, raw, height);
        (x, y)
    }

    fn map_axis(&self, map: &AxisMap, raw: RawPoint, len: u16) -> u16 {
        let (v, range) = match map.source {
            AxisSource::RawX => (raw.x, self.x_range),
            AxisSource::RawY => (raw.y, self.y_range),
        };
        scale(v, range, len, map.direction)
    }
}

/// Integer linear map of `v` from `range` onto `[0, len-1]`
fn scale(v: u16, range: AxisRange, len: u16, direction: MapDirection) -> u16 {
    let span = (range.max - range.min) as i32;
    let offset = match direction {
        MapDirection::Direct => v as i32 - range.min as i32,
        MapDirection::Inverted => range.max as i32 - v as i32,
    };
    let mapped = offset * (len as i32 - 1) / span;
    mapped.clamp(0, len as i32 - 1) as u16
}
