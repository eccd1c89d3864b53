use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const ANGSTROM_TO_NM: f64 = 0.1;
pub const NM_TO_ANGSTROM: f64 = 10.0;

/// The length unit in which coordinates and box vectors are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LengthUnit {
    /// Ångström, the native unit of the fixed-column (PDB) format.
    #[default]
    #[serde(rename = "A")]
    Angstrom,
    /// Nanometer, the native unit of the coordinate/velocity (GRO) format.
    #[serde(rename = "nm")]
    Nanometer,
}

impl LengthUnit {
    /// Factor that converts a length in this unit to `target`.
    pub fn factor_to(self, target: LengthUnit) -> f64 {
        match (self, target) {
            (LengthUnit::Angstrom, LengthUnit::Nanometer) => ANGSTROM_TO_NM,
            (LengthUnit::Nanometer, LengthUnit::Angstrom) => NM_TO_ANGSTROM,
            _ => 1.0,
        }
    }
}

#[derive(Debug, Error)]
#[error("Invalid length unit string")]
pub struct ParseLengthUnitError;

impl FromStr for LengthUnit {
    type Err = ParseLengthUnitError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "Å" | "angstrom" | "Angstrom" => Ok(Self::Angstrom),
            "nm" | "nanometer" | "Nanometer" => Ok(Self::Nanometer),
            _ => Err(ParseLengthUnitError),
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Angstrom => "A",
                Self::Nanometer => "nm",
            }
        )
    }
}

/// Unit-cell edge lengths and angles (degrees) derived from box vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellParameters {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

/// A periodic simulation box stored as a 3x3 matrix whose rows are edge vectors.
///
/// The zero matrix stands for "no periodic box".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimBox {
    vectors: Matrix3<f64>,
}

impl Default for SimBox {
    fn default() -> Self {
        Self::zeros()
    }
}

impl SimBox {
    pub fn zeros() -> Self {
        Self {
            vectors: Matrix3::zeros(),
        }
    }

    pub fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self {
            vectors: Matrix3::from_fn(|i, j| rows[i][j]),
        }
    }

    /// An orthorhombic box with the given edge lengths on the diagonal.
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> Self {
        Self {
            vectors: Matrix3::from_diagonal(&Vector3::new(a, b, c)),
        }
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.vectors[(row, col)]
    }

    pub fn vector(&self, row: usize) -> Vector3<f64> {
        self.vectors.row(row).transpose()
    }

    pub fn diagonal(&self) -> [f64; 3] {
        [
            self.vectors[(0, 0)],
            self.vectors[(1, 1)],
            self.vectors[(2, 2)],
        ]
    }

    /// A box is empty when the product of its diagonal entries is zero.
    pub fn is_empty(&self) -> bool {
        let [xx, yy, zz] = self.diagonal();
        xx * yy * zz == 0.0
    }

    /// True when any off-diagonal entry is nonzero (a triclinic box).
    pub fn has_off_diagonal(&self) -> bool {
        (0..3).any(|i| (0..3).any(|j| i != j && self.vectors[(i, j)] != 0.0))
    }

    pub fn scale(&mut self, factor: f64) {
        self.vectors *= factor;
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            vectors: self.vectors * factor,
        }
    }

    pub fn cell_parameters(&self) -> CellParameters {
        let v1 = self.vector(0);
        let v2 = self.vector(1);
        let v3 = self.vector(2);

        let angle = |u: &Vector3<f64>, w: &Vector3<f64>| {
            if u.norm() == 0.0 || w.norm() == 0.0 {
                90.0
            } else {
                u.angle(w).to_degrees()
            }
        };

        CellParameters {
            a: v1.norm(),
            b: v2.norm(),
            c: v3.norm(),
            alpha: angle(&v2, &v3),
            beta: angle(&v1, &v3),
            gamma: angle(&v1, &v2),
        }
    }
}
