//! Weight vectors of the linear board evaluation.
//!
//! A [`Weights`] value holds one signed coefficient per [`BoardFeature`], in
//! feature order. It is the parameter of the scoring function and the genome
//! evolved by the training crate.

use std::{iter, num::ParseFloatError, ops::Index, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::board_feature::{BoardFeature, BoardFeatures};

/// A weight vector of wrong dimensionality was supplied.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("expected {expected} weights, got {actual}", expected = BoardFeature::LEN)]
pub struct WeightDimensionError {
    #[error(not(source))]
    actual: usize,
}

impl WeightDimensionError {
    #[must_use]
    pub fn actual(&self) -> usize {
        self.actual
    }
}

/// Coefficients that cannot form a [`Weights`] value.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum InvalidWeightsError {
    #[display("{_0}")]
    Dimension(WeightDimensionError),
    #[display("weight {index} is not finite: {value}")]
    #[from(ignore)]
    NonFinite { index: usize, value: f64 },
}

/// Error returned when parsing comma-separated weights fails.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ParseWeightsError {
    #[display("invalid weight: {_0}")]
    Number(ParseFloatError),
    #[display("{_0}")]
    Invalid(InvalidWeightsError),
}

/// Signed coefficients, one per board feature.
///
/// # Example
///
/// ```
/// use heurtris_evaluator::{board_feature::BoardFeature, weights::Weights};
///
/// let weights: Weights = "0.76,-0.51,-0.18,-0.36,-0.1".parse().unwrap();
/// assert_eq!(weights[BoardFeature::Holes], -0.36);
///
/// assert!(Weights::try_from(&[1.0, 2.0][..]).is_err());
/// assert!("inf,0,0,0,0".parse::<Weights>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Weights([f64; BoardFeature::LEN]);

impl Weights {
    /// Number of coefficients (5).
    pub const LEN: usize = BoardFeature::LEN;

    #[must_use]
    pub const fn new(values: [f64; Self::LEN]) -> Self {
        Self(values)
    }

    #[must_use]
    pub const fn as_array(&self) -> &[f64; Self::LEN] {
        &self.0
    }

    #[must_use]
    pub fn as_mut_array(&mut self) -> &mut [f64; Self::LEN] {
        &mut self.0
    }

    /// Linear score `Σ wᵢ × featureᵢ`; higher is better.
    #[must_use]
    pub fn dot(&self, features: &BoardFeatures) -> f64 {
        iter::zip(&self.0, features.values())
            .map(|(w, f)| w * f64::from(*f))
            .sum()
    }

    /// Euclidean length of the vector.
    #[must_use]
    pub fn norm(&self) -> f64 {
        self.0.iter().map(|w| w * w).sum::<f64>().sqrt()
    }
}

impl Index<BoardFeature> for Weights {
    type Output = f64;

    fn index(&self, feature: BoardFeature) -> &f64 {
        &self.0[feature.index()]
    }
}

/// Rejects slices of the wrong length and non-finite coefficients.
impl TryFrom<&[f64]> for Weights {
    type Error = InvalidWeightsError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        let values: [f64; Self::LEN] = values.try_into().map_err(|_| WeightDimensionError {
            actual: values.len(),
        })?;
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(InvalidWeightsError::NonFinite { index, value });
        }
        Ok(Self(values))
    }
}

impl TryFrom<Vec<f64>> for Weights {
    type Error = InvalidWeightsError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::try_from(values.as_slice())
    }
}

impl From<Weights> for Vec<f64> {
    fn from(weights: Weights) -> Self {
        weights.0.to_vec()
    }
}

impl FromStr for Weights {
    type Err = ParseWeightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::try_from(values)?)
    }
}
