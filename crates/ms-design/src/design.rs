//! Experiment designs over the eight impeller variables.
//!
//! A design is generated once per campaign. Ranges are frozen at generation
//! time and the design is fully determined by `(ranges, count, seed)`.

use crate::error::{DesignError, DesignResult};
use crate::fingerprint::design_fingerprint;
use crate::lhs::unit_design;
use ms_core::{DesignVariable, ParameterSet, VARIABLE_COUNT, lerp};
use std::fmt;

/// Physical bounds of one design variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableRange {
    pub min: f64,
    pub max: f64,
}

impl VariableRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn map_unit(&self, unit: f64) -> f64 {
        lerp(unit, self.min, self.max)
    }

    fn validate(&self, variable: DesignVariable) -> DesignResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min >= self.max {
            return Err(DesignError::InvalidRange {
                variable,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

impl From<[f64; 2]> for VariableRange {
    fn from(bounds: [f64; 2]) -> Self {
        Self::new(bounds[0], bounds[1])
    }
}

impl fmt::Display for VariableRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// How one variable enters the design.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VariableSpec {
    /// Sampled across a non-degenerate range
    Sampled(VariableRange),
    /// Held at a constant value in every case
    Fixed(f64),
}

impl VariableSpec {
    /// Bounds as recorded for the design; a fixed value is `[v, v]`.
    pub fn bounds(&self) -> VariableRange {
        match *self {
            Self::Sampled(range) => range,
            Self::Fixed(value) => VariableRange::new(value, value),
        }
    }
}

/// Design space where some variables may be pinned.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignSpace {
    pub variables: [VariableSpec; VARIABLE_COUNT],
}

impl DesignSpace {
    /// Every bound pair with `min == max` becomes a fixed variable; any other
    /// pair is sampled.
    pub fn from_bounds(bounds: [VariableRange; VARIABLE_COUNT]) -> Self {
        let variables = bounds.map(|r| {
            if r.min == r.max {
                VariableSpec::Fixed(r.min)
            } else {
                VariableSpec::Sampled(r)
            }
        });
        Self { variables }
    }

    pub fn generate(&self, sample_count: usize, seed: u64) -> DesignResult<ExperimentDesign> {
        for (variable, spec) in DesignVariable::ALL.into_iter().zip(&self.variables) {
            match spec {
                VariableSpec::Sampled(range) => range.validate(variable)?,
                VariableSpec::Fixed(value) if !value.is_finite() => {
                    return Err(DesignError::InvalidFixedValue {
                        variable,
                        value: *value,
                    });
                }
                VariableSpec::Fixed(_) => {}
            }
        }
        if sample_count == 0 {
            return Err(DesignError::InvalidCount {
                count: sample_count,
            });
        }

        // Fixed variables still own a column so the sampled columns do not
        // depend on which variables are pinned.
        let unit = unit_design(VARIABLE_COUNT, sample_count, seed);
        let samples = unit
            .iter()
            .map(|row| {
                let mut point = [0.0; VARIABLE_COUNT];
                for (d, spec) in self.variables.iter().enumerate() {
                    point[d] = match spec {
                        VariableSpec::Sampled(range) => range.map_unit(row[d]),
                        VariableSpec::Fixed(value) => *value,
                    };
                }
                point
            })
            .collect();

        Ok(ExperimentDesign {
            ranges: self.variables.map(|s| s.bounds()),
            seed,
            samples,
        })
    }
}

/// Generate a centered Latin Hypercube design over eight strictly increasing
/// ranges.
pub fn generate_design(
    ranges: &[VariableRange; VARIABLE_COUNT],
    sample_count: usize,
    seed: u64,
) -> DesignResult<ExperimentDesign> {
    DesignSpace {
        variables: (*ranges).map(VariableSpec::Sampled),
    }
    .generate(sample_count, seed)
}

/// Ordered design points in physical units.
///
/// The hub entry of each point is still the sampled fraction of `D/W`; use
/// [`ExperimentDesign::parameters`] for the values a case is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentDesign {
    pub ranges: [VariableRange; VARIABLE_COUNT],
    pub seed: u64,
    samples: Vec<[f64; VARIABLE_COUNT]>,
}

impl ExperimentDesign {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample(&self, index: usize) -> Option<&[f64; VARIABLE_COUNT]> {
        self.samples.get(index)
    }

    pub fn samples(&self) -> &[[f64; VARIABLE_COUNT]] {
        &self.samples
    }

    pub fn parameters(&self, index: usize) -> Option<ParameterSet> {
        self.sample(index).map(ParameterSet::from_design_point)
    }

    /// Iterate `(index, parameters)` in case order.
    pub fn iter_parameters(&self) -> impl Iterator<Item = (usize, ParameterSet)> + '_ {
        self.samples
            .iter()
            .enumerate()
            .map(|(i, p)| (i, ParameterSet::from_design_point(p)))
    }

    pub fn fingerprint(&self) -> String {
        design_fingerprint(&self.ranges, self.len(), self.seed)
    }
}

impl fmt::Display for ExperimentDesign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Design of {} samples (seed {})", self.len(), self.seed)?;
        for (variable, range) in DesignVariable::ALL.iter().zip(&self.ranges) {
            write!(f, ", {variable} {range}")?;
        }
        Ok(())
    }
}
