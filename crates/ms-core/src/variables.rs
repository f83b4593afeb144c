//! The eight design variables of an impeller case.
//!
//! Lengths are normalized by the vessel diameter `T`, so the impeller
//! diameter is `1 / (T/D)` and the rotational speed is taken as one.

use core::fmt;
use core::str::FromStr;

use crate::{CoreError, Real};

pub const VARIABLE_COUNT: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DesignVariable {
    /// Vessel to impeller diameter ratio
    TankToImpeller,
    /// Liquid height to vessel diameter ratio
    HeightToTank,
    /// Vessel diameter to off-bottom clearance ratio
    TankToClearance,
    /// Impeller diameter to blade width ratio
    ImpellerToBlade,
    /// Hub width, sampled as a fraction of `D/W`
    Hub,
    /// Blade thickness as a fraction of the blade width
    BladeThickness,
    /// Blade pitch angle in radians
    BladeAngle,
    Reynolds,
}

impl DesignVariable {
    /// All variables in design-vector order.
    pub const ALL: [DesignVariable; VARIABLE_COUNT] = [
        Self::TankToImpeller,
        Self::HeightToTank,
        Self::TankToClearance,
        Self::ImpellerToBlade,
        Self::Hub,
        Self::BladeThickness,
        Self::BladeAngle,
        Self::Reynolds,
    ];

    pub fn position(self) -> usize {
        self as usize
    }

    /// Label written in tag files and dataset rows.
    pub fn label(self) -> &'static str {
        match self {
            Self::TankToImpeller => "T/D",
            Self::HeightToTank => "H/T",
            Self::TankToClearance => "T/C",
            Self::ImpellerToBlade => "D/W",
            Self::Hub => "D/W_Hub",
            Self::BladeThickness => "E/W",
            Self::BladeAngle => "theta",
            Self::Reynolds => "Re",
        }
    }

    /// Geometry template placeholder fed by this variable. Reynolds only
    /// reaches the solver through the viscosity.
    pub fn geometry_placeholder(self) -> Option<&'static str> {
        match self {
            Self::TankToImpeller => Some("ratioTD"),
            Self::HeightToTank => Some("ratioHT"),
            Self::TankToClearance => Some("ratioTC"),
            Self::ImpellerToBlade => Some("ratioDW"),
            Self::Hub => Some("ratioDW_Hub"),
            Self::BladeThickness => Some("p_thick"),
            Self::BladeAngle => Some("theta"),
            Self::Reynolds => None,
        }
    }
}

impl fmt::Display for DesignVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DesignVariable {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.label() == s)
            .ok_or_else(|| CoreError::UnknownLabel {
                label: s.to_string(),
            })
    }
}

/// Physical parameters of one case, as recorded in its tag file.
///
/// `dw_hub` is the absolute hub ratio (`hub fraction * D/W`), not the
/// sampled fraction.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterSet {
    pub td: Real,
    pub ht: Real,
    pub tc: Real,
    pub dw: Real,
    pub dw_hub: Real,
    pub blade_thickness: Real,
    pub theta: Real,
    pub re: Real,
}

impl ParameterSet {
    /// Build from a physical design point whose hub entry is still a fraction
    /// of `D/W`.
    pub fn from_design_point(point: &[Real; VARIABLE_COUNT]) -> Self {
        Self {
            td: point[0],
            ht: point[1],
            tc: point[2],
            dw: point[3],
            dw_hub: point[4] * point[3],
            blade_thickness: point[5],
            theta: point[6],
            re: point[7],
        }
    }

    /// Build from already-resolved values in design-vector order.
    pub fn from_values(values: [Real; VARIABLE_COUNT]) -> Self {
        Self {
            td: values[0],
            ht: values[1],
            tc: values[2],
            dw: values[3],
            dw_hub: values[4],
            blade_thickness: values[5],
            theta: values[6],
            re: values[7],
        }
    }

    pub fn values(&self) -> [Real; VARIABLE_COUNT] {
        [
            self.td,
            self.ht,
            self.tc,
            self.dw,
            self.dw_hub,
            self.blade_thickness,
            self.theta,
            self.re,
        ]
    }

    pub fn get(&self, variable: DesignVariable) -> Real {
        self.values()[variable.position()]
    }

    /// Impeller diameter in vessel-diameter units.
    pub fn impeller_diameter(&self) -> Real {
        1.0 / self.td
    }

    /// Kinematic viscosity giving Reynolds number `re` at unit speed.
    pub fn viscosity_for(&self, re: Real) -> Real {
        self.impeller_diameter().powi(2) / re
    }
}
