//! Campaign configuration schema.

use ms_core::VARIABLE_COUNT;
use ms_design::{DesignSpace, VariableRange};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CampaignConfig {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub seed: u64,
    pub sample_count: usize,
    /// Reynolds number the viscosity ramp starts from for faster cases.
    pub initial_re: f64,
    pub ranges: RangesDef,
    #[serde(default)]
    pub templates: TemplatesDef,
    #[serde(default)]
    pub dispatch: DispatchDef,
    #[serde(default)]
    pub mesh: MeshDef,
}

/// `[min, max]` bounds per design variable. Equal bounds pin the variable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RangesDef {
    pub td: [f64; 2],
    pub ht: [f64; 2],
    pub tc: [f64; 2],
    pub dw: [f64; 2],
    pub hub_fraction: [f64; 2],
    pub blade_thickness: [f64; 2],
    pub theta: [f64; 2],
    pub re: [f64; 2],
}

impl RangesDef {
    /// Bounds in design-vector order.
    pub fn bounds(&self) -> [[f64; 2]; VARIABLE_COUNT] {
        [
            self.td,
            self.ht,
            self.tc,
            self.dw,
            self.hub_fraction,
            self.blade_thickness,
            self.theta,
            self.re,
        ]
    }

    pub fn design_space(&self) -> DesignSpace {
        DesignSpace::from_bounds(self.bounds().map(VariableRange::from))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplatesDef {
    #[serde(default = "default_geometry_template")]
    pub geometry: PathBuf,
    #[serde(default = "default_parameter_template")]
    pub parameters: PathBuf,
}

impl Default for TemplatesDef {
    fn default() -> Self {
        Self {
            geometry: default_geometry_template(),
            parameters: default_parameter_template(),
        }
    }
}

fn default_geometry_template() -> PathBuf {
    PathBuf::from("mixer.geo")
}

fn default_parameter_template() -> PathBuf {
    PathBuf::from("mixer.prm")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DispatchDef {
    #[serde(default = "default_max_concurrent_jobs")]
    pub max_concurrent_jobs: usize,
    /// Scheduler account whose jobs count against the quota. Falls back to
    /// `$USER` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default = "default_launch_script")]
    pub launch_script: String,
    #[serde(default = "default_launch_artifacts")]
    pub launch_artifacts: Vec<String>,
    #[serde(default = "default_relaunch_script")]
    pub relaunch_script: String,
    #[serde(default = "default_relaunch_artifacts")]
    pub relaunch_artifacts: Vec<String>,
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
}

impl Default for DispatchDef {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: default_max_concurrent_jobs(),
            user: None,
            launch_script: default_launch_script(),
            launch_artifacts: default_launch_artifacts(),
            relaunch_script: default_relaunch_script(),
            relaunch_artifacts: default_relaunch_artifacts(),
            state_dir: default_state_dir(),
        }
    }
}

fn default_max_concurrent_jobs() -> usize {
    1000
}

fn default_launch_script() -> String {
    "launch_lethe.sh".to_string()
}

fn default_launch_artifacts() -> Vec<String> {
    vec!["launch_lethe.sh".to_string(), "launch_lethe.py".to_string()]
}

fn default_relaunch_script() -> String {
    "relaunch_lethe.sh".to_string()
}

fn default_relaunch_artifacts() -> Vec<String> {
    vec!["relaunch_lethe.sh".to_string(), "relaunch_lethe.py".to_string()]
}

fn default_state_dir() -> PathBuf {
    PathBuf::from("utils")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeshDef {
    #[serde(default = "default_min_mesh_length")]
    pub min_mesh_length: f64,
    /// Largest element size as a multiple of the smallest.
    #[serde(default = "default_max_ratio")]
    pub max_ratio: f64,
}

impl Default for MeshDef {
    fn default() -> Self {
        Self {
            min_mesh_length: default_min_mesh_length(),
            max_ratio: default_max_ratio(),
        }
    }
}

fn default_min_mesh_length() -> f64 {
    0.003
}

fn default_max_ratio() -> f64 {
    10.0
}
