//! Campaign configuration validation.

use crate::schema::CampaignConfig;
use ms_core::DesignVariable;

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing value: {field}")]
    Missing { field: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_config(config: &CampaignConfig) -> Result<(), ValidationError> {
    if config.version == 0 || config.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    if config.name.trim().is_empty() {
        return Err(ValidationError::Missing {
            field: "name".to_string(),
        });
    }

    if config.sample_count == 0 {
        return Err(invalid("sample_count", 0, "must be at least 1"));
    }

    if !config.initial_re.is_finite() || config.initial_re <= 0.0 {
        return Err(invalid("initial_re", config.initial_re, "must be positive"));
    }

    for (variable, [min, max]) in DesignVariable::ALL.iter().zip(config.ranges.bounds()) {
        let field = format!("ranges.{}", variable.label());
        if !min.is_finite() || !max.is_finite() {
            return Err(invalid(field, format!("[{min}, {max}]"), "bounds must be finite"));
        }
        if min > max {
            return Err(invalid(field, format!("[{min}, {max}]"), "min exceeds max"));
        }
    }

    let [td_min, _] = config.ranges.td;
    if td_min <= 0.0 {
        return Err(invalid("ranges.T/D", td_min, "impeller diameter needs T/D > 0"));
    }
    let [re_min, _] = config.ranges.re;
    if re_min <= 0.0 {
        return Err(invalid("ranges.Re", re_min, "Reynolds number must be positive"));
    }

    let dispatch = &config.dispatch;
    if dispatch.max_concurrent_jobs == 0 {
        return Err(invalid("dispatch.max_concurrent_jobs", 0, "must be at least 1"));
    }
    for (field, script, artifacts) in [
        (
            "dispatch.launch_script",
            &dispatch.launch_script,
            &dispatch.launch_artifacts,
        ),
        (
            "dispatch.relaunch_script",
            &dispatch.relaunch_script,
            &dispatch.relaunch_artifacts,
        ),
    ] {
        if script.trim().is_empty() {
            return Err(ValidationError::Missing {
                field: field.to_string(),
            });
        }
        if artifacts.iter().any(|a| a.trim().is_empty()) {
            return Err(invalid(field, "<empty>", "artifact names must not be empty"));
        }
    }
    if let Some(user) = &dispatch.user
        && user.trim().is_empty()
    {
        return Err(invalid("dispatch.user", "<empty>", "omit the key to use $USER"));
    }

    let mesh = &config.mesh;
    if !mesh.min_mesh_length.is_finite() || mesh.min_mesh_length <= 0.0 {
        return Err(invalid("mesh.min_mesh_length", mesh.min_mesh_length, "must be positive"));
    }
    if !mesh.max_ratio.is_finite() || mesh.max_ratio < 1.0 {
        return Err(invalid("mesh.max_ratio", mesh.max_ratio, "must be at least 1"));
    }

    Ok(())
}
