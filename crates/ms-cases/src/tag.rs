//! Tag file: the eight raw parameters of a case on a single line.
//!
//! Format is `<label>\t<value>\t` repeated in design-vector order, values
//! with six decimals, no trailing newline. Dataset rows embed the same line
//! after the case name.

use crate::error::{CaseError, CaseResult};
use ms_core::{DesignVariable, ParameterSet, VARIABLE_COUNT};
use std::path::Path;

pub fn format_tag(params: &ParameterSet) -> String {
    let mut line = String::new();
    for (variable, value) in DesignVariable::ALL.iter().zip(params.values()) {
        line.push_str(&format!("{}\t{:.6}\t", variable.label(), value));
    }
    line
}

pub fn parse_tag(content: &str) -> Result<ParameterSet, String> {
    let fields: Vec<&str> = content
        .trim_end_matches(['\n', '\r'])
        .split('\t')
        .filter(|f| !f.is_empty())
        .collect();
    if fields.len() != 2 * VARIABLE_COUNT {
        return Err(format!(
            "expected {} fields, found {}",
            2 * VARIABLE_COUNT,
            fields.len()
        ));
    }

    let mut values = [0.0; VARIABLE_COUNT];
    for (i, variable) in DesignVariable::ALL.iter().enumerate() {
        let label = fields[2 * i];
        if label != variable.label() {
            return Err(format!(
                "field {} is labelled '{}', expected '{}'",
                2 * i,
                label,
                variable.label()
            ));
        }
        let raw = fields[2 * i + 1];
        values[i] = raw
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("value '{}' for {} is not a number", raw, label))?;
    }
    Ok(ParameterSet::from_values(values))
}

pub fn read_tag_file(path: &Path) -> CaseResult<(String, ParameterSet)> {
    let content = std::fs::read_to_string(path).map_err(|e| CaseError::io(path, e))?;
    let params = parse_tag(&content).map_err(|reason| CaseError::TagFormat {
        path: path.to_path_buf(),
        reason,
    })?;
    Ok((content, params))
}
