//! Batch scheduler capability and its Slurm implementation.

use std::collections::BTreeSet;
use std::path::Path;
use std::process::{Command, Output};

pub type JobId = String;

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("{command} exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("unexpected output from {command}: {output}")]
    Parse { command: String, output: String },

    #[error("submission rejected: {0}")]
    Rejected(String),
}

/// The three things the pipeline needs from a batch queue.
pub trait BatchScheduler {
    /// Running plus pending jobs owned by the campaign user.
    fn count_jobs_for_user(&self) -> Result<usize, SchedulerError>;

    /// Submit `script_path` from its own directory under `job_name`.
    fn submit(&self, script_path: &Path, job_name: &str) -> Result<JobId, SchedulerError>;

    /// Names of the user's running and pending jobs.
    fn active_job_names(&self) -> Result<BTreeSet<String>, SchedulerError>;
}

/// Slurm through `squeue` and `sbatch`.
#[derive(Debug, Clone)]
pub struct SlurmScheduler {
    user: String,
    squeue: String,
    sbatch: String,
}

impl SlurmScheduler {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            squeue: "squeue".to_string(),
            sbatch: "sbatch".to_string(),
        }
    }

    /// Override the binaries, e.g. with absolute paths or wrappers.
    pub fn with_binaries(mut self, squeue: impl Into<String>, sbatch: impl Into<String>) -> Self {
        self.squeue = squeue.into();
        self.sbatch = sbatch.into();
        self
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    fn squeue_args(&self) -> Vec<&str> {
        vec!["-u", self.user.as_str(), "-h", "-t", "pending,running", "-r"]
    }

    fn squeue(&self, extra: &[&str]) -> Result<String, SchedulerError> {
        let mut args = self.squeue_args();
        args.extend_from_slice(extra);
        let output = Command::new(&self.squeue).args(&args).output();
        checked_stdout(&self.squeue, output)
    }
}

fn checked_stdout(command: &str, output: std::io::Result<Output>) -> Result<String, SchedulerError> {
    let output = output.map_err(|source| SchedulerError::Spawn {
        command: command.to_string(),
        source,
    })?;
    if !output.status.success() {
        return Err(SchedulerError::Failed {
            command: command.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Job id from `sbatch` output (`Submitted batch job 123456`).
pub fn parse_sbatch_output(stdout: &str) -> Option<JobId> {
    stdout
        .lines()
        .find_map(|line| line.trim().strip_prefix("Submitted batch job "))
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
}

impl BatchScheduler for SlurmScheduler {
    fn count_jobs_for_user(&self) -> Result<usize, SchedulerError> {
        let stdout = self.squeue(&[])?;
        Ok(stdout.lines().filter(|l| !l.trim().is_empty()).count())
    }

    fn submit(&self, script_path: &Path, job_name: &str) -> Result<JobId, SchedulerError> {
        let script = script_path
            .file_name()
            .ok_or_else(|| SchedulerError::Rejected(format!("not a script: {}", script_path.display())))?;
        let mut command = Command::new(&self.sbatch);
        command.arg("-J").arg(job_name).arg(script);
        if let Some(dir) = script_path.parent()
            && !dir.as_os_str().is_empty()
        {
            command.current_dir(dir);
        }

        let stdout = checked_stdout(&self.sbatch, command.output())?;
        parse_sbatch_output(&stdout).ok_or_else(|| SchedulerError::Parse {
            command: self.sbatch.clone(),
            output: stdout.trim().to_string(),
        })
    }

    fn active_job_names(&self) -> Result<BTreeSet<String>, SchedulerError> {
        let stdout = self.squeue(&["-o", "%j"])?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_job_id() {
        assert_eq!(
            parse_sbatch_output("Submitted batch job 4242\n").as_deref(),
            Some("4242")
        );
        assert_eq!(
            parse_sbatch_output("sbatch: note\nSubmitted batch job 7").as_deref(),
            Some("7")
        );
        assert!(parse_sbatch_output("sbatch: error: invalid account").is_none());
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let slurm = SlurmScheduler::new("nobody")
            .with_binaries("/nonexistent/squeue", "/nonexistent/sbatch");
        assert!(matches!(
            slurm.count_jobs_for_user(),
            Err(SchedulerError::Spawn { .. })
        ));
    }
}
