// src/proc/supervisor.rs

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::errors::{Result, WatchrunError};

/// Default bound on waiting for a killed child to be reaped.
pub const TERMINATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Owns the lifecycle of at most one child process.
///
/// The working directory and environment are captured once at
/// [`start`] time and reused for every relaunch. The child inherits
/// stdout/stderr; stdin is not connected.
///
/// [`start`]: ProcessSupervisor::start
pub struct ProcessSupervisor {
    program: PathBuf,
    args: Vec<String>,
    working_dir: PathBuf,
    env: Vec<(OsString, OsString)>,
    termination_timeout: Duration,
    current: Option<RunningChild>,
}

struct RunningChild {
    child: Child,
    pid: u32,
}

impl ProcessSupervisor {
    /// Resolve `argv[0]` on the search path, capture the launch
    /// parameters, and start the first instance.
    pub async fn start(argv: &[String]) -> Result<ProcessSupervisor> {
        let program = argv
            .first()
            .ok_or_else(|| WatchrunError::Config("empty command line".into()))?;
        let program = which::which(program)
            .map_err(|_| WatchrunError::ExecutableNotFound(program.clone()))?;

        let mut supervisor = ProcessSupervisor {
            program,
            args: argv[1..].to_vec(),
            working_dir: std::env::current_dir()?,
            env: std::env::vars_os().collect(),
            termination_timeout: TERMINATION_TIMEOUT,
            current: None,
        };
        supervisor.restart().await?;
        Ok(supervisor)
    }

    /// Kill and fully reap any current child, then launch a fresh one
    /// from the stored parameters. The old instance must be confirmed
    /// dead before the spawn; after a termination timeout no
    /// replacement is launched and the slot is left empty in an
    /// unknown state (the next restart is the recovery path).
    pub async fn restart(&mut self) -> Result<()> {
        self.kill().await?;
        self.spawn()
    }

    /// Terminate the current child without restarting. No-op success
    /// when nothing is running.
    pub async fn kill(&mut self) -> Result<()> {
        let Some(RunningChild { mut child, pid }) = self.current.take() else {
            return Ok(());
        };

        // The child may have exited on its own since we last looked; a
        // failed signal only matters if the process then cannot be
        // reaped within the bound.
        let kill_err = child.start_kill().err();
        debug!(pid, "termination signal sent");

        match timeout(self.termination_timeout, child.wait()).await {
            Ok(Ok(status)) => {
                debug!(pid, ?status, "child reaped");
                Ok(())
            }
            Ok(Err(err)) => Err(WatchrunError::Io(err)),
            Err(_) => {
                if let Some(err) = kill_err {
                    warn!(pid, error = %err, "termination signal had failed");
                }
                Err(WatchrunError::TerminationTimeout {
                    pid,
                    timeout: self.termination_timeout,
                })
            }
        }
    }

    /// Identity of the live child, if one is running.
    pub fn id(&self) -> Option<u32> {
        self.current.as_ref().map(|c| c.pid)
    }

    fn spawn(&mut self) -> Result<()> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .current_dir(&self.working_dir)
            .env_clear()
            .envs(self.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().map_err(|e| WatchrunError::Launch {
            program: self.program.clone(),
            source: e,
        })?;
        let pid = child.id().unwrap_or_default();
        info!(pid, program = ?self.program, "child started");

        self.current = Some(RunningChild { child, pid });
        Ok(())
    }
}
