#![cfg(unix)]

use std::error::Error;
use std::time::Duration;

use tokio::time::sleep;

use watchrun::errors::WatchrunError;
use watchrun::proc::ProcessSupervisor;

type TestResult = Result<(), Box<dyn Error>>;

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

fn process_is_alive(pid: u32) -> bool {
    // Signal 0 probes for existence without delivering anything.
    std::process::Command::new("kill")
        .args(["-0", &pid.to_string()])
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[tokio::test]
async fn restart_replaces_a_running_child() -> TestResult {
    let mut supervisor = ProcessSupervisor::start(&argv(&["sleep", "10"])).await?;
    let first = supervisor.id().expect("child running");
    assert!(process_is_alive(first));

    supervisor.restart().await?;
    let second = supervisor.id().expect("child running after restart");

    assert_ne!(first, second, "restart must yield a new process identity");
    assert!(!process_is_alive(first), "old child must be gone");
    assert!(process_is_alive(second));

    supervisor.kill().await?;
    Ok(())
}

#[tokio::test]
async fn restart_succeeds_after_the_child_exited_on_its_own() -> TestResult {
    let mut supervisor = ProcessSupervisor::start(&argv(&["true"])).await?;
    let first = supervisor.id().expect("child launched");

    // Let the child finish naturally before restarting.
    sleep(Duration::from_millis(300)).await;
    supervisor.restart().await?;
    let second = supervisor.id().expect("child running after restart");

    assert_ne!(first, second);

    supervisor.kill().await?;
    Ok(())
}

#[tokio::test]
async fn kill_with_no_child_is_a_noop() -> TestResult {
    let mut supervisor = ProcessSupervisor::start(&argv(&["sleep", "5"])).await?;
    supervisor.kill().await?;
    assert_eq!(supervisor.id(), None);

    // Second kill has nothing to do and still succeeds.
    supervisor.kill().await?;
    Ok(())
}

#[tokio::test]
async fn kill_terminates_the_child() -> TestResult {
    let mut supervisor = ProcessSupervisor::start(&argv(&["sleep", "10"])).await?;
    let pid = supervisor.id().expect("child running");

    supervisor.kill().await?;
    assert!(!process_is_alive(pid));
    assert_eq!(supervisor.id(), None);
    Ok(())
}

#[tokio::test]
async fn unresolvable_executable_is_reported() {
    let result = ProcessSupervisor::start(&argv(&["watchrun-no-such-binary"])).await;
    assert!(matches!(
        result,
        Err(WatchrunError::ExecutableNotFound(_))
    ));
}

#[tokio::test]
async fn shell_commands_run_with_arguments() -> TestResult {
    let mut supervisor = ProcessSupervisor::start(&argv(&["sh", "-c", "sleep 10"])).await?;
    assert!(supervisor.id().is_some());
    supervisor.kill().await?;
    Ok(())
}
