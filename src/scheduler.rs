//! Scheduler collaborator boundary.
//!
//! Planning a quarter-by-quarter schedule is an external process's job. This
//! side of the exchange serializes the request payload to the child's stdin,
//! reads one JSON document from its stdout, and relays the plan unvalidated.

use crate::Result;
use crate::catalog::RawCourseRecord;
use anyhow::{Context, bail};
use serde::Serialize;
use std::io::Write;
use std::process::{Command, Stdio};

/// The one-shot request payload.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleRequest<'a> {
    pub catalog: &'a [RawCourseRecord],
    pub required_courses: &'a [String],
    pub completed_courses: &'a [String],
    pub max_courses_per_quarter: u32,
}

/// Ordered quarters, each an unordered set of course ids.
pub type Schedule = Vec<Vec<String>>;

/// Run the scheduler command, feed it the request, parse its plan.
///
/// Failures (spawn, exit status, unparsable output) propagate as errors with
/// the child's stderr attached; nothing is swallowed.
pub fn request_schedule(
    command: &str,
    args: &[String],
    request: &ScheduleRequest<'_>,
) -> Result<Schedule> {
    let payload = serde_json::to_vec(request)?;
    tracing::debug!(
        command,
        required = request.required_courses.len(),
        catalog = request.catalog.len(),
        "invoking scheduler"
    );

    let mut child = Command::new(command)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawn scheduler command {}", command))?;

    child
        .stdin
        .take()
        .context("scheduler stdin unavailable")?
        .write_all(&payload)
        .context("write scheduler request")?;

    let output = child
        .wait_with_output()
        .context("wait for scheduler to finish")?;

    if !output.status.success() {
        bail!(
            "scheduler {} failed ({}): {}",
            command,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let schedule: Schedule = serde_json::from_slice(&output.stdout)
        .context("parse scheduler response as quarters of course ids")?;
    Ok(schedule)
}
