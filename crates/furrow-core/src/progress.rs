use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Working,
    Complete,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressUnit {
    Bytes,
    Percent,
}

/// Snapshot of an in-progress transfer, reported by the bot per job name.
#[derive(Debug, Clone, Deserialize)]
pub struct JobProgress {
    pub status: JobStatus,
    pub unit: ProgressUnit,
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub percent: f32,
}

/// Whether a transfer is currently running.
#[must_use]
pub fn is_working(job: Option<&JobProgress>) -> bool {
    matches!(job, Some(job) if job.status == JobStatus::Working)
}

/// Progress label shown on the update button while a download is working.
///
/// Byte counts render as `B`, `kB`, or `MB` with half-up rounding at the
/// 1 KiB and 1 MiB boundaries; percent jobs render as `<n>%`.
#[must_use]
pub fn download_progress(job: Option<&JobProgress>) -> Option<String> {
    let job = job.filter(|job| job.status == JobStatus::Working)?;
    match job.unit {
        ProgressUnit::Bytes => {
            let kilobytes = round_div(job.bytes, 1024);
            let megabytes = round_div(job.bytes, 1_048_576);
            if kilobytes < 1 {
                Some(format!("{}B", job.bytes))
            } else if megabytes < 1 {
                Some(format!("{kilobytes}kB"))
            } else {
                Some(format!("{megabytes}MB"))
            }
        }
        ProgressUnit::Percent => Some(format!("{}%", job.percent)),
    }
}

fn round_div(value: u64, divisor: u64) -> u64 {
    (value + divisor / 2) / divisor
}
