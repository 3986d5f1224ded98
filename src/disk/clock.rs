//! Timestamp access for files and folders

use chrono::{DateTime, Utc};
use std::io;
use std::path::Path;
use tracing::debug;

/// Ticks (100ns intervals since 0001-01-01) at the Unix epoch
pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

const TICKS_PER_SECOND: i64 = 10_000_000;
const NANOS_PER_TICK: i64 = 100;

/// Convert a timestamp to ticks: 100-nanosecond intervals since 0001-01-01 UTC
///
/// Download ids embed ticks so they stay comparable with ids minted by the
/// orchestration layer.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use usenet_blackhole::disk::to_ticks;
///
/// let epoch = Utc.timestamp_opt(0, 0).unwrap();
/// assert_eq!(to_ticks(epoch), Some(621_355_968_000_000_000));
/// ```
///
/// Returns `None` when the timestamp lies outside the range ticks can hold
/// (roughly years 1 through 29,000).
#[must_use]
pub fn to_ticks(time: DateTime<Utc>) -> Option<i64> {
    time.timestamp()
        .checked_mul(TICKS_PER_SECOND)?
        .checked_add(i64::from(time.timestamp_subsec_nanos()) / NANOS_PER_TICK)?
        .checked_add(UNIX_EPOCH_TICKS)
}

/// Last modification time of `path`
pub(crate) async fn last_write(path: &Path) -> io::Result<DateTime<Utc>> {
    let metadata = tokio::fs::metadata(path).await?;
    Ok(metadata.modified()?.into())
}

/// Creation time of `path`
///
/// Falls back to the modification time on filesystems that don't record a
/// birth time (common on Linux with older kernels or network mounts).
pub(crate) async fn creation_time(path: &Path) -> io::Result<DateTime<Utc>> {
    let metadata = tokio::fs::metadata(path).await?;
    match metadata.created() {
        Ok(created) => Ok(created.into()),
        Err(e) if e.kind() == io::ErrorKind::Unsupported => {
            debug!(path = %path.display(), "creation time unavailable, using last write");
            Ok(metadata.modified()?.into())
        }
        Err(e) => Err(e),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    #[test]
    fn ticks_count_hundred_nanosecond_steps() {
        let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let t1 = Utc.timestamp_opt(1_700_000_000, 250).unwrap();
        let t2 = Utc.timestamp_opt(1_700_000_001, 0).unwrap();

        let base = to_ticks(t0).unwrap();
        assert_eq!(base, UNIX_EPOCH_TICKS + 17_000_000_000_000_000);
        assert_eq!(to_ticks(t1).unwrap() - base, 2, "sub-tick nanos are truncated");
        assert_eq!(to_ticks(t2).unwrap() - base, TICKS_PER_SECOND);
    }

    #[test]
    fn ticks_before_unix_epoch_are_smaller() {
        let before = Utc.timestamp_opt(-1, 0).unwrap();
        assert_eq!(to_ticks(before), Some(UNIX_EPOCH_TICKS - TICKS_PER_SECOND));
    }

    #[test]
    fn far_future_timestamp_has_no_ticks() {
        let far = Utc.with_ymd_and_hms(100_000, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(to_ticks(far), None);

        let from_mtime = Utc.timestamp_opt(1_000_000_000_000, 0).unwrap();
        assert_eq!(to_ticks(from_mtime), None);
    }

    #[test]
    fn year_one_is_tick_zero() {
        let start = Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(to_ticks(start), Some(0));
    }

    #[tokio::test]
    async fn last_write_reflects_set_modified() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("episode.mkv");
        let file = std::fs::File::create(&path).unwrap();
        let stamp = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        file.set_modified(stamp).unwrap();
        drop(file);

        let observed = last_write(&path).await.unwrap();
        assert_eq!(observed, DateTime::<Utc>::from(stamp));
    }

    #[tokio::test]
    async fn creation_time_of_existing_folder_is_available() {
        let temp_dir = TempDir::new().unwrap();
        let created = creation_time(temp_dir.path()).await.unwrap();
        assert!(created <= Utc::now());
    }

    #[tokio::test]
    async fn timestamps_of_missing_path_are_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("gone");

        let err = last_write(&missing).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        let err = creation_time(&missing).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
