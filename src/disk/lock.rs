//! Probe whether another process holds a file open for exclusive use
//!
//! - **Unix:** tries a non-blocking exclusive `flock`. Writers that take an
//!   advisory lock (most download engines and unpackers do) are detected.
//! - **Windows:** opens the file with no sharing allowed. A sharing or lock
//!   violation means another handle is open.

use std::io;
use std::path::Path;

/// Whether `path` is currently locked by someone else
///
/// Returns an error when the file cannot be opened at all (it vanished, or
/// permissions changed). Locking being unsupported by the filesystem counts
/// as unlocked.
pub(crate) fn is_file_locked(path: &Path) -> io::Result<bool> {
    probe(path)
}

#[cfg(unix)]
fn probe(path: &Path) -> io::Result<bool> {
    use std::os::unix::io::AsRawFd;

    let file = std::fs::File::open(path)?;
    let fd = file.as_raw_fd();

    // SAFETY: fd belongs to `file`, which stays open for the duration of both
    // calls. LOCK_NB makes the call return immediately instead of blocking.
    let rc = unsafe { libc::flock(fd, libc::LOCK_EX | libc::LOCK_NB) };
    if rc == 0 {
        // SAFETY: same fd as above; releasing the lock we just took.
        unsafe {
            libc::flock(fd, libc::LOCK_UN);
        }
        return Ok(false);
    }

    let err = io::Error::last_os_error();
    Ok(err.raw_os_error() == Some(libc::EWOULDBLOCK))
}

#[cfg(windows)]
fn probe(path: &Path) -> io::Result<bool> {
    use std::os::windows::fs::OpenOptionsExt;
    use winapi::shared::winerror::{ERROR_LOCK_VIOLATION, ERROR_SHARING_VIOLATION};

    match std::fs::OpenOptions::new()
        .read(true)
        .share_mode(0)
        .open(path)
    {
        Ok(_) => Ok(false),
        Err(e)
            if e.raw_os_error() == Some(ERROR_SHARING_VIOLATION as i32)
                || e.raw_os_error() == Some(ERROR_LOCK_VIOLATION as i32) =>
        {
            Ok(true)
        }
        Err(e) => Err(e),
    }
}

#[cfg(not(any(unix, windows)))]
fn probe(path: &Path) -> io::Result<bool> {
    std::fs::metadata(path)?;
    Ok(false)
}
