use std::path::PathBuf;

#[cfg(target_os = "windows")]
const ROOT_DISK: &str = "C:\\";
#[cfg(not(target_os = "windows"))]
const ROOT_DISK: &str = "/";

/// Path whose filesystem is reported as "disk usage" unless configured otherwise.
pub fn default_disk_path() -> PathBuf {
    PathBuf::from(ROOT_DISK)
}
