use super::snapshot::ProcessEntry;
use super::source::ProcessSample;
use crate::format::truncate_to_width;

pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_NAME_WIDTH: usize = 25;

/// Top `k` processes by CPU share, highest first. Equal shares keep their
/// enumeration order.
pub fn rank(mut processes: Vec<ProcessSample>, k: usize, name_width: usize) -> Vec<ProcessEntry> {
    // Stable: ties stay in input order.
    processes.sort_by(|a, b| share_key(b.cpu_share).total_cmp(&share_key(a.cpu_share)));
    processes.truncate(k);
    processes
        .into_iter()
        .map(|p| ProcessEntry {
            pid: p.pid,
            name: truncate_to_width(&p.name, name_width),
            cpu_share: share_key(p.cpu_share),
        })
        .collect()
}

fn share_key(share: f64) -> f64 {
    if share.is_nan() { 0.0 } else { share }
}
