use std::future::Future;
use std::io;
use std::time::Duration;

/// How long blocking OS queries still in flight at exit may keep running.
pub const SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

/// Run `future` to completion on a fresh current-thread runtime, then shut
/// the runtime down.
///
/// A query stuck in the kernel (a stale network mount, say) keeps its
/// `spawn_blocking` thread busy after the sampler has been stopped. Dropping
/// the runtime would wait for it; this gives it `grace` and then leaves it
/// behind.
pub fn block_on_with_grace<F: Future>(future: F, grace: Duration) -> io::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let output = runtime.block_on(future);
    runtime.shutdown_timeout(grace);
    Ok(output)
}
