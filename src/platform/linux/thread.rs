//! Real-time thread spawner (`pthread_setschedparam`)

use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use crate::config;
use crate::platform::traits::{SchedPolicy, ThreadSpawner, ThreadSpec};
use crate::platform::{Result, ThreadError};

/// Spawner placing every thread in an explicit `SCHED_RR` / `SCHED_FIFO` class
///
/// The new thread switches its own scheduling class before running the
/// body and reports the outcome back over a rendezvous channel. `spawn`
/// therefore returns only once the thread either runs under the requested
/// class or has exited without touching the body.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobinSpawner;

impl RoundRobinSpawner {
    pub fn new() -> Self {
        Self
    }
}

fn os_policy(policy: SchedPolicy) -> libc::c_int {
    match policy {
        SchedPolicy::RoundRobin => libc::SCHED_RR,
        SchedPolicy::Fifo => libc::SCHED_FIFO,
    }
}

/// Switch the calling thread to `policy` at `priority`
fn apply_policy(policy: SchedPolicy, priority: u8) -> Result<()> {
    // SAFETY: sched_param is plain old data; all-zero is a valid value.
    let mut param: libc::sched_param = unsafe { std::mem::zeroed() };
    param.sched_priority = libc::c_int::from(priority);

    // SAFETY: pthread_self() is always a valid handle for the calling
    // thread and `param` outlives the call.
    let rc = unsafe {
        libc::pthread_setschedparam(libc::pthread_self(), os_policy(policy), &param)
    };
    match rc {
        0 => Ok(()),
        libc::EPERM => Err(ThreadError::PermissionDenied { priority }),
        libc::EINVAL => Err(ThreadError::InvalidPriority(priority)),
        code => Err(ThreadError::Os(code)),
    }
}

impl ThreadSpawner for RoundRobinSpawner {
    fn spawn(
        &self,
        spec: ThreadSpec,
        body: Box<dyn FnOnce() + Send + 'static>,
    ) -> Result<JoinHandle<()>> {
        let (tx, rx) = mpsc::sync_channel::<Result<()>>(1);
        let ThreadSpec {
            name,
            priority,
            policy,
        } = spec;

        let handle = thread::Builder::new().name(name).spawn(move || {
            let setup = apply_policy(policy, priority);
            let configured = setup.is_ok();
            // The receiver only disappears if the spawning thread unwound
            let _ = tx.send(setup);
            if configured {
                body();
            }
        })?;

        match rx.recv() {
            Ok(Ok(())) => Ok(handle),
            Ok(Err(err)) => {
                let _ = handle.join();
                Err(err)
            }
            Err(_) => {
                let _ = handle.join();
                Err(ThreadError::Exited)
            }
        }
    }

    fn max_priority(&self) -> u8 {
        // SAFETY: plain query without pointers.
        let max = unsafe { libc::sched_get_priority_max(libc::SCHED_RR) };
        if max < 0 {
            config::MAX_PRIORITY
        } else {
            u8::try_from(max).unwrap_or(u8::MAX)
        }
    }
}
