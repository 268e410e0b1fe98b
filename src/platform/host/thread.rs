//! Spawner for threads that inherit the caller's scheduling class

use std::thread::{self, JoinHandle};

use crate::config;
use crate::platform::traits::{ThreadSpawner, ThreadSpec};
use crate::platform::Result;

/// Named `std` threads without an explicit scheduling class
///
/// The requested policy and priority are carried in the `ThreadSpec` but not
/// applied; `max_priority` reports the configured ceiling so task
/// configurations are validated the same way as on a real-time host.
#[derive(Debug, Clone, Copy, Default)]
pub struct InheritedSpawner;

impl InheritedSpawner {
    pub fn new() -> Self {
        Self
    }
}

impl ThreadSpawner for InheritedSpawner {
    fn spawn(
        &self,
        spec: ThreadSpec,
        body: Box<dyn FnOnce() + Send + 'static>,
    ) -> Result<JoinHandle<()>> {
        let handle = thread::Builder::new().name(spec.name).spawn(body)?;
        Ok(handle)
    }

    fn max_priority(&self) -> u8 {
        config::MAX_PRIORITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_carries_name() {
        let handle = InheritedSpawner::new()
            .spawn(
                ThreadSpec::round_robin("rt-task-7", 1),
                Box::new(|| {
                    assert_eq!(thread::current().name(), Some("rt-task-7"));
                }),
            )
            .unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_max_priority_is_configured_ceiling() {
        assert_eq!(InheritedSpawner::new().max_priority(), config::MAX_PRIORITY);
    }
}
