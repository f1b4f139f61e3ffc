//! Per-lookup time bounds for slow backing stores.
//!
//! A database backed by disk or network I/O can hang. [`Bounded`] runs each
//! lookup on a worker thread and gives up after a fixed duration, surfacing
//! [`LookupError::Timeout`]. A timed-out worker is detached and its late
//! answer discarded. Retrying is the caller's business.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use profenv_platform::PlatformDescriptor;

use crate::database::{CrossSuite, PackageDatabase, ResolvedPackage, ToolchainDatabase};
use crate::error::{LookupError, Result};

/// Wraps a database so every lookup completes within `limit`.
#[derive(Debug)]
pub struct Bounded<D> {
    inner: Arc<D>,
    limit: Duration,
}

impl<D> Bounded<D> {
    /// Wrap `inner`, giving each lookup at most `limit`.
    pub fn new(inner: D, limit: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            limit,
        }
    }

    /// The per-lookup time bound.
    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// The wrapped database.
    pub fn inner(&self) -> &D {
        &self.inner
    }
}

impl<D: Send + Sync + 'static> Bounded<D> {
    fn run<T, F>(&self, what: String, lookup: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&D) -> Result<T> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        thread::spawn(move || {
            // The receiver may already have given up.
            let _ = tx.send(lookup(&inner));
        });

        match rx.recv_timeout(self.limit) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(LookupError::Timeout {
                what,
                after: self.limit,
            }),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(LookupError::Disconnected { what }),
        }
    }
}

impl<D> PackageDatabase for Bounded<D>
where
    D: PackageDatabase + Send + Sync + 'static,
{
    fn resolve_package(
        &self,
        name: &str,
        platform: &PlatformDescriptor,
    ) -> Result<Option<ResolvedPackage>> {
        let owned = name.to_string();
        let platform = *platform;
        self.run(format!("package '{name}'"), move |db| {
            db.resolve_package(&owned, &platform)
        })
    }
}

impl<D> ToolchainDatabase for Bounded<D>
where
    D: ToolchainDatabase + Send + Sync + 'static,
{
    fn resolve_toolchain(&self, triple: &str) -> Result<Option<CrossSuite>> {
        let owned = triple.to_string();
        self.run(format!("toolchain '{triple}'"), move |db| {
            db.resolve_toolchain(&owned)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::memory::MemoryDatabase;

    struct Stalled;

    impl PackageDatabase for Stalled {
        fn resolve_package(
            &self,
            _name: &str,
            _platform: &PlatformDescriptor,
        ) -> Result<Option<ResolvedPackage>> {
            thread::sleep(Duration::from_secs(5));
            Ok(None)
        }
    }

    struct Crashing;

    impl ToolchainDatabase for Crashing {
        fn resolve_toolchain(&self, _triple: &str) -> Result<Option<CrossSuite>> {
            panic!("backing store crashed");
        }
    }

    #[test]
    fn fast_lookups_pass_through() {
        let db = MemoryDatabase::new().with_package(
            None,
            ResolvedPackage {
                name: "zlib".into(),
                binary_path: None,
                lib_paths: vec![PathBuf::from("/zlib/lib")],
            },
        );
        let bounded = Bounded::new(db, Duration::from_secs(5));
        let linux = PlatformDescriptor::linux_x86_64();
        assert!(bounded.resolve_package("zlib", &linux).unwrap().is_some());
        assert_eq!(bounded.inner().lookups(), 1);
    }

    #[test]
    fn slow_lookup_times_out() {
        let bounded = Bounded::new(Stalled, Duration::from_millis(20));
        let err = bounded
            .resolve_package("zlib", &PlatformDescriptor::linux_x86_64())
            .unwrap_err();
        match err {
            LookupError::Timeout { what, after } => {
                assert_eq!(what, "package 'zlib'");
                assert_eq!(after, Duration::from_millis(20));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn panicking_worker_is_disconnected() {
        let bounded = Bounded::new(Crashing, Duration::from_secs(5));
        let err = bounded.resolve_toolchain("x86_64-w64-mingw32").unwrap_err();
        assert!(matches!(err, LookupError::Disconnected { .. }));
    }
}
