//! Recording archive factory and handle.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use spool_core::Behavior;
use spool_dump::{ArchiveFactory, ArchiveHandle, DumpMode, RecordStep, Registration};

/// One call observed by a [`RecordingHandle`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArchiveCall {
    Open {
        path: PathBuf,
        mode: DumpMode,
        start_step: u64,
    },
    Register(Registration),
    TextRecord {
        name: String,
        text: String,
        step: RecordStep,
    },
    Flush {
        step: u64,
    },
    Close,
}

#[derive(Default)]
struct Failures {
    open: bool,
    register_at: Option<usize>,
    record: bool,
    close: bool,
}

#[derive(Default)]
struct Shared {
    calls: Vec<ArchiveCall>,
    failures: Failures,
}

/// Archive factory whose handles log every call to a shared list.
///
/// Clones share the same log, so a test can keep one clone for
/// inspection after the scheduler takes ownership of the handle.
#[derive(Clone, Default)]
pub struct RecordingFactory {
    shared: Arc<Mutex<Shared>>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `open` fails with `PermissionDenied`.
    pub fn failing_open() -> Self {
        let factory = Self::new();
        factory.lock().failures.open = true;
        factory
    }

    /// The `index`-th registration (0-based) fails with an I/O error.
    pub fn fail_register_at(self, index: usize) -> Self {
        self.lock().failures.register_at = Some(index);
        self
    }

    /// Every text record write fails.
    pub fn fail_records(self) -> Self {
        self.lock().failures.record = true;
        self
    }

    /// Every `close` fails (the call is still logged).
    pub fn fail_close(self) -> Self {
        self.lock().failures.close = true;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        // A panicking test may poison the lock; the log is still valid.
        self.shared.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Discard every logged call. Failure switches stay set.
    pub fn clear(&self) {
        self.lock().calls.clear();
    }

    /// All calls, in order.
    pub fn calls(&self) -> Vec<ArchiveCall> {
        self.lock().calls.clone()
    }

    /// Arguments of the first `open`, if any.
    pub fn opened(&self) -> Option<(PathBuf, DumpMode, u64)> {
        self.lock().calls.iter().find_map(|call| match call {
            ArchiveCall::Open {
                path,
                mode,
                start_step,
            } => Some((path.clone(), *mode, *start_step)),
            _ => None,
        })
    }

    pub fn registrations(&self) -> Vec<Registration> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                ArchiveCall::Register(reg) => Some(*reg),
                _ => None,
            })
            .collect()
    }

    pub fn constant_registrations(&self) -> Vec<Registration> {
        self.registrations()
            .into_iter()
            .filter(|r| r.behavior == Behavior::Constant)
            .collect()
    }

    pub fn discrete_registrations(&self) -> Vec<Registration> {
        self.registrations()
            .into_iter()
            .filter(|r| r.behavior == Behavior::Discrete)
            .collect()
    }

    /// `(name, text, step)` of every text record written.
    pub fn records(&self) -> Vec<(String, String, RecordStep)> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                ArchiveCall::TextRecord { name, text, step } => {
                    Some((name.clone(), text.clone(), *step))
                }
                _ => None,
            })
            .collect()
    }

    /// Steps of every write cycle.
    pub fn flushes(&self) -> Vec<u64> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                ArchiveCall::Flush { step } => Some(*step),
                _ => None,
            })
            .collect()
    }

    pub fn close_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| matches!(call, ArchiveCall::Close))
            .count()
    }

    /// Whether the last call was a close.
    pub fn is_closed(&self) -> bool {
        matches!(self.lock().calls.last(), Some(ArchiveCall::Close))
    }
}

impl ArchiveFactory for RecordingFactory {
    type Handle = RecordingHandle;

    fn open(&self, path: &Path, mode: DumpMode, start_step: u64) -> io::Result<RecordingHandle> {
        let mut shared = self.lock();
        if shared.failures.open {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("cannot open {}", path.display()),
            ));
        }
        shared.calls.push(ArchiveCall::Open {
            path: path.to_path_buf(),
            mode,
            start_step,
        });
        Ok(RecordingHandle {
            shared: Arc::clone(&self.shared),
            periods: Vec::new(),
            registered: 0,
        })
    }
}

/// Handle produced by [`RecordingFactory`].
pub struct RecordingHandle {
    shared: Arc<Mutex<Shared>>,
    periods: Vec<u64>,
    registered: usize,
}

impl RecordingHandle {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

impl ArchiveHandle for RecordingHandle {
    fn register_property(&mut self, registration: &Registration) -> io::Result<()> {
        let index = self.registered;
        self.registered += 1;
        let mut shared = self.lock();
        if shared.failures.register_at == Some(index) {
            return Err(io::Error::other(format!("registration {index} rejected")));
        }
        shared.calls.push(ArchiveCall::Register(*registration));
        drop(shared);
        if registration.behavior == Behavior::Discrete {
            self.periods.push(registration.period);
        }
        Ok(())
    }

    fn write_text_record(&mut self, name: &str, text: &str, step: RecordStep) -> io::Result<()> {
        let mut shared = self.lock();
        if shared.failures.record {
            return Err(io::Error::other(format!("record {name} rejected")));
        }
        shared.calls.push(ArchiveCall::TextRecord {
            name: name.to_string(),
            text: text.to_string(),
            step,
        });
        Ok(())
    }

    fn flush(&mut self, step: u64) -> io::Result<()> {
        self.lock().calls.push(ArchiveCall::Flush { step });
        Ok(())
    }

    fn current_aggregate_period(&self) -> u64 {
        match self.periods.iter().copied().reduce(gcd) {
            Some(period) if period > 0 => period,
            _ => 1,
        }
    }

    fn close(&mut self) -> io::Result<()> {
        let mut shared = self.lock();
        shared.calls.push(ArchiveCall::Close);
        if shared.failures.close {
            return Err(io::Error::other("close failed"));
        }
        Ok(())
    }
}
