use std::fmt;
use std::num::NonZeroUsize;

/// A positive degree of parallelism for the data-parallel regions the engine
/// exposes (edge-list loading, adjacency sort, degree computation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Concurrency {
    value: NonZeroUsize,
}

impl Concurrency {
    /// Returns `None` if `value` is 0.
    pub fn new(value: usize) -> Option<Self> {
        NonZeroUsize::new(value).map(|v| Self { value: v })
    }

    /// Clamps 0 up to 1 instead of failing.
    pub fn from_usize(value: usize) -> Self {
        Self::new(value.max(1)).expect("clamped to at least 1")
    }

    #[inline]
    pub fn value(&self) -> usize {
        self.value.get()
    }

    /// Degree of parallelism equal to the number of logical CPUs.
    pub fn available_cores() -> Self {
        Self::from_usize(num_cpus::get())
    }

    pub const fn single_threaded() -> Self {
        // SAFETY: 1 is never zero.
        Self {
            value: unsafe { NonZeroUsize::new_unchecked(1) },
        }
    }
}

impl Default for Concurrency {
    fn default() -> Self {
        Self::available_cores()
    }
}

impl fmt::Display for Concurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Concurrency({})", self.value())
    }
}

impl TryFrom<usize> for Concurrency {
    type Error = ConcurrencyError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(ConcurrencyError::InvalidValue(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcurrencyError {
    InvalidValue(usize),
}

impl fmt::Display for ConcurrencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConcurrencyError::InvalidValue(v) => {
                write!(f, "concurrency must be >= 1, got {}", v)
            }
        }
    }
}

impl std::error::Error for ConcurrencyError {}
