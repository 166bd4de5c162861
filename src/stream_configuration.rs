//! Configuration types for xstream operations

use tokio::sync::Semaphore;

/// Capacity of the output channel of single-task stages
pub const STAGE_BUFFER: usize = 1;

/// Default number of concurrent callbacks for a walk stage
pub const DEFAULT_WORK_SIZE: usize = 1;

/// Largest channel capacity or work size tokio accepts
pub const MAX_CAPACITY: usize = Semaphore::MAX_PERMITS;

/// Options for walk-based operators (`walk`, `map`, `filter`, `flat_map`, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    work_size: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            work_size: DEFAULT_WORK_SIZE,
        }
    }
}

/// A functional setter applied by [`Options::load`]
pub type Setter = Box<dyn FnOnce(&mut Options) + Send>;

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// One worker per available CPU
    pub fn cpu_bound() -> Self {
        Self::default().with_work_size(num_cpus::get())
    }

    /// Set the number of callbacks allowed in flight. Zero falls back to the
    /// default and sizes above [`MAX_CAPACITY`] are clamped to it.
    pub fn with_work_size(mut self, size: usize) -> Self {
        self.work_size = normalize(size);
        self
    }

    pub fn work_size(&self) -> usize {
        self.work_size
    }

    /// Build options by applying setters in order; later setters win.
    pub fn load<I>(setters: I) -> Self
    where
        I: IntoIterator<Item = Setter>,
    {
        let mut options = Self::default();
        for setter in setters {
            setter(&mut options);
        }
        options.work_size = normalize(options.work_size);
        options
    }
}

fn normalize(size: usize) -> usize {
    if size == 0 {
        DEFAULT_WORK_SIZE
    } else {
        size.min(MAX_CAPACITY)
    }
}

/// Clamp a requested buffer size into the range a channel or semaphore accepts.
pub(crate) fn bounded_capacity(size: usize) -> usize {
    size.clamp(1, MAX_CAPACITY)
}

/// Setter that sets the work size
pub fn with_work_size(size: usize) -> Setter {
    Box::new(move |options: &mut Options| options.work_size = size)
}

/// Setter that replaces all options with `other`
pub fn with_options(other: Options) -> Setter {
    Box::new(move |options: &mut Options| *options = other)
}
