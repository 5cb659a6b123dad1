//! Monotonic tick generator and related types.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::Kid;

const NANOS_PER_MILLI: u64 = 1_000_000;

/// A trait that defines the time source interface for [`Generator`].
///
/// The default source is [`SystemClock`]; tests substitute a fixed or manually
/// advanced clock to drive the generator deterministically.
pub trait Clock {
    /// Returns the current time as nanoseconds since the Unix epoch.
    fn unix_nanos(&self) -> u64;
}

/// The wall clock, read through [`SystemTime`].
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_nanos(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock may have gone backwards")
            .as_nanos() as u64
    }
}

/// Represents a Kid generator that encapsulates a monotonic tick counter and
/// guarantees the strictly increasing order of (timestamp, sequence) pairs it
/// issues over its lifetime.
///
/// The counter is guarded by an internal mutex, so a single `Generator` shared
/// by reference serializes concurrent callers at exactly one point; the random
/// tail and byte packing happen outside the lock.
///
/// # Examples
///
/// ```rust
/// use std::thread;
/// use kid::{Generator, SystemClock};
///
/// let g = Generator::new(SystemClock);
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = &g;
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.generate(), i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// ```
#[derive(Debug, Default)]
pub struct Generator<C = SystemClock> {
    /// The last issued tick: 52 bits of milliseconds and 12 bits of sequence.
    last_tick: Mutex<u64>,

    /// Time source read at the start of every tick.
    clock: C,
}

impl<C: Clock> Generator<C> {
    /// Creates a generator instance reading time from `clock`.
    pub const fn new(clock: C) -> Self {
        Self {
            last_tick: Mutex::new(0),
            clock,
        }
    }

    /// Issues the next (millisecond timestamp, sequence) pair.
    ///
    /// The combined value `milli << 12 | seq` is guaranteed to be greater than
    /// that of any previous call on the same generator. The sequence is
    /// derived from the high bits of the sub-millisecond nanosecond remainder
    /// and thus ranges over 0..=3906 when the clock advances; when it does
    /// not, the previous tick plus one is issued instead, which can run the
    /// reported timestamp ahead of the wall clock beyond ~4096 calls per real
    /// millisecond.
    ///
    /// Note: this derivation presumes genuine sub-millisecond clock
    /// resolution. On platforms with a coarser timer every same-millisecond
    /// call takes the bump path, which still guarantees uniqueness.
    pub fn tick(&self) -> (u64, u16) {
        let mut last = self
            .last_tick
            .lock()
            .expect("kid: could not lock generator state");

        let nanos = self.clock.unix_nanos();
        let mut milli = nanos / NANOS_PER_MILLI;
        // sequence is between 0 and 3906 (999_999 >> 8)
        let mut seq = (nanos - milli * NANOS_PER_MILLI) >> 8;
        let mut now = milli << 12 | seq;
        if now <= *last {
            // clock did not advance past the last issued tick
            now = *last + 1;
            milli = now >> 12;
            seq = now & 0xfff;
        }
        *last = now;
        (milli, seq as u16)
    }

    /// Generates a new Kid from one tick plus two bytes from the thread-local
    /// CSPRNG.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kid::{Generator, SystemClock};
    ///
    /// let g = Generator::new(SystemClock);
    /// println!("{}", g.generate());
    /// ```
    pub fn generate(&self) -> Kid {
        let (milli, seq) = self.tick();
        Kid::from_parts(milli, seq, rand::random())
    }
}

/// Supports operations as an infinite iterator that produces a new Kid for
/// each call of `next()`.
///
/// # Examples
///
/// ```rust
/// use kid::{Generator, SystemClock};
///
/// Generator::new(SystemClock)
///     .enumerate()
///     .skip(4)
///     .take(4)
///     .for_each(|(i, e)| println!("[{}] {}", i, e));
/// ```
impl<C: Clock> Iterator for Generator<C> {
    type Item = Kid;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<C: Clock> std::iter::FusedIterator for Generator<C> {}
