//! Default generator and entry point functions.

use std::sync::OnceLock;

use crate::{Generator, Kid};

/// Returns the process-wide global generator, creating one if none exists.
fn global_gen() -> &'static Generator {
    static G: OnceLock<Generator> = OnceLock::new();
    G.get_or_init(Default::default)
}

/// Generates a new Kid.
///
/// This function employs a process-wide global generator and guarantees that
/// every Kid it returns carries a (timestamp, sequence) pair strictly greater
/// than that of any Kid previously returned in the same process, across any
/// number of threads.
///
/// # Examples
///
/// ```rust
/// let id = kid::kid();
/// println!("{}", id); // e.g., "06bqer9xnm79tfnl"
/// println!("{:?}", id.as_bytes()); // as 10-byte big-endian array
///
/// let id_string: String = kid::kid().into();
/// ```
pub fn kid() -> Kid {
    global_gen().generate()
}

#[cfg(test)]
mod tests {
    use super::kid;

    const N_SAMPLES: usize = 100_000;
    thread_local!(static SAMPLES: Vec<String> = (0..N_SAMPLES).map(|_| kid().into()).collect());

    /// Generates canonical string
    #[test]
    fn generates_canonical_string() {
        let pattern = r"^[0-9b-hj-np-tv-z]{16}$";
        let re = regex::Regex::new(pattern).unwrap();
        SAMPLES.with(|samples| {
            for e in samples {
                assert!(re.is_match(e));
            }
        });
    }

    /// Generates 100k identifiers without collision
    #[test]
    fn generates_100k_identifiers_without_collision() {
        use std::collections::HashSet;
        SAMPLES.with(|samples| {
            let s: HashSet<&String> = samples.iter().collect();
            assert_eq!(s.len(), N_SAMPLES);
        });
    }

    /// Generates sortable string representation by creation time
    #[test]
    fn generates_sortable_string_representation_by_creation_time() {
        SAMPLES.with(|samples| {
            for i in 1..N_SAMPLES {
                assert!(samples[i - 1] < samples[i]);
            }
        });
    }

    /// Encodes a near-present timestamp
    #[test]
    fn encodes_a_near_present_timestamp() {
        use std::time;

        // a private generator; concurrently running tests borrow ticks ahead
        // of the wall clock on the shared global one
        let g: crate::Generator = Default::default();
        for _ in 0..10_000 {
            let ts_now = time::SystemTime::now()
                .duration_since(time::UNIX_EPOCH)
                .expect("clock may have gone backwards")
                .as_millis() as i64;
            let drift = g.generate().timestamp() as i64 - ts_now;
            // the timestamp may only run ahead of the wall clock, and only
            // under sustained generation faster than the tick space refills
            assert!((-16..16).contains(&drift), "drift: {}", drift);
        }
    }

    /// Generates strictly increasing timestamp and sequence pairs
    #[test]
    fn generates_strictly_increasing_timestamp_and_sequence_pairs() {
        let mut prev = kid();
        for _ in 0..1_000_000 {
            let curr = kid();
            assert!(curr.timestamp() >= prev.timestamp());
            if curr.timestamp() == prev.timestamp() {
                assert!(curr.sequence() > prev.sequence());
            }
            assert_eq!(prev.compare(&curr), std::cmp::Ordering::Less);
            prev = curr;
        }
    }

    /// Sets random bits at roughly even probability
    #[test]
    fn sets_random_bits_at_roughly_even_probability() {
        // count '1' of each bit of the two-byte random component
        let bins = SAMPLES.with(|samples| {
            let mut bins = [0u32; 16];
            for e in samples {
                let random = e.parse::<crate::Kid>().unwrap().random();
                for (i, bin) in bins.iter_mut().enumerate() {
                    *bin += (random >> (15 - i) & 1) as u32;
                }
            }
            bins
        });

        // set margin based on binom dist 99.999% confidence interval
        let margin = 4.417173 * (0.5 * 0.5 / N_SAMPLES as f64).sqrt();
        for (i, bin) in bins.iter().enumerate() {
            let p = *bin as f64 / N_SAMPLES as f64;
            assert!((p - 0.5).abs() < margin, "random bit {}: {}", i, p);
        }
    }

    /// Generates no IDs sharing same timestamp and sequence under multithreading
    #[test]
    fn generates_no_ids_sharing_same_timestamp_and_sequence_under_multithreading(
    ) -> Result<(), Box<dyn std::error::Error>> {
        use std::{collections::HashSet, sync::mpsc, thread};

        let (tx, rx) = mpsc::channel();
        for _ in 0..4 {
            let tx = tx.clone();
            thread::Builder::new()
                .spawn(move || {
                    for _ in 0..10_000 {
                        tx.send(kid()).unwrap();
                    }
                })
                .map_err(|err| format!("failed to spawn thread: {:?}", err))?;
        }
        drop(tx);

        let mut s = HashSet::new();
        while let Ok(e) = rx.recv() {
            s.insert(<[u8; 8]>::try_from(&e.as_bytes()[..8]).unwrap());
        }

        assert_eq!(s.len(), 4 * 10_000);
        Ok(())
    }
}
