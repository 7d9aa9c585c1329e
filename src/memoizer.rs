//! A thread-safe, single-flight, compute-once cache for expensive pure functions of a
//! small key, such as per-version templates and per-degree Reed-Solomon tables.
//!
//! Values are handed out as `Arc<R>` and held by the cache only through `Weak`
//! references, plus strong references to the few most recently computed values.
//! A value nobody holds any more may therefore be reclaimed; the next request for
//! its key simply computes it again.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, RwLock, Weak};

/// Number of recently computed values kept alive by default.
pub const DEFAULT_RETAINED: usize = 8;

pub struct Memoizer<K, R> {
    function: Box<dyn Fn(K) -> R + Send + Sync>,
    cache: RwLock<HashMap<K, Weak<R>>>,
    pending: Mutex<HashSet<K>>,
    finished: Condvar,
    retained: Mutex<VecDeque<Arc<R>>>,
    retainlimit: usize,
}

impl<K, R> Memoizer<K, R>
where
    K: Copy + Eq + Hash + Debug,
{
    /// Creates a memoizer for the given function that keeps the
    /// [`DEFAULT_RETAINED`] most recently computed values alive.
    pub fn new(function: impl Fn(K) -> R + Send + Sync + 'static) -> Self {
        Self::with_retention(function, DEFAULT_RETAINED)
    }

    /// Creates a memoizer that keeps at most `retainlimit` recently computed values
    /// alive on its own. With a limit of 0 a value lives only as long as some caller
    /// holds it.
    pub fn with_retention(
        function: impl Fn(K) -> R + Send + Sync + 'static,
        retainlimit: usize,
    ) -> Self {
        Self {
            function: Box::new(function),
            cache: RwLock::new(HashMap::new()),
            pending: Mutex::new(HashSet::new()),
            finished: Condvar::new(),
            retained: Mutex::new(VecDeque::with_capacity(retainlimit)),
            retainlimit,
        }
    }

    /// Returns the value for the given key, computing it if it is not cached.
    ///
    /// At most one thread computes the value for a key at a time. Other threads asking
    /// for the same key wait until a pending computation finishes and then check the
    /// cache again. Computations for different keys run in parallel.
    pub fn get(&self, key: K) -> Arc<R> {
        if let Some(value) = self.lookup(&key) {
            tracing::trace!(?key, "memoizer hit");
            return value;
        }

        {
            let mut pending = lock(&self.pending);
            loop {
                {
                    let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
                    if let Some(weak) = cache.get(&key) {
                        if let Some(value) = weak.upgrade() {
                            return value;
                        }
                        cache.remove(&key);
                    }
                }
                if pending.insert(key) {
                    break;
                }
                pending = self
                    .finished
                    .wait(pending)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        }

        let _guard = PendingGuard { memoizer: self, key };
        tracing::debug!(?key, "memoizer computing value");
        let value = Arc::new((self.function)(key));
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::downgrade(&value));
        self.retain(&value);
        value
    }

    fn lookup(&self, key: &K) -> Option<Arc<R>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .and_then(Weak::upgrade)
    }

    fn retain(&self, value: &Arc<R>) {
        if self.retainlimit == 0 {
            return;
        }
        let mut retained = lock(&self.retained);
        if retained.len() == self.retainlimit {
            retained.pop_front();
        }
        retained.push_back(Arc::clone(value));
    }
}

// Clears the pending marker and wakes every waiter, also when the computation panics.
struct PendingGuard<'a, K, R>
where
    K: Copy + Eq + Hash + Debug,
{
    memoizer: &'a Memoizer<K, R>,
    key: K,
}

impl<K, R> Drop for PendingGuard<'_, K, R>
where
    K: Copy + Eq + Hash + Debug,
{
    fn drop(&mut self) {
        lock(&self.memoizer.pending).remove(&self.key);
        self.memoizer.finished.notify_all();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_caches_value() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let memo = Memoizer::new(move |k: usize| {
            counter.fetch_add(1, Ordering::SeqCst);
            k * 2
        });
        assert_eq!(*memo.get(21), 42);
        assert_eq!(*memo.get(21), 42);
        assert_eq!(*memo.get(5), 10);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_single_flight_under_contention() {
        const THREADS: usize = 16;
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let memo = Arc::new(Memoizer::new(move |k: usize| {
            counter.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(50));
            vec![k; 1024]
        }));
        let barrier = Arc::new(Barrier::new(THREADS));
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let memo = Arc::clone(&memo);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    memo.get(7)
                })
            })
            .collect();
        let results: Vec<Arc<Vec<usize>>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
    }

    #[test]
    fn test_distinct_keys_compute_in_parallel() {
        let inflight = Arc::new(AtomicUsize::new(0));
        let maxinflight = Arc::new(AtomicUsize::new(0));
        let (cur, max) = (Arc::clone(&inflight), Arc::clone(&maxinflight));
        let memo = Arc::new(Memoizer::new(move |k: usize| {
            let now = cur.fetch_add(1, Ordering::SeqCst) + 1;
            max.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(100));
            cur.fetch_sub(1, Ordering::SeqCst);
            k
        }));
        let barrier = Arc::new(Barrier::new(4));
        let handles: Vec<_> = (0..4)
            .map(|k| {
                let memo = Arc::clone(&memo);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    *memo.get(k)
                })
            })
            .collect();
        for (k, h) in handles.into_iter().enumerate() {
            assert_eq!(h.join().unwrap(), k);
        }
        assert!(maxinflight.load(Ordering::SeqCst) >= 2);
    }

    #[test]
    fn test_reclaimed_value_is_recomputed() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let memo = Memoizer::with_retention(
            move |k: u8| {
                counter.fetch_add(1, Ordering::SeqCst);
                String::from_utf8(vec![b'a' + k]).unwrap()
            },
            0,
        );
        let held = memo.get(1);
        assert_eq!(*memo.get(1), "b");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        drop(held);
        assert_eq!(*memo.get(1), "b");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_retention_keeps_recent_values() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let memo = Memoizer::with_retention(
            move |k: u32| {
                counter.fetch_add(1, Ordering::SeqCst);
                k + 1
            },
            2,
        );
        memo.get(1);
        memo.get(2);
        memo.get(1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        memo.get(3); // evicts the value for key 1
        memo.get(1);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_panicking_computation_releases_key() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let memo = Memoizer::new(move |k: usize| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("first computation fails");
            }
            k
        });
        assert!(catch_unwind(AssertUnwindSafe(|| memo.get(3))).is_err());
        assert_eq!(*memo.get(3), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
