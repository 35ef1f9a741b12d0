use blockpool::{ObjectFactory, PoolBuilder, PoolError};

use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

struct CountingFactory {
    created: Arc<AtomicUsize>,
}

impl CountingFactory {
    fn new() -> (Self, Arc<AtomicUsize>) {
        let created = Arc::new(AtomicUsize::new(0));
        (
            Self {
                created: Arc::clone(&created),
            },
            created,
        )
    }
}

impl ObjectFactory for CountingFactory {
    type Object = usize;
    type Error = Infallible;

    fn create(&self) -> Result<usize, Infallible> {
        Ok(self.created.fetch_add(1, Ordering::SeqCst))
    }
}

/// Pooled object carrying its own concurrent-holder counter.
struct Probe {
    holders: AtomicUsize,
}

struct ProbeFactory;

impl ObjectFactory for ProbeFactory {
    type Object = Probe;
    type Error = Infallible;

    fn create(&self) -> Result<Probe, Infallible> {
        Ok(Probe {
            holders: AtomicUsize::new(0),
        })
    }
}

fn counting_pool(max: i64) -> (Arc<blockpool::ObjectPool<CountingFactory>>, Arc<AtomicUsize>) {
    let (factory, created) = CountingFactory::new();
    let pool = PoolBuilder::new()
        .initial_size(0)
        .unwrap()
        .max_size(max)
        .unwrap()
        .with_factory(factory)
        .build()
        .unwrap();
    (Arc::new(pool), created)
}

#[test]
fn acquire_blocks_until_an_object_is_returned() {
    let (pool, _) = counting_pool(1);
    let held = pool.acquire().unwrap();

    let (tx, rx) = mpsc::channel();
    let waiter = thread::spawn({
        let pool = Arc::clone(&pool);
        move || {
            let object = pool.acquire().unwrap();
            tx.send(()).unwrap();
            pool.return_object(object).unwrap();
        }
    });

    // The second acquire cannot complete while the only slot is held.
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());

    pool.return_object(held).unwrap();
    assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
    waiter.join().unwrap();
}

#[test]
fn try_acquire_times_out_on_an_exhausted_pool() {
    let (pool, _) = counting_pool(1);
    let _held = pool.acquire().unwrap();

    let timeout = Duration::from_millis(100);
    let start = Instant::now();
    let result = pool.try_acquire(timeout).unwrap();
    assert!(result.is_none());
    assert!(start.elapsed() >= timeout);
}

#[test]
fn try_acquire_succeeds_when_a_slot_frees_in_time() {
    let (pool, _) = counting_pool(1);
    let held = pool.acquire().unwrap();

    let returner = thread::spawn({
        let pool = Arc::clone(&pool);
        move || {
            thread::sleep(Duration::from_millis(50));
            pool.return_object(held).unwrap();
        }
    });

    let start = Instant::now();
    let result = pool.try_acquire(Duration::from_secs(5)).unwrap();
    assert!(result.is_some());
    assert!(start.elapsed() < Duration::from_secs(5));
    returner.join().unwrap();
}

#[test]
fn dispose_wakes_blocked_acquirers() {
    let (pool, _) = counting_pool(1);
    let _held = pool.acquire().unwrap();

    let waiter = thread::spawn({
        let pool = Arc::clone(&pool);
        move || pool.acquire()
    });

    // Give the waiter time to park before disposing.
    thread::sleep(Duration::from_millis(50));
    pool.dispose();

    let result = waiter.join().unwrap();
    assert!(matches!(result, Err(PoolError::Disposed)));
}

#[test]
fn no_object_ever_has_two_holders() {
    let pool = Arc::new(
        PoolBuilder::new()
            .initial_size(0)
            .unwrap()
            .max_size(4)
            .unwrap()
            .with_factory(ProbeFactory)
            .build()
            .unwrap(),
    );
    let violations = Arc::new(AtomicUsize::new(0));

    let workers: Vec<_> = (0..16)
        .map(|_| {
            let pool = Arc::clone(&pool);
            let violations = Arc::clone(&violations);
            thread::spawn(move || {
                for _ in 0..50 {
                    let probe = pool.acquire().unwrap();
                    if probe.holders.fetch_add(1, Ordering::SeqCst) != 0 {
                        violations.fetch_add(1, Ordering::SeqCst);
                    }
                    thread::yield_now();
                    probe.holders.fetch_sub(1, Ordering::SeqCst);
                    pool.return_object(probe).unwrap();
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }
    assert_eq!(violations.load(Ordering::SeqCst), 0);
    assert_eq!(pool.active_count(), 0);
}

#[test]
fn capacity_is_never_exceeded_under_contention() {
    let (pool, created) = counting_pool(4);

    let workers: Vec<_> = (0..16)
        .map(|_| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                for _ in 0..100 {
                    let object = pool.acquire().unwrap();
                    pool.return_object(object).unwrap();
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }
    assert!(created.load(Ordering::SeqCst) <= 4);
    assert_eq!(pool.active_count(), 0);
    assert!(pool.idle_count() <= 4);
}

#[test]
fn waiters_each_get_their_own_object() {
    let (pool, _) = counting_pool(2);
    let first = pool.acquire().unwrap();
    let second = pool.acquire().unwrap();

    let (tx, rx) = mpsc::channel();
    let waiters: Vec<_> = (0..2)
        .map(|_| {
            let pool = Arc::clone(&pool);
            let tx = tx.clone();
            thread::spawn(move || {
                let object = pool.acquire().unwrap();
                tx.send(object).unwrap();
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(50));
    pool.return_object(first).unwrap();
    pool.return_object(second).unwrap();

    let a = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    let b = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_ne!(a, b);

    for waiter in waiters {
        waiter.join().unwrap();
    }
}
