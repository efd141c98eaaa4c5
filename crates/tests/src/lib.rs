//! # Integration Tests
//!
//! Cross-crate and concurrency tests.
//!
//! Covers:
//! - the add/remove/write scenario end to end
//! - reader/writer lock discipline under real threads
//! - configuration file -> sink -> files on disk

#[cfg(test)]
mod scenario_tests {
    use std::sync::Arc;

    use fanout::{DestinationRef, FanoutSink, MemoryDestination};

    fn dest(d: &Arc<MemoryDestination>) -> DestinationRef {
        d.clone()
    }

    #[test]
    fn test_first_second_third() {
        let a = Arc::new(MemoryDestination::new());
        let b = Arc::new(MemoryDestination::new());
        let sink = FanoutSink::new(vec![dest(&a), dest(&b)]);

        sink.write(b"first").unwrap();
        assert_eq!(a.last_chunk().unwrap(), b"first");
        assert_eq!(b.last_chunk().unwrap(), b"first");

        sink.remove(&a);
        sink.write(b"second").unwrap();
        assert_eq!(a.last_chunk().unwrap(), b"first");
        assert_eq!(b.last_chunk().unwrap(), b"second");

        sink.remove(&b);
        sink.add(a.clone());
        sink.write(b"third").unwrap();
        assert_eq!(a.last_chunk().unwrap(), b"third");
        assert_eq!(b.last_chunk().unwrap(), b"second");
    }

    #[test]
    fn test_add_twice_remove_once() {
        let a = Arc::new(MemoryDestination::new());
        let sink = FanoutSink::default();
        sink.add(a.clone());
        sink.add(a.clone());

        sink.remove(&a);
        sink.write(b"gone").unwrap();

        assert!(sink.is_empty());
        assert!(a.chunks().is_empty());
    }

    #[test]
    fn test_nested_sinks_mix_destinations() {
        let leaf = Arc::new(MemoryDestination::new());
        let sibling = Arc::new(MemoryDestination::new());
        let inner = Arc::new(FanoutSink::new(vec![dest(&leaf)]));
        let outer = FanoutSink::new(vec![inner.clone() as DestinationRef, dest(&sibling)]);

        assert_eq!(outer.write(b"tree").unwrap(), 4);
        assert_eq!(leaf.contents(), b"tree");
        assert_eq!(sibling.contents(), b"tree");

        outer.remove(&inner);
        outer.write(b"flat").unwrap();
        assert_eq!(leaf.contents(), b"tree");
        assert_eq!(sibling.contents(), b"treeflat");
    }
}

#[cfg(test)]
mod concurrency_tests {
    use std::io;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::sync::{Arc, Barrier};
    use std::thread;
    use std::time::{Duration, Instant};

    use fanout::{Destination, DestinationRef, FanoutSink, MemoryDestination};

    const WRITERS: usize = 8;
    const WRITES_PER_THREAD: usize = 200;

    fn payload(thread_id: usize) -> Vec<u8> {
        format!("payload-from-thread-{thread_id:02}|").repeat(16).into_bytes()
    }

    #[test]
    fn test_concurrent_writes_deliver_whole_buffers() {
        let a = Arc::new(MemoryDestination::new());
        let b = Arc::new(MemoryDestination::new());
        let sink = Arc::new(FanoutSink::new(vec![
            a.clone() as DestinationRef,
            b.clone() as DestinationRef,
        ]));
        let barrier = Arc::new(Barrier::new(WRITERS));

        let handles: Vec<_> = (0..WRITERS)
            .map(|id| {
                let sink = Arc::clone(&sink);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    let data = payload(id);
                    barrier.wait();
                    for _ in 0..WRITES_PER_THREAD {
                        assert_eq!(sink.write(&data).unwrap(), data.len());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        for destination in [&a, &b] {
            let chunks = destination.chunks();
            assert_eq!(chunks.len(), WRITERS * WRITES_PER_THREAD);
            for id in 0..WRITERS {
                let expected = payload(id);
                let copies = chunks.iter().filter(|c| **c == expected).count();
                assert_eq!(copies, WRITES_PER_THREAD, "thread {id}");
            }
        }
        assert_eq!(
            sink.metrics().write_count(),
            (WRITERS * WRITES_PER_THREAD) as u64
        );
    }

    #[test]
    fn test_add_remove_during_writes() {
        let base = Arc::new(MemoryDestination::new());
        let churn = Arc::new(MemoryDestination::new());
        let sink = Arc::new(FanoutSink::new(vec![base.clone() as DestinationRef]));
        let stop = Arc::new(AtomicBool::new(false));

        let mutator = {
            let sink = Arc::clone(&sink);
            let churn = Arc::clone(&churn);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    sink.add(churn.clone());
                    sink.remove(&churn);
                }
            })
        };

        let writers: Vec<_> = (0..4)
            .map(|id| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    let data = payload(id);
                    for _ in 0..WRITES_PER_THREAD {
                        sink.write(&data).unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }
        stop.store(true, Ordering::Relaxed);
        mutator.join().unwrap();

        assert_eq!(base.chunks().len(), 4 * WRITES_PER_THREAD);
        assert!(!sink.contains(&churn));
        assert_eq!(sink.len(), 1);

        let valid: Vec<_> = (0..4).map(payload).collect();
        for chunk in churn.chunks() {
            assert!(valid.contains(&chunk));
        }
    }

    #[test]
    fn test_add_is_visible_to_later_writes_on_other_threads() {
        let late = Arc::new(MemoryDestination::new());
        let sink = Arc::new(FanoutSink::default());
        let (added_tx, added_rx) = mpsc::channel();

        let writer = {
            let sink = Arc::clone(&sink);
            thread::spawn(move || {
                added_rx.recv().unwrap();
                sink.write(b"after add").unwrap();
            })
        };

        sink.add(late.clone());
        added_tx.send(()).unwrap();
        writer.join().unwrap();

        assert_eq!(late.contents(), b"after add");
    }

    /// Tracks how many writes are inside it at once
    struct Overlap {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl Destination for Overlap {
        fn write(&self, buf: &[u8]) -> io::Result<usize> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            let deadline = Instant::now() + Duration::from_secs(5);
            while self.peak.load(Ordering::SeqCst) < 2 && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(1));
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(buf.len())
        }
    }

    #[test]
    fn test_writes_share_the_lock() {
        let overlap = Arc::new(Overlap {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let sink = Arc::new(FanoutSink::new(vec![overlap.clone() as DestinationRef]));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || sink.write(b"parallel").unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(overlap.peak.load(Ordering::SeqCst), 2);
    }

    /// Blocks inside `write` until released
    struct Gate {
        entered: mpsc::SyncSender<()>,
        release: std::sync::Mutex<mpsc::Receiver<()>>,
        finished: AtomicBool,
    }

    impl Destination for Gate {
        fn write(&self, buf: &[u8]) -> io::Result<usize> {
            let _ = self.entered.send(());
            if let Ok(release) = self.release.lock() {
                let _ = release.recv_timeout(Duration::from_secs(5));
            }
            self.finished.store(true, Ordering::SeqCst);
            Ok(buf.len())
        }
    }

    #[test]
    fn test_remove_waits_for_in_flight_write() {
        let (entered_tx, entered_rx) = mpsc::sync_channel(1);
        let (release_tx, release_rx) = mpsc::channel();
        let gate = Arc::new(Gate {
            entered: entered_tx,
            release: std::sync::Mutex::new(release_rx),
            finished: AtomicBool::new(false),
        });
        let sink = Arc::new(FanoutSink::new(vec![gate.clone() as DestinationRef]));

        let writer = {
            let sink = Arc::clone(&sink);
            thread::spawn(move || sink.write(b"slow").unwrap())
        };
        entered_rx.recv().unwrap();

        let remover = {
            let sink = Arc::clone(&sink);
            let gate = Arc::clone(&gate);
            thread::spawn(move || {
                sink.remove(&gate);
                gate.finished.load(Ordering::SeqCst)
            })
        };

        thread::sleep(Duration::from_millis(50));
        release_tx.send(()).unwrap();

        assert_eq!(writer.join().unwrap(), 4);
        assert!(remover.join().unwrap(), "remove ran while a write held the lock");
        assert!(sink.is_empty());
    }
}

#[cfg(test)]
mod config_e2e_tests {
    use std::fs;

    use config_loader::{ConfigFormat, ConfigLoader};
    use fanout::{create_sink, FanoutError};

    #[test]
    fn test_config_to_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.log");
        let second = dir.path().join("second.log");
        fs::write(&second, b"kept:").unwrap();

        let content = format!(
            r#"
[[outputs]]
name = "first"
kind = "file"
path = {first:?}

[[outputs]]
name = "second"
kind = "file"
path = {second:?}
append = true

[[outputs]]
name = "trace"
kind = "log"
"#,
            first = first.display().to_string(),
            second = second.display().to_string(),
        );

        let config = ConfigLoader::load_from_str(&content, ConfigFormat::Toml).unwrap();
        let sink = create_sink(&config.outputs, config.append).unwrap();

        sink.write(b"line one\n").unwrap();
        sink.write(b"line two\n").unwrap();

        assert_eq!(fs::read(&first).unwrap(), b"line one\nline two\n");
        assert_eq!(fs::read(&second).unwrap(), b"kept:line one\nline two\n");
        assert_eq!(sink.metrics().snapshot().bytes_written, 18);
    }

    #[test]
    fn test_unopenable_file_is_creation_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing_parent = dir.path().join("no_such_dir").join("out.log");
        let outputs = vec![contracts::OutputConfig::file(&missing_parent, false)];

        let err = create_sink(&outputs, false).unwrap_err();
        assert!(matches!(err, FanoutError::DestinationCreation { .. }));
    }
}
