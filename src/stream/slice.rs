//! Positional and pass-through operators: tail, skip, limit, distinct, buffer, peek.

use std::collections::HashSet;
use std::hash::Hash;
use std::num::NonZeroUsize;

use tokio::sync::mpsc;

use super::{release, Stream};
use crate::ring::Ring;
use crate::stream_configuration::bounded_capacity;

impl<T: Send + 'static> Stream<T> {
    /// The last `n` elements, oldest first.
    ///
    /// `tail(0)` releases the upstream and returns an empty stream.
    pub fn tail(self, n: usize) -> Stream<T> {
        let Some(capacity) = NonZeroUsize::new(n) else {
            let (source, engine) = self.into_parts();
            release(&engine, source);
            return engine.empty();
        };

        self.stage(move |mut source, sink| async move {
            let mut ring = Ring::new(capacity);
            while let Some(item) = source.recv().await {
                ring.add(item);
            }
            for item in ring.into_vec() {
                if sink.send(item).await.is_err() {
                    break;
                }
            }
        })
    }

    /// Drop the first `n` elements. `skip(0)` returns the stream unchanged.
    pub fn skip(self, n: usize) -> Stream<T> {
        if n == 0 {
            return self;
        }

        self.stage(move |mut source, sink| async move {
            let mut seen = 0usize;
            while let Some(item) = source.recv().await {
                if seen < n {
                    seen += 1;
                    continue;
                }
                if sink.send(item).await.is_err() {
                    break;
                }
            }
        })
    }

    /// At most the first `n` elements.
    ///
    /// Once `n` elements have been forwarded the output closes and the
    /// upstream is released, so the producer never blocks on a full buffer.
    pub fn limit(self, n: usize) -> Stream<T> {
        if n == 0 {
            let (source, engine) = self.into_parts();
            release(&engine, source);
            return engine.empty();
        }

        let engine = self.engine().clone();
        self.stage(move |mut source, sink| async move {
            let mut remaining = n;
            while remaining > 0 {
                let Some(item) = source.recv().await else {
                    return;
                };
                if sink.send(item).await.is_err() {
                    break;
                }
                remaining -= 1;
            }
            drop(sink);
            release(&engine, source);
        })
    }

    /// Keep the first element seen for every distinct key.
    pub fn distinct<K, F>(self, key: F) -> Stream<T>
    where
        K: Eq + Hash + Send + 'static,
        F: Fn(&T) -> K + Send + 'static,
    {
        self.stage(move |mut source, sink| async move {
            let mut seen = HashSet::new();
            while let Some(item) = source.recv().await {
                if seen.insert(key(&item)) && sink.send(item).await.is_err() {
                    break;
                }
            }
        })
    }

    /// Re-buffer through a channel holding up to `n` elements (at least one).
    pub fn buffer(self, n: usize) -> Stream<T> {
        let (mut source, engine) = self.into_parts();
        let (tx, rx) = mpsc::channel(bounded_capacity(n));
        engine.spawn(async move {
            while let Some(item) = source.recv().await {
                if tx.send(item).await.is_err() {
                    break;
                }
            }
        });
        engine.range(rx)
    }

    /// Call `f` on every element as it passes through.
    pub fn peek<F>(self, f: F) -> Stream<T>
    where
        F: Fn(&T) + Send + 'static,
    {
        self.stage(move |mut source, sink| async move {
            while let Some(item) = source.recv().await {
                f(&item);
                if sink.send(item).await.is_err() {
                    break;
                }
            }
        })
    }
}
