//! Operators that need the whole upstream in memory before emitting anything.
//!
//! None of these terminate on an infinite stream.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

use super::Stream;

impl<T: Send + 'static> Stream<T> {
    /// Stable sort using `less(a, b)` as strict less-than.
    pub fn sort<F>(self, less: F) -> Stream<T>
    where
        F: Fn(&T, &T) -> bool + Send + 'static,
    {
        self.stage(move |mut source, sink| async move {
            let mut items = Vec::new();
            while let Some(item) = source.recv().await {
                items.push(item);
            }
            items.sort_by(|a, b| {
                if less(a, b) {
                    Ordering::Less
                } else if less(b, a) {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            });
            for item in items {
                if sink.send(item).await.is_err() {
                    break;
                }
            }
        })
    }

    /// Group elements by key; each output element is one group's members in
    /// arrival order.
    ///
    /// Groups come out in hash-map iteration order, which is unspecified and
    /// may differ between runs.
    pub fn group_by<K, F>(self, key: F) -> Stream<Vec<T>>
    where
        K: Eq + Hash + Send + 'static,
        F: Fn(&T) -> K + Send + 'static,
    {
        self.stage(move |mut source, sink| async move {
            let mut groups: HashMap<K, Vec<T>> = HashMap::new();
            while let Some(item) = source.recv().await {
                groups.entry(key(&item)).or_default().push(item);
            }
            for (_, group) in groups {
                if sink.send(group).await.is_err() {
                    break;
                }
            }
        })
    }

    pub fn reverse(self) -> Stream<T> {
        self.stage(|mut source, sink| async move {
            let mut items = Vec::new();
            while let Some(item) = source.recv().await {
                items.push(item);
            }
            for item in items.into_iter().rev() {
                if sink.send(item).await.is_err() {
                    break;
                }
            }
        })
    }

    /// A stream with exactly one element: every upstream element, in order.
    pub fn merge(self) -> Stream<Vec<T>> {
        self.stage(|mut source, sink| async move {
            let mut items = Vec::new();
            while let Some(item) = source.recv().await {
                items.push(item);
            }
            let _ = sink.send(items).await;
        })
    }

    /// Visit every element, last to first.
    pub async fn for_each_ordered<F>(self, mut f: F)
    where
        F: FnMut(T),
    {
        for item in self.to_vec().await.into_iter().rev() {
            f(item);
        }
    }
}
