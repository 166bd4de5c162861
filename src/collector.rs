//! Collectors take over a stream's channel directly, bypassing the operator chain.

use std::collections::HashMap;
use std::hash::Hash;

use tokio::sync::mpsc;

use crate::stream::Stream;

/// A terminal consumer that takes ownership of a stream's channel.
pub trait Collector<T> {
    fn accept(&mut self, source: mpsc::Receiver<T>);
}

/// Adapts a closure into a [`Collector`].
pub struct CollectorFn<F>(pub F);

impl<T, F> Collector<T> for CollectorFn<F>
where
    F: FnMut(mpsc::Receiver<T>),
{
    fn accept(&mut self, source: mpsc::Receiver<T>) {
        (self.0)(source)
    }
}

impl<T> Stream<T> {
    /// Hand the underlying channel to `collector`.
    pub fn collect<C>(self, collector: &mut C)
    where
        C: Collector<T>,
    {
        collector.accept(self.into_receiver());
    }
}

/// Groups the elements of a collected stream by key.
///
/// The channel is drained the first time [`GroupBy::map`] is awaited; later
/// calls return the cached groups until another channel is accepted.
pub struct GroupBy<T, K, F> {
    source: Option<mpsc::Receiver<T>>,
    key: F,
    groups: Option<HashMap<K, Vec<T>>>,
}

impl<T, K, F> GroupBy<T, K, F>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    pub fn new(key: F) -> Self {
        Self {
            source: None,
            key,
            groups: None,
        }
    }

    pub async fn map(&mut self) -> &HashMap<K, Vec<T>> {
        if self.groups.is_none() {
            let mut groups: HashMap<K, Vec<T>> = HashMap::new();
            if let Some(mut source) = self.source.take() {
                while let Some(item) = source.recv().await {
                    groups.entry((self.key)(&item)).or_default().push(item);
                }
            }
            self.groups = Some(groups);
        }
        self.groups.get_or_insert_with(HashMap::new)
    }

    /// Drain if needed and hand back the groups.
    pub async fn into_map(mut self) -> HashMap<K, Vec<T>> {
        self.map().await;
        self.groups.unwrap_or_default()
    }
}

impl<T, K, F> Collector<T> for GroupBy<T, K, F> {
    fn accept(&mut self, source: mpsc::Receiver<T>) {
        self.source = Some(source);
        self.groups = None;
    }
}

/// Shorthand for [`GroupBy::new`].
pub fn group_by<T, K, F>(key: F) -> GroupBy<T, K, F>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    GroupBy::new(key)
}
