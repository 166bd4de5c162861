//! The executor every stage task is spawned on.
//!
//! An [`Engine`] is constructed explicitly and travels with each [`Stream`]
//! it creates, so a pipeline always runs on the runtime it was built for.
//! Tests can hand in a current-thread runtime to get deterministic scheduling.

use std::future::Future;

use futures_core::Stream as FuturesStream;
use futures_util::StreamExt;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{StreamError, StreamResult};
use crate::stream::{Sink, Stream};
use crate::stream_configuration::STAGE_BUFFER;

#[derive(Debug, Clone)]
pub struct Engine {
    handle: Handle,
}

impl Engine {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Engine on the runtime of the calling task.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    pub fn try_current() -> StreamResult<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| StreamError::InvalidArgument(e.to_string()))
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    pub(crate) fn spawn<F>(&self, fut: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.handle.spawn(fut)
    }

    /// A stream that ends immediately.
    pub fn empty<T>(&self) -> Stream<T> {
        let (_, rx) = mpsc::channel(1);
        self.range(rx)
    }

    /// Wrap an existing receiver. Nothing is spawned.
    pub fn range<T>(&self, source: mpsc::Receiver<T>) -> Stream<T> {
        Stream::new(source, self.clone())
    }

    /// A stream over `items`, buffered so that no task is needed to feed it.
    pub fn of<I, T>(&self, items: I) -> Stream<T>
    where
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = items.into_iter().collect();
        if items.is_empty() {
            return self.empty();
        }
        let (tx, rx) = mpsc::channel(items.len());
        for item in items {
            // capacity equals the number of items, so this never fails
            let _ = tx.try_send(item);
        }
        self.range(rx)
    }

    /// A stream fed by `generate`; it ends when the generator's future completes.
    pub fn from<T, G, Fut>(&self, generate: G) -> Stream<T>
    where
        T: Send + 'static,
        G: FnOnce(Sink<T>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(STAGE_BUFFER);
        self.spawn(async move {
            generate(Sink::new(tx)).await;
        });
        self.range(rx)
    }

    /// Forward any `futures` stream into a new [`Stream`].
    pub fn from_stream<S>(&self, source: S) -> Stream<S::Item>
    where
        S: FuturesStream + Send + 'static,
        S::Item: Send + 'static,
    {
        self.from(move |sink| async move {
            let source = source;
            futures_util::pin_mut!(source);
            while let Some(item) = source.next().await {
                if sink.send(item).await.is_err() {
                    break;
                }
            }
        })
    }

    /// Fan `a` and every stream in `others` into one stream.
    pub fn concat<T, I>(&self, a: Stream<T>, others: I) -> Stream<T>
    where
        T: Send + 'static,
        I: IntoIterator<Item = Stream<T>>,
    {
        let (tx, rx) = mpsc::channel(STAGE_BUFFER);
        for input in std::iter::once(a).chain(others) {
            let tx = tx.clone();
            self.spawn(async move {
                let mut source = input.into_receiver();
                while let Some(item) = source.recv().await {
                    if tx.send(item).await.is_err() {
                        break;
                    }
                }
            });
        }
        // the output closes once every drainer has dropped its sender
        drop(tx);
        self.range(rx)
    }
}
