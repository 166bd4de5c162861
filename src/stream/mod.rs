//! Channel-backed lazy streams
//!
//! A [`Stream`] owns the receiving end of a bounded tokio channel. Every
//! operator consumes the stream, spawns a stage on the stream's [`Engine`]
//! and returns a new stream over the stage's output channel.
//!
//! Dropping a stream is how a consumer cancels: the stage writing into it
//! sees its next send fail, stops, and drops its own upstream in turn.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream as FuturesStream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::engine::Engine;
use crate::error::{StreamError, StreamResult};
use crate::stream_configuration::STAGE_BUFFER;

pub mod fanout;
pub mod materialize;
pub mod search;
pub mod slice;
pub mod walk;

/// A single-pass handle over a sequence of `T`.
pub struct Stream<T> {
    source: mpsc::Receiver<T>,
    engine: Engine,
}

/// Writing end handed to generators and walk callbacks.
pub struct Sink<T> {
    tx: mpsc::Sender<T>,
}

/// Input element of [`Stream::flat_map`]: one value or a nested sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flat<T> {
    Scalar(T),
    Sequence(Vec<T>),
}

impl<T> Sink<T> {
    pub(crate) fn new(tx: mpsc::Sender<T>) -> Self {
        Self { tx }
    }

    /// Send one element, waiting while the downstream buffer is full.
    ///
    /// Fails with [`StreamError::Closed`] once the downstream has been dropped;
    /// producers should stop when that happens.
    pub async fn send(&self, item: T) -> StreamResult<()> {
        self.tx.send(item).await.map_err(|_| StreamError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub(crate) async fn closed(&self) {
        self.tx.closed().await
    }
}

impl<T> Clone for Sink<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> fmt::Debug for Sink<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl<T> fmt::Debug for Stream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("buffered", &self.source.len())
            .field("capacity", &self.source.max_capacity())
            .finish()
    }
}

impl<T> Stream<T> {
    pub(crate) fn new(source: mpsc::Receiver<T>, engine: Engine) -> Self {
        Self { source, engine }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Capacity of the underlying channel.
    pub fn capacity(&self) -> usize {
        self.source.max_capacity()
    }

    /// Receive the next element, or `None` once the stream has ended.
    pub async fn recv(&mut self) -> Option<T> {
        self.source.recv().await
    }

    /// Give up the stream and return its channel.
    pub fn into_receiver(self) -> mpsc::Receiver<T> {
        self.source
    }

    pub fn into_stream(self) -> ReceiverStream<T> {
        ReceiverStream::new(self.source)
    }

    pub(crate) fn into_parts(self) -> (mpsc::Receiver<T>, Engine) {
        (self.source, self.engine)
    }
}

impl<T: Send + 'static> Stream<T> {
    /// Spawn a single-task stage reading this stream and writing to a new one.
    pub(crate) fn stage<U, F, Fut>(self, body: F) -> Stream<U>
    where
        U: Send + 'static,
        F: FnOnce(mpsc::Receiver<T>, Sink<U>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (source, engine) = self.into_parts();
        let (tx, rx) = mpsc::channel(STAGE_BUFFER);
        engine.spawn(body(source, Sink::new(tx)));
        engine.range(rx)
    }

    /// Collect every element, in order.
    pub async fn to_vec(mut self) -> Vec<T> {
        let mut items = Vec::new();
        while let Some(item) = self.source.recv().await {
            items.push(item);
        }
        items
    }
}

impl<T> FuturesStream for Stream<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.get_mut().source.poll_recv(cx)
    }
}

/// Refuse further sends on `source` and discard what is already buffered
/// on a background task, so the producer is never left blocked.
pub(crate) fn release<T: Send + 'static>(engine: &Engine, mut source: mpsc::Receiver<T>) {
    source.close();
    engine.spawn(async move {
        let mut drained = 0usize;
        while source.recv().await.is_some() {
            drained += 1;
        }
        log::trace!("released upstream, discarded {} buffered elements", drained);
    });
}
