//! Walk: the concurrent per-element stage, and the operators built on it.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};

use super::{Flat, Sink, Stream};
use crate::stream_configuration::Options;
use crate::task::panic_message;
use crate::worker::Gate;

impl<T: Send + 'static> Stream<T> {
    /// Run `f` on every element, letting it write zero or more outputs to the sink.
    ///
    /// At most `options.work_size()` callbacks run at once. With a work size of
    /// one, callbacks run strictly in upstream order; with more, output order is
    /// unspecified.
    ///
    /// A panicking callback is not caught: the stage logs it and goes down with
    /// it, closing its output early. Consumers see a truncated stream that ends
    /// normally, with no error value marking the missing elements.
    pub fn walk<U, F, Fut>(self, f: F, options: Options) -> Stream<U>
    where
        U: Send + 'static,
        F: Fn(T, Sink<U>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (mut source, engine) = self.into_parts();
        let work_size = options.work_size();
        let (tx, rx) = mpsc::channel(work_size);
        let sink = Sink::new(tx);
        let gate = Gate::new(work_size);
        let f = Arc::new(f);
        let handle = engine.handle().clone();

        engine.spawn(async move {
            let mut workers = JoinSet::new();
            loop {
                let Ok(permit) = gate.acquire().await else {
                    break;
                };
                let item = tokio::select! {
                    item = source.recv() => item,
                    _ = sink.closed() => {
                        log::debug!("walk output dropped, releasing upstream");
                        None
                    }
                };
                let Some(item) = item else {
                    drop(permit);
                    break;
                };

                let f = Arc::clone(&f);
                let out = sink.clone();
                workers.spawn_on(
                    async move {
                        let _permit = permit;
                        f(item, out).await;
                    },
                    &handle,
                );
                while let Some(result) = workers.try_join_next() {
                    propagate(result);
                }
            }
            drop(source);

            while let Some(result) = workers.join_next().await {
                propagate(result);
            }
            // last sender: dropping it closes the output
            drop(sink);
        });

        engine.range(rx)
    }

    /// Keep the elements for which `predicate` holds.
    pub fn filter<P>(self, predicate: P, options: Options) -> Stream<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.walk(
            move |item, sink| {
                let keep = predicate(&item);
                async move {
                    if keep {
                        let _ = sink.send(item).await;
                    }
                }
            },
            options,
        )
    }

    pub fn map<U, F>(self, f: F, options: Options) -> Stream<U>
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        self.walk(
            move |item, sink| {
                let out = f(item);
                async move {
                    let _ = sink.send(out).await;
                }
            },
            options,
        )
    }

    /// Run `f` on every element on the walk gate and wait until all are done.
    pub async fn parallel_finish<F>(self, f: F, options: Options)
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.walk::<(), _, _>(
            move |item, _sink| {
                f(item);
                async {}
            },
            options,
        )
        .done()
        .await
    }
}

impl<T: Send + 'static> Stream<Flat<T>> {
    /// Map scalars once and every member of a nested sequence individually.
    pub fn flat_map<U, F>(self, f: F, options: Options) -> Stream<U>
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        self.walk(
            move |item, sink| {
                let f = Arc::clone(&f);
                async move {
                    match item {
                        Flat::Scalar(x) => {
                            let _ = sink.send(f(x)).await;
                        }
                        Flat::Sequence(xs) => {
                            for x in xs {
                                if sink.send(f(x)).await.is_err() {
                                    break;
                                }
                            }
                        }
                    }
                }
            },
            options,
        )
    }
}

fn propagate(result: Result<(), JoinError>) {
    if let Err(e) = result {
        if e.is_panic() {
            let payload = e.into_panic();
            log::error!("walk callback panicked: {}", panic_message(&*payload));
            std::panic::resume_unwind(payload);
        }
    }
}
