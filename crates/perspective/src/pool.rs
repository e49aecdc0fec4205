//! Bounded worker pool for outbound summarization calls

use futures::future::join_all;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Run `task` over every item with at most `concurrency` in flight.
///
/// Workers claim the next unprocessed index from a shared counter, so each
/// item runs exactly once, and the output at index `i` belongs to `items[i]`
/// whatever order the tasks finish in.
pub async fn run_bounded<T, R, F, Fut>(items: &[T], concurrency: usize, task: F) -> Vec<R>
where
  F: Fn(&T) -> Fut,
  Fut: Future<Output = R>,
{
  let counter = AtomicUsize::new(0);
  let next = &counter;
  let task = &task;
  let workers = concurrency.clamp(1, items.len().max(1));

  let worker = move || async move {
    let mut done = Vec::new();
    loop {
      let index = next.fetch_add(1, Ordering::SeqCst);
      let Some(item) = items.get(index) else { break };
      done.push((index, task(item).await));
    }
    done
  };

  let mut slots: Vec<Option<R>> = std::iter::repeat_with(|| None).take(items.len()).collect();
  for (index, result) in join_all((0..workers).map(|_| worker())).await.into_iter().flatten() {
    slots[index] = Some(result);
  }

  slots.into_iter().flatten().collect()
}
