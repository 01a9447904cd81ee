//! Trailing debounce for recomputation triggers.
//!
//! Each [`Debouncer`] owns its own generation counter and result channel, so
//! separate call sites never cancel each other. Within one debouncer, a call
//! waits out the delay and runs only if no newer call arrived meanwhile;
//! superseded calls resolve with the result of the call that did run.
//!
//! A latest call dropped before it runs publishes an abandoned marker. The
//! first superseded caller to see it claims a fresh ticket and runs its own
//! closure; the others resolve with that result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tracing::trace;

use crate::config::DebounceConfig;

/// What the call holding a ticket left behind.
#[derive(Debug, Clone)]
enum Outcome<T> {
    /// The call ran and produced a value.
    Ran(T),
    /// The call was dropped while it was still the latest.
    Abandoned,
}

/// Coalesces rapid calls so only the last one in a quiet window executes.
#[derive(Debug)]
pub struct Debouncer<T> {
    /// Quiet window after the latest call.
    delay: Duration,

    /// Ticket of the most recent call.
    generation: AtomicU64,

    /// Ticket and outcome of the last call that finished or was abandoned.
    latest: watch::Sender<Option<(u64, Outcome<T>)>>,
}

impl<T: Clone> Debouncer<T> {
    /// Create a debouncer with the given quiet window.
    pub fn new(delay: Duration) -> Self {
        let (latest, _) = watch::channel(None);
        Self {
            delay,
            generation: AtomicU64::new(0),
            latest,
        }
    }

    /// Create a debouncer from the `debounce` config section.
    pub fn from_config(config: &DebounceConfig) -> Self {
        Self::new(config.delay())
    }

    /// The configured quiet window.
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `compute`; resolves with the result of the latest call.
    pub async fn call<F>(&self, compute: F) -> T
    where
        F: FnOnce() -> T,
    {
        let ticket = self
            .generation
            .fetch_add(1, Ordering::AcqRel)
            .wrapping_add(1);
        let mut results = self.latest.subscribe();
        let _pending = Pending {
            debouncer: self,
            ticket,
        };

        tokio::time::sleep(self.delay).await;

        if self.generation.load(Ordering::Acquire) == ticket {
            return self.publish(ticket, compute);
        }

        trace!(ticket, "debounced call superseded");
        let mut seen = ticket;
        loop {
            let outcome = results
                .wait_for(|slot| slot.as_ref().is_some_and(|(latest, _)| *latest > seen))
                .await
                .ok()
                .and_then(|slot| (*slot).clone());

            match outcome {
                Some((_, Outcome::Ran(value))) => return value,
                Some((abandoned, Outcome::Abandoned)) => {
                    let claim = abandoned.wrapping_add(1);
                    let claimed = self
                        .generation
                        .compare_exchange(abandoned, claim, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok();
                    if claimed {
                        trace!(ticket, abandoned, "latest call dropped, running superseded call");
                        return self.publish(claim, compute);
                    }
                    seen = abandoned;
                }
                // Closed only if `self` dropped the sender, which cannot happen here.
                None => return compute(),
            }
        }
    }

    fn publish<F>(&self, ticket: u64, compute: F) -> T
    where
        F: FnOnce() -> T,
    {
        let value = compute();
        self.latest
            .send_replace(Some((ticket, Outcome::Ran(value.clone()))));
        value
    }
}

/// Marks a ticket abandoned if its call is dropped while still the latest.
struct Pending<'d, T> {
    debouncer: &'d Debouncer<T>,
    ticket: u64,
}

impl<T> Drop for Pending<'_, T> {
    fn drop(&mut self) {
        if self.debouncer.generation.load(Ordering::Acquire) != self.ticket {
            return;
        }
        let ticket = self.ticket;
        self.debouncer.latest.send_if_modified(|slot| {
            if slot.as_ref().is_some_and(|(latest, _)| *latest >= ticket) {
                return false;
            }
            *slot = Some((ticket, Outcome::Abandoned));
            true
        });
    }
}
