use std::time::Duration;

///
/// Backoff
///
/// The readiness-poll backoff policy. First poll after 100ms, every poll after that
/// at 1s, until `elapsed` would exceed the deadline.
///

#[derive(Clone, Copy, Debug)]
pub struct Backoff {
    deadline: Duration,
    elapsed: Duration,
    polls: u32,
}

impl Backoff {
    #[must_use]
    pub const fn new(deadline: Duration) -> Self {
        Self {
            deadline,
            elapsed: Duration::ZERO,
            polls: 0,
        }
    }

    const INITIAL: Duration = Duration::from_millis(100);
    const STEADY: Duration = Duration::from_secs(1);

    /// Returns the delay to sleep before the next poll, or `None` once the
    /// deadline has been used up.
    pub fn next_delay(&mut self) -> Option<Duration> {
        let step = if self.polls == 0 {
            Self::INITIAL
        } else {
            Self::STEADY
        };
        if self.elapsed >= self.deadline {
            return None;
        }
        let remaining = self.deadline - self.elapsed;
        let delay = step.min(remaining);
        self.elapsed += delay;
        self.polls += 1;
        Some(delay)
    }

    #[must_use]
    pub const fn polls_so_far(&self) -> u32 {
        self.polls
    }
}

/// Poll `is_ready` against a backoff policy until it returns `true` or the
/// deadline is exhausted, sleeping between polls via `sleep`. Generic over
/// the sleep function so tests can run it without real wall-clock delay.
pub async fn poll_until_ready<F, S, Fut>(deadline: Duration, mut is_ready: F, mut sleep: S) -> bool
where
    F: FnMut() -> bool,
    S: FnMut(Duration) -> Fut,
    Fut: std::future::Future<Output = ()>,
{
    if is_ready() {
        return true;
    }
    let mut backoff = Backoff::new(deadline);
    while let Some(delay) = backoff.next_delay() {
        sleep(delay).await;
        tracing::debug!(poll = backoff.polls_so_far(), "polling backend readiness");
        if is_ready() {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_delay_is_short_then_widens() {
        let mut b = Backoff::new(Duration::from_secs(10));
        assert_eq!(b.next_delay(), Some(Duration::from_millis(100)));
        assert_eq!(b.next_delay(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn backoff_exhausts_at_deadline() {
        let mut b = Backoff::new(Duration::from_millis(150));
        assert_eq!(b.next_delay(), Some(Duration::from_millis(100)));
        assert_eq!(b.next_delay(), Some(Duration::from_millis(50)));
        assert_eq!(b.next_delay(), None);
    }

    // Minimal inline executor so this crate doesn't need an async runtime
    // dependency just to test a future that never actually yields to I/O.
    fn block_on<F: std::future::Future>(mut fut: F) -> F::Output {
        use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

        fn noop(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            RawWaker::new(std::ptr::null(), &VTABLE)
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
        let waker = unsafe { Waker::from_raw(RawWaker::new(std::ptr::null(), &VTABLE)) };
        let mut cx = Context::from_waker(&waker);

        let mut fut = unsafe { std::pin::Pin::new_unchecked(&mut fut) };
        loop {
            if let Poll::Ready(out) = fut.as_mut().poll(&mut cx) {
                return out;
            }
        }
    }

    #[test]
    fn poll_until_ready_stops_as_soon_as_ready() {
        let mut calls = 0;
        let ready = block_on(poll_until_ready(
            Duration::from_secs(5),
            || {
                calls += 1;
                calls >= 3
            },
            |_| async {},
        ));
        assert!(ready);
        assert_eq!(calls, 3);
    }
}
