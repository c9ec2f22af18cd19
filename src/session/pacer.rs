use crate::config::Config;
use std::future::Future;
use tokio::time::{sleep, Duration, Instant};

/// Единственный источник задержек и опроса в сессии.
///
/// Все ожидания идут через `tokio::time`, поэтому в тестах они
/// выполняются на остановленных часах.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    poll_interval: Duration,
}

impl Pacer {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.poll_interval())
    }

    pub async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            sleep(duration).await;
        }
    }

    /// Вызывать `attempt`, пока он не вернёт значение или не истечёт `timeout`.
    ///
    /// Первая попытка делается сразу, последняя ровно на границе таймаута.
    pub async fn poll<T, F, Fut>(&self, timeout: Duration, mut attempt: F) -> Option<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Option<T>>,
    {
        let deadline = Instant::now() + timeout;

        loop {
            if let Some(value) = attempt().await {
                return Some(value);
            }

            let now = Instant::now();
            if now >= deadline {
                return None;
            }

            sleep(self.poll_interval.min(deadline - now)).await;
        }
    }

    pub async fn wait_until<F, Fut>(&self, timeout: Duration, mut predicate: F) -> bool
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = bool>,
    {
        let attempt = || {
            let check = predicate();
            async move { check.await.then_some(()) }
        };
        self.poll(timeout, attempt).await.is_some()
    }
}
