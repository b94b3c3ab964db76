use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::debug;

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(350);

/// Holds back search keystrokes until the input has been quiet for the
/// debounce delay, then emits only the latest text.
pub struct SearchDebouncer {
    input: mpsc::UnboundedSender<String>,
}

impl SearchDebouncer {
    /// Spawn the debounce task. Settled text arrives on the returned
    /// receiver; the task ends when the debouncer is dropped.
    pub fn spawn(delay: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (input, rx) = mpsc::unbounded_channel();
        let (settled, out) = mpsc::unbounded_channel();
        tokio::spawn(run(delay, rx, settled));
        (Self { input }, out)
    }

    pub fn input(&self, text: impl Into<String>) {
        let _ = self.input.send(text.into());
    }
}

async fn run(
    delay: Duration,
    mut rx: mpsc::UnboundedReceiver<String>,
    settled: mpsc::UnboundedSender<String>,
) {
    while let Some(mut latest) = rx.recv().await {
        loop {
            tokio::select! {
                next = rx.recv() => match next {
                    Some(text) => latest = text,
                    None => break,
                },
                _ = sleep(delay) => break,
            }
        }
        debug!(text = %latest, "search settled");
        if settled.send(latest).is_err() {
            return;
        }
    }
}
