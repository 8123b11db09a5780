use std::sync::Arc;

use log::warn;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use smallvec::SmallVec;

static GLOBAL_DIAGNOSTICS: Lazy<Arc<Diagnostics>> = Lazy::new(|| Arc::new(Diagnostics::new()));

/// Deduplicated warning sink.
///
/// Every distinct message is forwarded to the `log` facade at `warn` level the first time it is
/// reported; repeats are swallowed. Transformers share [`Diagnostics::global`] unless another
/// sink is injected with `Transformer::with_diagnostics`.
#[derive(Debug, Default)]
pub struct Diagnostics {
    emitted: Mutex<SmallVec<String, 4>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide sink.
    pub fn global() -> Arc<Diagnostics> {
        Arc::clone(&GLOBAL_DIAGNOSTICS)
    }

    /// Emits `message` unless it was already emitted through this sink. Returns whether the
    /// message was emitted.
    pub fn warn_once(&self, message: &str) -> bool {
        let mut emitted = self.emitted.lock();
        if emitted.iter().any(|m| m == message) {
            return false;
        }

        warn!("{}", message);
        emitted.push(message.to_string());
        true
    }

    /// Messages emitted so far, in emission order.
    pub fn messages(&self) -> Vec<String> {
        self.emitted.lock().iter().cloned().collect()
    }
}
