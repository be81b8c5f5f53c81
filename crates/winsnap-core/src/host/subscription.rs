use std::rc::{Rc, Weak};

use tracing::debug;

use super::traits::{SignalCallback, WindowSystem};
use super::types::{SignalId, WindowSignal};

/// Scoped registration of a window signal callback.
///
/// Dropping the guard disconnects the callback. The guard only weakly
/// references the host, so a host torn down first is not kept alive and the
/// release becomes a no-op.
pub struct Subscription {
    host: Weak<dyn WindowSystem>,
    signal: WindowSignal,
    id: SignalId,
}

impl Subscription {
    pub fn connect(
        host: &Rc<dyn WindowSystem>,
        signal: WindowSignal,
        callback: SignalCallback,
    ) -> Self {
        let id = host.connect(signal, callback);
        debug!(
            event = "core.host.signal_connected",
            signal = %signal,
            id = id.as_u64()
        );
        Self {
            host: Rc::downgrade(host),
            signal,
            id,
        }
    }

    pub fn signal(&self) -> WindowSignal {
        self.signal
    }

    pub fn id(&self) -> SignalId {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(host) = self.host.upgrade() {
            host.disconnect(self.id);
            debug!(
                event = "core.host.signal_disconnected",
                signal = %self.signal,
                id = self.id.as_u64()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHost;

    #[test]
    fn test_drop_disconnects() {
        let fake = FakeHost::new();
        let host: Rc<dyn WindowSystem> = fake.clone();

        let subscription = Subscription::connect(&host, WindowSignal::Appeared, Rc::new(|_, _| {}));
        assert_eq!(fake.handler_count(), 1);
        assert_eq!(subscription.signal(), WindowSignal::Appeared);

        drop(subscription);
        assert_eq!(fake.handler_count(), 0);
    }

    #[test]
    fn test_drop_after_host_is_gone() {
        let fake = FakeHost::new();
        let host: Rc<dyn WindowSystem> = fake;
        let subscription = Subscription::connect(&host, WindowSignal::Removed, Rc::new(|_, _| {}));

        drop(host);
        drop(subscription);
    }
}
