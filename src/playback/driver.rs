// Blocking driver - sleeps on the coordinator's clock between beats

use super::coordinator::PlaybackCoordinator;
use crate::error::MetronomeResult;
use crate::messaging::{Notification, NotificationConsumer};
use ringbuf::traits::Consumer;

/// Poll `coordinator` until no resumption is outstanding
///
/// Returns once the sequence has finished, or immediately if nothing is playing.
/// With a `ManualClock` this runs the whole sequence without waiting.
pub fn run_until_idle(coordinator: &mut PlaybackCoordinator) -> MetronomeResult<()> {
    while let Some(deadline) = coordinator.next_deadline() {
        coordinator.clock().sleep_until(deadline);
        coordinator.poll()?;
    }
    Ok(())
}

/// Like `run_until_idle`, handing every queued notification to `on_event`
/// after each poll so the channel never fills up, whatever the sequence length
pub fn run_until_idle_draining(
    coordinator: &mut PlaybackCoordinator,
    notifications: &mut NotificationConsumer,
    mut on_event: impl FnMut(Notification),
) -> MetronomeResult<()> {
    let mut drain = |consumer: &mut NotificationConsumer| {
        while let Some(notification) = consumer.try_pop() {
            on_event(notification);
        }
    };
    drain(notifications);
    while let Some(deadline) = coordinator.next_deadline() {
        coordinator.clock().sleep_until(deadline);
        let result = coordinator.poll();
        drain(notifications);
        result?;
    }
    Ok(())
}
