// Messaging - playback events pushed from the engine to the UI layer

pub mod channels;
pub mod notification;

pub use channels::{NotificationConsumer, NotificationProducer, create_notification_channel};
pub use notification::{Notification, PlaybackEvent};
