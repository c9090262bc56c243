use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Native-side triggers that end up as script events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum HostEvent {
    /// Desktop color scheme changed.
    ThemeChanged { is_dark: bool },
    /// Monitor set or geometry changed.
    ScreenChanged,
    /// Application-defined event forwarded as-is.
    Custom {
        name: String,
        data: serde_json::Value,
    },
    Shutdown,
    #[serde(other)]
    Unknown,
}

pub struct EventBus {
    sender: broadcast::Sender<HostEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HostEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: HostEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(HostEvent::ScreenChanged);

        let event = rx.recv().await.unwrap();
        assert_eq!(event, HostEvent::ScreenChanged);
    }

    #[tokio::test]
    async fn multiple_subscribers() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(HostEvent::ThemeChanged { is_dark: true });

        let e1 = rx1.recv().await.unwrap();
        let e2 = rx2.recv().await.unwrap();
        assert_eq!(e1, HostEvent::ThemeChanged { is_dark: true });
        assert_eq!(e2, HostEvent::ThemeChanged { is_dark: true });
    }

    #[tokio::test]
    async fn events_arrive_in_publish_order() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(HostEvent::ThemeChanged { is_dark: false });
        bus.publish(HostEvent::ScreenChanged);
        bus.publish(HostEvent::Custom {
            name: "saved".into(),
            data: serde_json::json!({"path": "/tmp/a"}),
        });

        assert!(matches!(
            rx.recv().await.unwrap(),
            HostEvent::ThemeChanged { is_dark: false }
        ));
        assert!(matches!(rx.recv().await.unwrap(), HostEvent::ScreenChanged));
        assert!(
            matches!(rx.recv().await.unwrap(), HostEvent::Custom { ref name, .. } if name == "saved")
        );
    }

    #[test]
    fn publish_returns_zero_with_no_subscribers() {
        let bus = EventBus::new(16);
        assert_eq!(bus.publish(HostEvent::Shutdown), 0);
    }

    #[test]
    fn unknown_event_deserializes() {
        let json = r#"{"type":"SomethingNew","data":null}"#;
        let event: HostEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, HostEvent::Unknown);
    }
}
