//! Synchronous publish point for processed command lines.

/// Callback invoked with the raw command line.
pub type Subscriber = Box<dyn FnMut(&str)>;

/// Ordered list of subscribers, called in subscription order on the
/// caller's thread. There is no queue: `publish` returns once every
/// subscriber has run.
#[derive(Default)]
pub struct NotificationBus {
    subscribers: Vec<Subscriber>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&str) + 'static,
    {
        self.subscribers.push(Box::new(callback));
    }

    pub fn publish(&mut self, command_line: &str) {
        for subscriber in &mut self.subscribers {
            subscriber(command_line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn delivers_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = NotificationBus::new();
        for tag in ["first", "second"] {
            let log = Rc::clone(&log);
            bus.subscribe(move |line| log.borrow_mut().push(format!("{tag}:{line}")));
        }
        bus.publish("ls");
        assert_eq!(*log.borrow(), ["first:ls", "second:ls"]);
    }

    #[test]
    fn publish_without_subscribers_is_noop() {
        let mut bus = NotificationBus::new();
        bus.publish("pwd");
    }

    #[test]
    fn subscribers_can_keep_state() {
        let mut count = 0;
        let seen = Rc::new(RefCell::new(0));
        let mut bus = NotificationBus::new();
        let sink = Rc::clone(&seen);
        bus.subscribe(move |_| {
            count += 1;
            *sink.borrow_mut() = count;
        });
        bus.publish("a");
        bus.publish("b");
        assert_eq!(*seen.borrow(), 2);
    }
}
