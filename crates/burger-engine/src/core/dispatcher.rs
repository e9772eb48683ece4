//! Publish/subscribe message bus.
//!
//! Receivers are handles into an inbox arena owned by the dispatcher. `send`
//! records the tag in every subscribed inbox before returning; the receiving
//! component reads its inbox during its own update and clears it at the end,
//! so an event stays visible for exactly one update of each receiver.

use crate::api::types::Message;

/// Handle to a registered receiver.
///
/// Handles carry the dispatcher generation they were issued in. After
/// [`MessageDispatcher::clear`] every older handle is rejected with a panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReceiverId {
    index: u32,
    generation: u32,
}

/// Tags received since the last clear, with how many times each arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inbox {
    counts: [u16; Message::COUNT],
}

impl Inbox {
    pub fn insert(&mut self, message: Message) {
        let slot = &mut self.counts[message.index()];
        *slot = slot.saturating_add(1);
    }

    pub fn contains(&self, message: Message) -> bool {
        self.count(message) > 0
    }

    /// Number of deliveries of `message` since the last clear.
    pub fn count(&self, message: Message) -> u32 {
        u32::from(self.counts[message.index()])
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    pub fn clear(&mut self) {
        self.counts = [0; Message::COUNT];
    }

    /// Received tags in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Message> + '_ {
        Message::ALL.into_iter().filter(move |m| self.contains(*m))
    }
}

impl Default for Inbox {
    fn default() -> Self {
        Self { counts: [0; Message::COUNT] }
    }
}

pub struct MessageDispatcher {
    /// Subscribers per tag, in subscription order.
    subscribers: Vec<Vec<ReceiverId>>,
    inboxes: Vec<Inbox>,
    generation: u32,
}

impl MessageDispatcher {
    pub fn new() -> Self {
        Self {
            subscribers: vec![Vec::new(); Message::COUNT],
            inboxes: Vec::with_capacity(64),
            generation: 0,
        }
    }

    /// Allocate an inbox for a new receiver.
    pub fn register(&mut self) -> ReceiverId {
        let id = ReceiverId {
            index: self.inboxes.len() as u32,
            generation: self.generation,
        };
        self.inboxes.push(Inbox::default());
        id
    }

    /// Register `receiver` for `message`. Subscribing twice is a no-op.
    pub fn subscribe(&mut self, message: Message, receiver: ReceiverId) {
        self.check(receiver);
        let list = &mut self.subscribers[message.index()];
        if list.contains(&receiver) {
            log::trace!("duplicate subscription to {:?} ignored", message);
            return;
        }
        list.push(receiver);
    }

    /// Subscribe `receiver` to each tag in `messages`.
    pub fn subscribe_all(&mut self, messages: &[Message], receiver: ReceiverId) {
        for &message in messages {
            self.subscribe(message, receiver);
        }
    }

    /// Deliver `message` to every current subscriber. Returns how many were reached.
    pub fn send(&mut self, message: Message) -> usize {
        let list = &self.subscribers[message.index()];
        for receiver in list {
            self.inboxes[receiver.index as usize].insert(message);
        }
        log::trace!("{:?} delivered to {} receiver(s)", message, list.len());
        list.len()
    }

    pub fn received(&self, receiver: ReceiverId, message: Message) -> bool {
        self.inbox(receiver).contains(message)
    }

    pub fn inbox(&self, receiver: ReceiverId) -> Inbox {
        self.check(receiver);
        self.inboxes[receiver.index as usize]
    }

    pub fn clear_inbox(&mut self, receiver: ReceiverId) {
        self.check(receiver);
        self.inboxes[receiver.index as usize].clear();
    }

    /// Drop every subscription and inbox. Existing handles become invalid.
    pub fn clear(&mut self) {
        for list in &mut self.subscribers {
            list.clear();
        }
        self.inboxes.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    /// Number of receivers subscribed to `message`.
    pub fn subscriber_count(&self, message: Message) -> usize {
        self.subscribers[message.index()].len()
    }

    fn check(&self, receiver: ReceiverId) {
        assert!(
            receiver.generation == self.generation && (receiver.index as usize) < self.inboxes.len(),
            "receiver {:?} is not registered with this dispatcher",
            receiver
        );
    }
}

impl Default for MessageDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_only_to_subscribers() {
        let mut d = MessageDispatcher::new();
        let a = d.register();
        let b = d.register();
        d.subscribe(Message::MoveLeft, a);
        d.subscribe(Message::MoveRight, b);

        assert_eq!(d.send(Message::MoveLeft), 1);
        assert!(d.received(a, Message::MoveLeft));
        assert!(!d.received(b, Message::MoveLeft));
        assert!(d.inbox(b).is_empty());
    }

    #[test]
    fn one_tag_many_receivers_and_many_tags_one_receiver() {
        let mut d = MessageDispatcher::new();
        let a = d.register();
        let b = d.register();
        d.subscribe_all(&[Message::Reset, Message::Victory], a);
        d.subscribe(Message::Reset, b);

        assert_eq!(d.send(Message::Reset), 2);
        assert_eq!(d.send(Message::Victory), 1);
        let received: Vec<_> = d.inbox(a).iter().collect();
        assert_eq!(received, vec![Message::Reset, Message::Victory]);
        assert!(d.received(b, Message::Reset));
    }

    #[test]
    fn duplicate_subscription_delivers_once() {
        let mut d = MessageDispatcher::new();
        let a = d.register();
        d.subscribe(Message::Exit, a);
        d.subscribe(Message::Exit, a);
        assert_eq!(d.subscriber_count(Message::Exit), 1);
        assert_eq!(d.send(Message::Exit), 1);
        assert_eq!(d.inbox(a).count(Message::Exit), 1);
    }

    #[test]
    fn repeated_sends_are_counted() {
        let mut d = MessageDispatcher::new();
        let a = d.register();
        d.subscribe(Message::IngredientFell, a);
        d.send(Message::IngredientFell);
        d.send(Message::IngredientFell);
        assert_eq!(d.inbox(a).count(Message::IngredientFell), 2);
        assert_eq!(d.inbox(a).count(Message::IngredientHit), 0);
    }

    #[test]
    fn clear_inbox_bounds_visibility() {
        let mut d = MessageDispatcher::new();
        let a = d.register();
        d.subscribe(Message::PepperThrown, a);
        d.send(Message::PepperThrown);
        assert!(d.received(a, Message::PepperThrown));
        d.clear_inbox(a);
        assert!(!d.received(a, Message::PepperThrown));
    }

    #[test]
    fn send_without_subscribers_reaches_nobody() {
        let mut d = MessageDispatcher::new();
        assert_eq!(d.send(Message::GameOver), 0);
    }

    #[test]
    fn clear_drops_subscriptions() {
        let mut d = MessageDispatcher::new();
        let a = d.register();
        d.subscribe(Message::Exit, a);
        d.clear();
        assert_eq!(d.subscriber_count(Message::Exit), 0);
        assert_eq!(d.send(Message::Exit), 0);
    }

    #[test]
    #[should_panic(expected = "not registered")]
    fn stale_receiver_panics_after_clear() {
        let mut d = MessageDispatcher::new();
        let a = d.register();
        d.clear();
        d.register();
        d.subscribe(Message::Exit, a);
    }
}
