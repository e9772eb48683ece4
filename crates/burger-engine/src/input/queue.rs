use crate::api::types::Message;

/// Player intents waiting to be sent over the bus.
///
/// Movement is continuous: a held intent is reported every frame until it is
/// released. Meta commands are one-shot and reported by the next frame only.
pub struct InputQueue {
    held: Vec<Message>,
    pressed: Vec<Message>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            held: Vec::with_capacity(8),
            pressed: Vec::with_capacity(8),
        }
    }

    /// Start holding an intent. Holding it twice is the same as once.
    ///
    /// # Panics
    /// If `message` is not a player intent.
    pub fn hold(&mut self, message: Message) {
        assert_intent(message);
        if !self.held.contains(&message) {
            self.held.push(message);
        }
    }

    pub fn release(&mut self, message: Message) {
        self.held.retain(|&m| m != message);
    }

    /// Queue a one-shot intent for the next frame.
    ///
    /// # Panics
    /// If `message` is not a player intent.
    pub fn press(&mut self, message: Message) {
        assert_intent(message);
        self.pressed.push(message);
    }

    pub fn is_held(&self, message: Message) -> bool {
        self.held.contains(&message)
    }

    /// Intents for this frame: everything held plus everything pressed since
    /// the last call. Presses are consumed.
    pub fn frame_intents(&mut self) -> Vec<Message> {
        let mut intents = self.held.clone();
        intents.append(&mut self.pressed);
        intents
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty() && self.pressed.is_empty()
    }

    /// Release everything and drop pending presses.
    pub fn clear(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

fn assert_intent(message: Message) {
    assert!(message.is_intent(), "{message:?} is not a player intent");
}
