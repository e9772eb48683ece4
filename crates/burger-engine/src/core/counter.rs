/// Bounded counter for score, lives and pepper.
/// Every operation saturates at `min`/`max` instead of overflowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    value: u32,
    initial: u32,
    min: u32,
    max: u32,
}

impl Counter {
    pub fn new(initial: u32, min: u32, max: u32) -> Self {
        let max = max.max(min);
        let initial = initial.clamp(min, max);
        Self { value: initial, initial, min, max }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn increment_by(&mut self, amount: u32) {
        self.value = self.value.saturating_add(amount).min(self.max);
    }

    pub fn decrement(&mut self) {
        self.value = self.value.saturating_sub(1).max(self.min);
    }

    pub fn is_at_min(&self) -> bool {
        self.value == self.min
    }

    pub fn reset(&mut self) {
        self.value = self.initial;
    }
}
