/// Errors from [`Slot`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    #[error("slot already holds a value")]
    AlreadyFilled,
}

/// A write-once presence cell.
///
/// Starts empty and may be filled exactly once. Readers treat an empty slot
/// as "not loaded yet" and skip whatever depends on it. A filled slot is never
/// cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot<T> {
    value: Option<T>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self { value: None }
    }
}

impl<T> Slot<T> {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Store a value. Refused if the slot already holds one.
    pub fn fill(&mut self, value: T) -> Result<(), SlotError> {
        if self.value.is_some() {
            return Err(SlotError::AlreadyFilled);
        }
        self.value = Some(value);
        Ok(())
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_filled(&self) -> bool {
        self.value.is_some()
    }
}

impl<T: Copy> Slot<T> {
    /// Copy out the value, if present.
    pub fn copied(&self) -> Option<T> {
        self.value
    }
}
