/// Slide number being typed on the keyboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DigitEntry {
    value: Option<u32>,
}

/// Result of removing a digit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DigitRemoval {
    /// Not typing a number.
    Inactive,
    /// Only one digit was left; the entry should be dismissed.
    Emptied,
    Remaining(u32),
}

impl DigitEntry {
    pub const MAX_DIGITS: u32 = 4;

    pub fn is_active(&self) -> bool {
        self.value.is_some()
    }

    pub fn value(&self) -> Option<u32> {
        self.value
    }

    /// Append a digit, starting a new entry if needed. Returns the displayed value, or `None`
    /// when the entry is already full.
    pub fn push(&mut self, digit: u8) -> Option<u32> {
        let current = self.value.get_or_insert(0);
        if *current >= 10u32.pow(Self::MAX_DIGITS - 1) {
            return None;
        }
        *current = *current * 10 + u32::from(digit.min(9));
        Some(*current)
    }

    pub fn remove_last(&mut self) -> DigitRemoval {
        match self.value {
            None => DigitRemoval::Inactive,
            Some(v) if v < 10 => DigitRemoval::Emptied,
            Some(v) => {
                let rest = v / 10;
                self.value = Some(rest);
                DigitRemoval::Remaining(rest)
            }
        }
    }

    /// Finish the entry, clamped to a valid slide number.
    pub fn confirm(&mut self, slide_count: usize) -> Option<usize> {
        let v = self.value.take()?;
        let max = slide_count.max(1);
        Some((v as usize).clamp(1, max))
    }

    pub fn reset(&mut self) {
        self.value = None;
    }
}

/// Visibility of the heads-up widgets the session drives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HudState {
    pub digits: DigitEntry,
    pub entry_visible: bool,
    pub slide_number_visible: bool,
    pub help_visible: bool,
}

#[cfg(test)]
#[path = "../../tests/unit/show/hud.rs"]
mod tests;
