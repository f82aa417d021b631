// Keystroke filtering for the funding amount field.

// Internal helper that keeps digits and the first decimal point only.
pub fn sanitize_amount(raw: &str) -> String {
    let mut seen_point = false;
    raw.chars()
        .filter(|c| match c {
            '0'..='9' => true,
            '.' if !seen_point => {
                seen_point = true;
                true
            }
            _ => false,
        })
        .collect()
}

/// Funding amount as typed by the user. Holds only digits and at most one
/// decimal point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmountField {
    value: String,
}

impl AmountField {
    pub fn value(&self) -> &str {
        &self.value
    }

    /// One keystroke. Rejected characters leave the value untouched.
    pub fn key(&mut self, c: char) {
        let accepted = c.is_ascii_digit() || (c == '.' && !self.value.contains('.'));
        if accepted {
            self.value.push(c);
        }
    }

    pub fn type_str(&mut self, keys: &str) {
        keys.chars().for_each(|c| self.key(c));
    }

    pub fn backspace(&mut self) {
        self.value.pop();
    }

    /// Replaces the whole value (paste). Text with nothing usable in it is
    /// ignored; an empty string clears.
    pub fn set(&mut self, raw: &str) {
        let sanitized = sanitize_amount(raw);
        if sanitized.is_empty() && !raw.is_empty() {
            tracing::debug!("Ignoring amount input without digits: {:?}", raw);
            return;
        }
        self.value = sanitized;
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }
}
