//! Required confirmation counts per purpose

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::purpose::Purpose;

/// Number of confirmations an action needs before it is dispatched
///
/// Purposes without an entry require zero confirmations, which the
/// initiator's own confirmation always satisfies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Thresholds {
    required: BTreeMap<Purpose, u64>,
}

impl Thresholds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the count for a purpose, returning the previous one
    pub fn set(&mut self, purpose: Purpose, count: u64) -> u64 {
        self.required.insert(purpose, count).unwrap_or(0)
    }

    pub fn get(&self, purpose: Purpose) -> u64 {
        self.required.get(&purpose).copied().unwrap_or(0)
    }

    /// Whether a number of confirmations satisfies a purpose
    pub fn is_met(&self, purpose: Purpose, confirmations: usize) -> bool {
        confirmations as u64 >= self.get(purpose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero() {
        let thresholds = Thresholds::new();
        assert_eq!(thresholds.get(Purpose::ACTION), 0);
        assert!(thresholds.is_met(Purpose::ACTION, 1));
    }

    #[test]
    fn test_set_and_meet() {
        let mut thresholds = Thresholds::new();
        assert_eq!(thresholds.set(Purpose::ACTION, 2), 0);
        assert_eq!(thresholds.set(Purpose::ACTION, 3), 2);

        assert!(!thresholds.is_met(Purpose::ACTION, 2));
        assert!(thresholds.is_met(Purpose::ACTION, 3));
        assert!(thresholds.is_met(Purpose::MANAGEMENT, 1));
    }
}
