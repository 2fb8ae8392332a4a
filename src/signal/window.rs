//! Fixed-size rolling tick window

use crate::feed::{Parity, TickSample};
use rust_decimal::Decimal;
use std::collections::VecDeque;

/// Holds the most recent `capacity` ticks, evicting the oldest first
#[derive(Debug, Clone)]
pub struct TickWindow {
    capacity: usize,
    ticks: VecDeque<TickSample>,
}

impl TickWindow {
    /// Create an empty window
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ticks: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a tick, dropping the oldest when full
    pub fn push(&mut self, tick: TickSample) {
        if self.ticks.len() == self.capacity {
            self.ticks.pop_front();
        }
        self.ticks.push_back(tick);
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Most recent tick
    pub fn latest(&self) -> Option<&TickSample> {
        self.ticks.back()
    }

    /// Number of ticks with the given parity
    pub fn count(&self, parity: Parity) -> usize {
        self.ticks.iter().filter(|t| t.parity() == parity).count()
    }

    /// Share of even ticks; `None` while empty
    pub fn even_frequency(&self) -> Option<Decimal> {
        if self.ticks.is_empty() {
            return None;
        }
        Some(Decimal::from(self.count(Parity::Even)) / Decimal::from(self.ticks.len()))
    }

    /// Quotes oldest first
    pub fn quotes(&self) -> Vec<Decimal> {
        self.ticks.iter().map(|t| t.quote).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tick(digit: u8) -> TickSample {
        TickSample {
            symbol: "R_50".to_string(),
            quote: Decimal::from(100 + digit as i64),
            last_digit: digit,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_window_evicts_oldest() {
        let mut window = TickWindow::new(3);
        for d in [1, 2, 3, 4] {
            window.push(tick(d));
        }

        assert_eq!(window.len(), 3);
        assert_eq!(
            window.quotes(),
            vec![Decimal::from(102), Decimal::from(103), Decimal::from(104)]
        );
        assert_eq!(window.latest().unwrap().last_digit, 4);
    }

    #[test]
    fn test_window_counts_parity() {
        let mut window = TickWindow::new(5);
        for d in [1, 3, 5, 2, 4] {
            window.push(tick(d));
        }
        assert_eq!(window.count(Parity::Odd), 3);
        assert_eq!(window.count(Parity::Even), 2);
    }

    #[test]
    fn test_window_even_frequency() {
        let mut window = TickWindow::new(4);
        assert!(window.is_empty());
        assert_eq!(window.even_frequency(), None);

        for d in [2, 4, 6, 1] {
            window.push(tick(d));
        }
        assert_eq!(window.even_frequency(), Some(Decimal::new(75, 2)));

        // Evicting the 2 leaves 4, 6, 1, 3
        window.push(tick(3));
        assert_eq!(window.even_frequency(), Some(Decimal::new(5, 1)));
    }
}
