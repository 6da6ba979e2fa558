use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Per-object runtime values, index-aligned with [`Config::bars`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub bars: Vec<u32>,
}

impl Store {
    /// Initial store for a freshly configured object: every bar starts full.
    pub fn from_config(config: &Config) -> Self {
        Self {
            bars: config.bars.iter().map(|bar| bar.max).collect(),
        }
    }

    /// Current value of bar `index`, or `None` past the end.
    pub fn value(&self, index: usize) -> Option<u32> {
        self.bars.get(index).copied()
    }

    /// Align this store with `config`.
    ///
    /// Missing values are filled with the bar max, surplus values are
    /// dropped and values above max are clamped. Returns `true` if anything
    /// changed.
    pub fn reconcile(&mut self, config: &Config) -> bool {
        let mut changed = false;
        if self.bars.len() > config.bars.len() {
            self.bars.truncate(config.bars.len());
            changed = true;
        }
        for (i, bar) in config.bars.iter().enumerate() {
            match self.bars.get_mut(i) {
                Some(value) if *value > bar.max => {
                    *value = bar.max;
                    changed = true;
                }
                Some(_) => {}
                None => {
                    self.bars.push(bar.max);
                    changed = true;
                }
            }
        }
        changed
    }

    /// Returns `true` if every value is within `[0, max]` of its bar and
    /// the lengths match.
    pub fn is_consistent_with(&self, config: &Config) -> bool {
        self.bars.len() == config.bars.len()
            && self
                .bars
                .iter()
                .zip(&config.bars)
                .all(|(value, bar)| *value <= bar.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BarSpec;

    fn config_with(maxima: &[u32]) -> Config {
        let mut config = Config::default();
        for (i, max) in maxima.iter().enumerate() {
            let mut bar = BarSpec::new(format!("bar{i}"));
            bar.max = *max;
            config.bars.push(bar);
        }
        config
    }

    #[test]
    fn from_config_starts_full() {
        let store = Store::from_config(&config_with(&[10, 3, 0]));
        assert_eq!(store.bars, vec![10, 3, 0]);
    }

    #[test]
    fn reconcile_pads_with_max() {
        let config = config_with(&[10, 4]);
        let mut store = Store { bars: vec![2] };
        assert!(store.reconcile(&config));
        assert_eq!(store.bars, vec![2, 4]);
    }

    #[test]
    fn reconcile_drops_surplus_and_clamps() {
        let config = config_with(&[5]);
        let mut store = Store { bars: vec![9, 1, 1] };
        assert!(store.reconcile(&config));
        assert_eq!(store.bars, vec![5]);
        assert!(store.is_consistent_with(&config));
    }

    #[test]
    fn reconcile_noop_when_consistent() {
        let config = config_with(&[5, 5]);
        let mut store = Store { bars: vec![0, 5] };
        assert!(!store.reconcile(&config));
        assert_eq!(store.bars, vec![0, 5]);
    }

    #[test]
    fn wire_shape() {
        let store = Store { bars: vec![1, 2] };
        assert_eq!(serde_json::to_string(&store).unwrap(), r#"{"bars":[1,2]}"#);
    }
}
