//! Ordered bounded ranking map.
//!
//! Maps a numeric score to the values recorded under it, retaining only the
//! best key under a configured ordering. Used descending to rank split
//! candidates by score and ascending to rank exemplar-group distances.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

/// Error returned when a [`RankedMap`] is queried while empty.
#[derive(Debug, thiserror::Error)]
#[error("ranking map is empty")]
pub struct EmptyMapError;

/// Direction of the ranking: which end of the key range is "best".
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Order {
    /// Smallest key wins (distances).
    Ascending,
    /// Largest key wins (scores).
    Descending,
}

/// Policy for values arriving under a key equal to the current best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TieRule {
    /// Keep every value recorded under the best key (soft limit): enables a
    /// uniform random tie break over all equally-best values.
    KeepAll,
    /// Keep only the first value recorded under the best key; incoming
    /// values that tie it are dropped (hard limit, discard newest).
    DiscardNewest,
}

/// Ordered bounded ranking map: retains the best key and the value(s)
/// recorded under it, per the configured [`Order`] and [`TieRule`].
#[derive(Debug)]
pub struct RankedMap<V> {
    order: Order,
    ties: TieRule,
    entries: BTreeMap<OrderedFloat<f64>, Vec<V>>,
}

impl<V> RankedMap<V> {
    /// Create a map where the smallest key is best.
    #[must_use]
    pub fn ascending(ties: TieRule) -> Self {
        Self {
            order: Order::Ascending,
            ties,
            entries: BTreeMap::new(),
        }
    }

    /// Create a map where the largest key is best.
    #[must_use]
    pub fn descending(ties: TieRule) -> Self {
        Self {
            order: Order::Descending,
            ties,
            entries: BTreeMap::new(),
        }
    }

    /// Return the configured ordering.
    #[must_use]
    pub fn order(&self) -> Order {
        self.order
    }

    /// Return the configured tie rule.
    #[must_use]
    pub fn tie_rule(&self) -> TieRule {
        self.ties
    }

    /// Record `value` under `key`.
    ///
    /// A strictly better key evicts everything previously retained. A key
    /// equal to the current best appends or is dropped per the [`TieRule`].
    /// A worse key is a no-op.
    pub fn put(&mut self, key: f64, value: V) {
        let key = OrderedFloat(key);
        let Some(best) = self.best_key_internal() else {
            self.entries.insert(key, vec![value]);
            return;
        };
        if self.beats(key, best) {
            self.entries.clear();
            self.entries.insert(key, vec![value]);
        } else if key == best {
            match self.ties {
                TieRule::KeepAll => {
                    self.entries
                        .get_mut(&key)
                        .expect("best key is present in the map")
                        .push(value);
                }
                TieRule::DiscardNewest => {}
            }
        }
    }

    /// Return the best key under the map's ordering.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyMapError`] if nothing has been recorded.
    pub fn first_key(&self) -> Result<f64, EmptyMapError> {
        self.best_key_internal()
            .map(OrderedFloat::into_inner)
            .ok_or(EmptyMapError)
    }

    /// Return the values recorded under the best key (empty if the map is
    /// empty).
    #[must_use]
    pub fn best_values(&self) -> &[V] {
        match self.best_entry() {
            Some((_, values)) => values,
            None => &[],
        }
    }

    /// Consume the map and return the values recorded under the best key.
    #[must_use]
    pub fn into_best_values(mut self) -> Vec<V> {
        let best = self.best_key_internal();
        match best {
            Some(key) => self.entries.remove(&key).unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// Return the number of retained values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Return true if nothing is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn beats(&self, candidate: OrderedFloat<f64>, best: OrderedFloat<f64>) -> bool {
        match self.order {
            Order::Ascending => candidate < best,
            Order::Descending => candidate > best,
        }
    }

    fn best_key_internal(&self) -> Option<OrderedFloat<f64>> {
        self.best_entry().map(|(key, _)| *key)
    }

    fn best_entry(&self) -> Option<(&OrderedFloat<f64>, &Vec<V>)> {
        match self.order {
            Order::Ascending => self.entries.first_key_value(),
            Order::Descending => self.entries.last_key_value(),
        }
    }
}
