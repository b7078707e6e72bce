use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::graph::Dataset;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Period {
    pub key: String,
    pub label: String,
}

impl Period {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        let label = period_label(&key);
        Self { key, label }
    }
}

/// First four characters, `Q`, then the last character: `"2024-Q1"` becomes `"2024Q1"`.
pub fn period_label(key: &str) -> String {
    let head = key.chars().take(4).collect::<String>();
    let tail = key.chars().last().map(String::from).unwrap_or_default();
    format!("{head}Q{tail}")
}

/// Sorted selectable periods with a clamped navigation cursor.
#[derive(Clone, Debug, Default)]
pub struct PeriodIndex {
    periods: Vec<Period>,
    by_label: HashMap<String, usize>,
    current: usize,
}

impl PeriodIndex {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self::from_keys(dataset.nodes().iter().map(|node| node.quarter.as_str()))
    }

    pub fn from_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        let periods = keys
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(Period::new)
            .collect::<Vec<_>>();

        // colliding labels resolve to the later key
        let by_label = periods
            .iter()
            .enumerate()
            .map(|(index, period)| (period.label.clone(), index))
            .collect::<HashMap<_, _>>();

        Self {
            current: periods.len().saturating_sub(1),
            periods,
            by_label,
        }
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn labels(&self) -> Vec<&str> {
        self.periods.iter().map(|period| period.label.as_str()).collect()
    }

    pub fn get(&self, index: usize) -> Option<&Period> {
        self.periods.get(index)
    }

    pub fn current_index(&self) -> Option<usize> {
        (!self.periods.is_empty()).then_some(self.current)
    }

    pub fn current(&self) -> Option<&Period> {
        self.periods.get(self.current)
    }

    pub fn clamp(&self, index: usize) -> usize {
        index.min(self.periods.len().saturating_sub(1))
    }

    pub fn select(&mut self, index: usize) -> Option<&Period> {
        self.current = self.clamp(index);
        self.current()
    }

    pub fn step_forward(&mut self) -> Option<&Period> {
        self.select(self.current.saturating_add(1))
    }

    pub fn step_back(&mut self) -> Option<&Period> {
        self.select(self.current.saturating_sub(1))
    }

    pub fn key_for_label(&self, label: &str) -> Option<&str> {
        self.by_label
            .get(label)
            .map(|&index| self.periods[index].key.as_str())
    }

    /// Looks up a compact label first, then a raw key.
    pub fn position_of(&self, label_or_key: &str) -> Option<usize> {
        self.by_label.get(label_or_key).copied().or_else(|| {
            self.periods
                .iter()
                .position(|period| period.key == label_or_key)
        })
    }
}
