use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MealSlot {
    pub name: String,
    /// Hour of the day (0-23) from which this slot is the current one.
    #[serde(default)]
    pub start_hour: u8,
}

impl MealSlot {
    pub fn new(name: impl Into<String>, start_hour: u8) -> Self {
        Self {
            name: name.into(),
            start_hour,
        }
    }
}

/// A slot to look at next, relative to today.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpcomingSlot {
    pub slot: String,
    pub day_offset: i64,
}

impl UpcomingSlot {
    fn new(slot: &str, day_offset: i64) -> Self {
        Self {
            slot: slot.to_owned(),
            day_offset,
        }
    }
}

/// Ordered meal slots of a day.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(transparent)]
pub struct MealSlots(Vec<MealSlot>);

impl Default for MealSlots {
    fn default() -> Self {
        Self(vec![
            MealSlot::new("Breakfast", 0),
            MealSlot::new("Lunch", 11),
            MealSlot::new("Dinner", 16),
        ])
    }
}

impl MealSlots {
    pub fn new(slots: Vec<MealSlot>) -> Self {
        Self(slots)
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(|n| MealSlot::new(n, 0)).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &MealSlot> {
        self.0.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(|s| s.name.as_str())
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Slots still ahead today after `current`, then the first slot of tomorrow.
    ///
    /// A `current` slot that is not part of the list counts as sitting before the
    /// first slot, so every slot of today is returned.
    pub fn upcoming(&self, current: &str) -> Vec<UpcomingSlot> {
        let start = self.position(current).map(|i| i + 1).unwrap_or(0);

        let mut order = self.0[start.min(self.0.len())..]
            .iter()
            .map(|s| UpcomingSlot::new(&s.name, 0))
            .collect::<Vec<_>>();

        if let Some(first) = self.first() {
            order.push(UpcomingSlot::new(first, 1));
        }

        order
    }

    /// Slot whose start hour is the latest one not after `hour`.
    pub fn slot_for_hour(&self, hour: u8) -> Option<&str> {
        self.0
            .iter()
            .filter(|s| s.start_hour <= hour)
            .max_by_key(|s| s.start_hour)
            .or_else(|| self.0.first())
            .map(|s| s.name.as_str())
    }
}
