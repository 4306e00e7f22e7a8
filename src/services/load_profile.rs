use crate::errors::DesignError;
use crate::models::design::LoadItem;

/// Appliances that must stay powered during an outage.
///
/// Aggregates are recomputed on every call. Peak power assumes every load is
/// on at the same time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CriticalLoadProfile {
    items: Vec<LoadItem>,
}

impl CriticalLoadProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(&mut self, name: &str, watts: f64, quantity: u32, hours_per_day: f64) -> Result<&LoadItem, DesignError> {
        let item = LoadItem::new(name, watts, quantity, hours_per_day)?;
        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }

    /// Removes the first item called `name`.
    pub fn remove_item(&mut self, name: &str) -> Option<LoadItem> {
        let idx = self.items.iter().position(|i| i.name == name)?;
        Some(self.items.remove(idx))
    }

    pub fn items(&self) -> &[LoadItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Wh/day
    pub fn total_daily_energy_wh(&self) -> f64 {
        self.items.iter().map(LoadItem::daily_energy_wh).sum()
    }

    /// W
    pub fn peak_power_w(&self) -> f64 {
        self.items.iter().map(LoadItem::connected_power_w).sum()
    }
}

impl TryFrom<Vec<LoadItem>> for CriticalLoadProfile {
    type Error = DesignError;

    /// Re-validates items that arrived through deserialization.
    fn try_from(items: Vec<LoadItem>) -> Result<Self, Self::Error> {
        let mut profile = CriticalLoadProfile::new();
        for i in items {
            profile.add_item(&i.name, i.watts, i.quantity, i.hours_per_day)?;
        }
        Ok(profile)
    }
}
