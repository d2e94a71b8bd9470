//! Advanced device query: client-side filter plus field selection.

use rmm::filter::select_fields;
use rmm::FilterSet;
use serde_json::Value;

/// Filter and projection applied to an already-fetched device list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceQuery {
    pub filters: FilterSet,
    /// Selected field paths; empty keeps whole records
    pub fields: Vec<String>,
}

impl DeviceQuery {
    pub fn new(filters: FilterSet, fields: Vec<String>) -> Self {
        Self { filters, fields }
    }

    /// Parses a comma-separated field list (`hostname, deviceType.category`).
    pub fn parse_fields(list: &str) -> Vec<String> {
        list.split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Filters `records`, then projects each survivor onto the selected fields.
    pub fn run(&self, records: Vec<Value>) -> Vec<Value> {
        let matched = self.filters.apply(records);
        if self.fields.is_empty() {
            return matched;
        }
        matched
            .iter()
            .map(|record| select_fields(record, &self.fields))
            .collect()
    }
}
