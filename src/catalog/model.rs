use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::schedule::{
    hours::{parse_operating_hours, OperatingHours},
    slots::{resolve_slots, TimeSlot},
};

/// A bookable venue from the catalog. Read-only for the process lifetime.
#[derive(Debug, Clone, Deserialize)]
pub struct Space {
    pub id: u32,
    pub name: String,
    pub location: String,
    pub price: f64,
    pub description: String,
    pub amenities: Vec<String>,
    /// Legacy free-text hours string, e.g. "9:00 AM - 9:00 PM" or "24/7".
    pub hours: String,
    /// Legacy quick-select labels, resolved into `slots` at load time.
    pub time_slots: Vec<String>,
    #[serde(skip)]
    pub operating_hours: OperatingHours,
    #[serde(skip)]
    pub slots: Vec<TimeSlot>,
}

pub struct Catalog {
    spaces: Vec<Space>,
}

const BUNDLED_CATALOG: &str = include_str!("../../data/spaces.json");

impl Catalog {
    /// Load the catalog from `path`, or the bundled document when no
    /// override is configured. The free-text hours and slot labels are
    /// normalized here, at the boundary, so the rest of the app only sees
    /// structured windows.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let raw = match path {
            Some(p) => std::fs::read_to_string(p)
                .with_context(|| format!("read catalog from {}", p.display()))?,
            None => BUNDLED_CATALOG.to_string(),
        };
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let mut spaces: Vec<Space> = serde_json::from_str(raw).context("parse catalog json")?;
        for space in &mut spaces {
            space.operating_hours = parse_operating_hours(&space.hours);
            space.slots = resolve_slots(&space.time_slots, &space.operating_hours);
        }
        Ok(Self { spaces })
    }

    pub fn get(&self, id: u32) -> Option<&Space> {
        self.spaces.iter().find(|s| s.id == id)
    }

    /// Case-insensitive substring match on name or location. An empty
    /// query returns the whole catalog.
    pub fn search(&self, query: &str) -> Vec<&Space> {
        let needle = query.trim().to_lowercase();
        self.spaces
            .iter()
            .filter(|s| {
                needle.is_empty()
                    || s.name.to_lowercase().contains(&needle)
                    || s.location.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.spaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }
}
