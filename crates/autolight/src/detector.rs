//! Fixture detection seam.
//!
//! No geometry is parsed: [`RandomizedDetector`] fabricates rooms, catalog
//! picks, quantities and lux levels from its random source.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::catalog::CatalogCache;
use crate::model::{NewFixture, SourceFileType};

const ROOM_NAMES: [&str; 8] = [
    "Main Area",
    "Lobby",
    "Open Office",
    "Conference Room",
    "Corridor",
    "Kitchen",
    "Storage",
    "Restroom",
];

/// What the detector knows about an upload.
#[derive(Debug, Clone, Copy)]
pub struct DetectionInput<'a> {
    pub file_name: &'a str,
    pub file_type: SourceFileType,
    pub size: u64,
}

pub trait FixtureDetector {
    /// Produces fixtures in detection order. Selected models, when present,
    /// come from `catalog`.
    fn detect(&mut self, input: &DetectionInput<'_>, catalog: &CatalogCache) -> Vec<NewFixture>;
}

pub struct RandomizedDetector<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomizedDetector<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomizedDetector<StdRng> {
    /// Reproducible detector for tests and demos.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> FixtureDetector for RandomizedDetector<R> {
    fn detect(&mut self, input: &DetectionInput<'_>, catalog: &CatalogCache) -> Vec<NewFixture> {
        let room_count = self.rng.gen_range(1..=4);
        let mut rooms: Vec<&str> = ROOM_NAMES[1..]
            .choose_multiple(&mut self.rng, room_count - 1)
            .copied()
            .collect();
        rooms.insert(0, ROOM_NAMES[0]);

        let mut fixtures = Vec::new();
        let mut symbol = 1;
        for room in rooms {
            for _ in 0..self.rng.gen_range(1..=3) {
                let model = catalog.models().choose(&mut self.rng);
                fixtures.push(NewFixture {
                    room_name: room.to_string(),
                    detected_symbol: format!("LT-{:02}", symbol),
                    selected_model_id: model.map(|m| m.id.clone()),
                    quantity: self.rng.gen_range(1..=12),
                    lux_level: f64::from(self.rng.gen_range(20u32..=60) * 10),
                });
                symbol += 1;
            }
        }

        log::debug!(
            "Detected {} fixture lines in {} ({}, {} bytes)",
            fixtures.len(),
            input.file_name,
            input.file_type.as_str(),
            input.size
        );
        fixtures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FixtureModel;
    use rust_decimal::Decimal;

    fn catalog() -> CatalogCache {
        CatalogCache::new(
            ["a", "b", "c"]
                .iter()
                .map(|id| FixtureModel {
                    id: id.to_string(),
                    model_name: format!("Model {}", id),
                    manufacturer: "Osram".to_string(),
                    fixture_type: "Downlight".to_string(),
                    wattage: 12.0,
                    lumens: 1200,
                    unit_price: Decimal::new(3499, 2),
                    description: String::new(),
                    created_at: "2026-01-01T00:00:00Z".to_string(),
                })
                .collect(),
        )
    }

    fn input() -> DetectionInput<'static> {
        DetectionInput {
            file_name: "office.dxf",
            file_type: SourceFileType::Dxf,
            size: 1024,
        }
    }

    #[test]
    fn test_seeded_detection_is_reproducible() {
        let first = RandomizedDetector::seeded(7).detect(&input(), &catalog());
        let second = RandomizedDetector::seeded(7).detect(&input(), &catalog());
        assert_eq!(first, second);
    }

    #[test]
    fn test_detected_values_in_range() {
        let catalog = catalog();
        for seed in 0..20 {
            let fixtures = RandomizedDetector::seeded(seed).detect(&input(), &catalog);
            assert!(!fixtures.is_empty());
            assert_eq!(fixtures[0].room_name, "Main Area");
            for f in &fixtures {
                assert!((1..=12).contains(&f.quantity));
                assert!((200.0..=600.0).contains(&f.lux_level));
                let id = f.selected_model_id.as_deref().unwrap();
                assert!(catalog.contains(id));
            }
        }
    }

    #[test]
    fn test_empty_catalog_yields_unselected_fixtures() {
        let fixtures = RandomizedDetector::seeded(1).detect(&input(), &CatalogCache::default());
        assert!(!fixtures.is_empty());
        assert!(fixtures.iter().all(|f| f.selected_model_id.is_none()));
    }
}
