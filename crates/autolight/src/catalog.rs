//! In-memory catalog snapshot and the built-in sample catalog.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::db::DatabaseError;
use crate::model::{FixtureModel, NewFixtureModel};
use crate::repository::CatalogRepository;

/// All catalog models, loaded once per session in catalog order.
///
/// The snapshot is read-only after load; lookups by id go through an index
/// so recommendation derivation stays linear in the catalog size.
#[derive(Debug, Clone, Default)]
pub struct CatalogCache {
    models: Vec<FixtureModel>,
    index: HashMap<String, usize>,
}

impl CatalogCache {
    pub fn new(models: Vec<FixtureModel>) -> Self {
        let index = models
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id.clone(), i))
            .collect();
        Self { models, index }
    }

    /// Reads every catalog model from the store.
    pub fn load<R: CatalogRepository + ?Sized>(repo: &R) -> Result<Self, DatabaseError> {
        let models = repo.list_models()?;
        log::debug!("Loaded {} catalog models", models.len());
        Ok(Self::new(models))
    }

    pub fn get(&self, id: &str) -> Option<&FixtureModel> {
        self.index.get(id).map(|&i| &self.models[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Models in catalog iteration order.
    pub fn iter(&self) -> impl Iterator<Item = &FixtureModel> {
        self.models.iter()
    }

    pub fn models(&self) -> &[FixtureModel] {
        &self.models
    }

    pub fn of_type<'a>(
        &'a self,
        fixture_type: &'a str,
    ) -> impl Iterator<Item = &'a FixtureModel> + 'a {
        self.models.iter().filter(move |m| m.fixture_type == fixture_type)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

fn sample(
    model_name: &str,
    manufacturer: &str,
    fixture_type: &str,
    wattage: f64,
    lumens: i64,
    cents: i64,
    description: &str,
) -> NewFixtureModel {
    NewFixtureModel {
        model_name: model_name.to_string(),
        manufacturer: manufacturer.to_string(),
        fixture_type: fixture_type.to_string(),
        wattage,
        lumens,
        unit_price: Decimal::new(cents, 2),
        description: description.to_string(),
    }
}

/// The built-in sample catalog.
pub fn sample_models() -> Vec<NewFixtureModel> {
    vec![
        sample("LP-600-40W", "Philips", "LED Panel", 40.0, 4000, 8999, "600x600 panel, 4000K"),
        sample("LP-1200-48W", "Osram", "LED Panel", 48.0, 5200, 9999, "300x1200 panel, 4000K"),
        sample("LP-600-32W", "GE Lighting", "LED Panel", 32.0, 3400, 6999, "Backlit panel, 4000K"),
        sample("DL-12W-CCT", "Osram", "Downlight", 12.0, 1200, 3499, "Colour-tunable, 60° beam"),
        sample("DL-8W-DIM", "GE Lighting", "Downlight", 8.0, 800, 2499, "Dimmable, 2700K"),
        sample("DL-18W-IP44", "Philips", "Downlight", 18.0, 1900, 4299, "Bathroom-rated, 3000K"),
        sample("TL-20W-ADJ", "GE Lighting", "Track Light", 20.0, 2000, 5499, "Adjustable spot"),
        sample("TL-30W-ZOOM", "Cree", "Track Light", 30.0, 3100, 7499, "Zoom spot, 15-50°"),
        sample("LL-1200-40W", "Philips", "Linear LED", 40.0, 4800, 7999, "1200mm, 4000K"),
        sample("LS-600-14W", "Osram", "Linear LED", 14.0, 1400, 2999, "600mm strip, 3000K"),
        sample("HB-150W-IP65", "Cree", "High Bay", 150.0, 18000, 18999, "Warehouse, 5000K"),
        sample("HB-100W-IP65", "Philips", "High Bay", 100.0, 13000, 14999, "Compact, 5000K"),
        sample("BH-18W-IP54", "Philips", "Bulkhead", 18.0, 1800, 4499, "Corridor, 4000K"),
        sample("FL-50W-IP66", "Cree", "Floodlight", 50.0, 6000, 6999, "Exterior, 90° beam"),
    ]
}

/// Inserts the sample catalog when the catalog is empty. Returns the number
/// of models inserted.
pub fn seed_sample_catalog<R>(repo: &R) -> Result<usize, DatabaseError>
where
    R: CatalogRepository + ?Sized,
{
    if repo.count_models()? > 0 {
        log::debug!("Catalog already populated, skipping sample data");
        return Ok(0);
    }

    let models = sample_models();
    for model in &models {
        repo.insert_model(model)?;
    }
    log::info!("Seeded {} sample catalog models", models.len());
    Ok(models.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{insert_model, test_db};

    #[test]
    fn test_load_preserves_catalog_order() {
        let db = test_db();
        let a = insert_model(&db, "B-first", "Downlight", 1000);
        let b = insert_model(&db, "A-second", "Downlight", 2000);

        let cache = CatalogCache::load(&db).unwrap();
        let ids: Vec<&str> = cache.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec![a.id.as_str(), b.id.as_str()]);
        assert_eq!(cache.get(&b.id).unwrap().model_name, "A-second");
        assert!(cache.get("missing").is_none());
    }

    #[test]
    fn test_of_type_filters() {
        let db = test_db();
        insert_model(&db, "DL-1", "Downlight", 1000);
        insert_model(&db, "LP-1", "LED Panel", 2000);
        insert_model(&db, "DL-2", "Downlight", 3000);

        let cache = CatalogCache::load(&db).unwrap();
        let names: Vec<&str> = cache.of_type("Downlight").map(|m| m.model_name.as_str()).collect();
        assert_eq!(names, vec!["DL-1", "DL-2"]);
    }

    #[test]
    fn test_seed_only_when_empty() {
        let db = test_db();
        let inserted = seed_sample_catalog(&db).unwrap();
        assert_eq!(inserted, sample_models().len());

        assert_eq!(seed_sample_catalog(&db).unwrap(), 0);
        let cache = CatalogCache::load(&db).unwrap();
        assert_eq!(cache.len(), sample_models().len());
    }

    #[test]
    fn test_sample_models_are_valid() {
        for model in sample_models() {
            assert!(model.wattage > 0.0, "{}", model.model_name);
            assert!(model.lumens > 0, "{}", model.model_name);
            assert!(model.unit_price >= Decimal::ZERO, "{}", model.model_name);
        }
    }
}
