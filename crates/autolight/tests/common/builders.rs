//! Builder patterns for creating test data programmatically.

#![allow(dead_code)]

use rust_decimal::Decimal;

use autolight::model::{NewFixture, NewFixtureModel};

/// Builder for catalog models.
pub struct ModelBuilder {
    model: NewFixtureModel,
}

impl ModelBuilder {
    pub fn new(model_name: &str) -> Self {
        Self {
            model: NewFixtureModel {
                model_name: model_name.to_string(),
                manufacturer: "Philips".to_string(),
                fixture_type: "LED Panel".to_string(),
                wattage: 40.0,
                lumens: 4000,
                unit_price: Decimal::new(4599, 2),
                description: String::new(),
            },
        }
    }

    pub fn fixture_type(mut self, fixture_type: &str) -> Self {
        self.model.fixture_type = fixture_type.to_string();
        self
    }

    pub fn manufacturer(mut self, manufacturer: &str) -> Self {
        self.model.manufacturer = manufacturer.to_string();
        self
    }

    /// Price in cents.
    pub fn price_cents(mut self, cents: i64) -> Self {
        self.model.unit_price = Decimal::new(cents, 2);
        self
    }

    pub fn build(self) -> NewFixtureModel {
        self.model
    }
}

/// Builder for detected fixtures.
pub struct FixtureBuilder {
    fixture: NewFixture,
}

impl FixtureBuilder {
    pub fn new(symbol: &str) -> Self {
        Self {
            fixture: NewFixture {
                room_name: "Main Area".to_string(),
                detected_symbol: symbol.to_string(),
                selected_model_id: None,
                quantity: 1,
                lux_level: 300.0,
            },
        }
    }

    pub fn room(mut self, room: &str) -> Self {
        self.fixture.room_name = room.to_string();
        self
    }

    pub fn model(mut self, model_id: &str) -> Self {
        self.fixture.selected_model_id = Some(model_id.to_string());
        self
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.fixture.quantity = quantity;
        self
    }

    pub fn lux(mut self, lux: f64) -> Self {
        self.fixture.lux_level = lux;
        self
    }

    pub fn build(self) -> NewFixture {
        self.fixture
    }
}
