pub mod loader;
pub mod schema;

pub use loader::{
    default_settings_path, load_settings, load_settings_from_str, load_settings_or_default,
    save_settings, validate_settings,
};
pub use schema::{LogFormat, Settings, Theme, SETTINGS_VERSION};
