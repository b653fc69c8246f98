pub mod settings;

pub use settings::FormSettingsRecord;
