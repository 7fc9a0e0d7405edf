pub mod export;
pub mod lottery;
pub mod settings;

pub use export::export_config;
pub use lottery::lottery_config;
pub use settings::settings_config;
