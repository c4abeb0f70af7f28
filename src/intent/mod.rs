mod model;
mod loader;
mod validator;

pub use model::{IntentModel, Inventory, InventoryNode, TelemetryDefaults, resolve_path, yaml_to_json};
pub use loader::IntentLoader;
pub use validator::{IntentValidator, IntentLintReport, IntentWarning};
