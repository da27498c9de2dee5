//! Options Builder: composes the agent SDK's per-query options record from
//! CLI-user settings plus per-query overrides.

pub mod builder;
pub mod error;
pub mod settings;
pub mod validator;

pub use builder::{OptionsBuilder, OptionsInput};
pub use error::{OptionsError, Result};
pub use settings::CliUserSettings;
