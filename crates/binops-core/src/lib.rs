pub mod app_config;
pub mod config;
pub mod credentials;
pub mod move_request;
pub mod shift;
pub mod user;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use credentials::{CredentialProvider, NoCredentials, StaticToken};
pub use move_request::{
    Destination, DisposalAction, InProgressAction, InsertPosition, MoveRequest, MoveStatus,
    MoveType,
};
pub use shift::{Shift, ShiftDetails, ShiftStatus, Waypoint};
pub use user::User;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
