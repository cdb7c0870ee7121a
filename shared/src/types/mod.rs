pub mod client_config;
pub mod json_error;
pub mod jwt;
pub mod login;
pub mod password;
pub mod register;
pub mod role;
pub mod session;

pub use self::client_config::{
    ApiConfig, AuthConfig, ClientConfig, ConfigError, LoggingConfig, StorageConfig,
};
pub use self::json_error::ErrorResponse;
pub use self::jwt::TokenClaims;
pub use self::login::{AuthResponse, LoginData, MessageResponse};
pub use self::password::{ForgotPasswordData, ResetPasswordData};
pub use self::register::{RegistrationData, VerifyOtpData};
pub use self::role::{Role, UnknownRole};
pub use self::session::{Session, User};
