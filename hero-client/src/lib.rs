pub mod admin;
pub mod auth;
pub mod authority;
pub mod config;
pub mod gateway;
pub mod home;
pub mod in_flight;
pub mod parent;
pub mod quiz_flow;

pub use admin::{AdminConsole, AdminOverview, ImportOutcome};
pub use auth::AuthService;
pub use authority::RemoteAuthority;
pub use config::{ClientConfig, ConfigError};
pub use gateway::{ActionGateway, HttpGateway};
pub use home::{HomeSnapshot, StudentHome};
pub use in_flight::{InFlight, MutationKind};
pub use parent::{CoachingService, ParentView};
pub use quiz_flow::{QuizCompletion, QuizTurn};
