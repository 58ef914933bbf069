//! The clinic assistant behind `POST /chat`.

pub mod assistant;
pub mod booking;
pub mod model;
pub mod routes;
mod schema;
pub mod sessions;
pub mod store;
pub mod types;

pub use assistant::Assistant;
pub use model::{LanguageModel, OpenAiModel};
pub use store::AppointmentStore;
