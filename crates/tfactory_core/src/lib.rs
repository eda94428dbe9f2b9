//! Client core for Template Factory.
//! Routing, view state and the notes/auth capability live here; the
//! serverless handlers and the terminal front end build on top of it.

pub mod api;
pub mod config;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod routing;
pub mod service;
pub mod subscription;
pub mod view;

pub use api::{ApiClient, FetchError, HttpApiClient};
pub use config::{AppConfig, FunctionsEnv, GatewaySettings};
pub use gateway::{
    AuthChange, AuthEvent, Gateway, GatewayError, GatewayResult, NoteDeleteFilter, NoteInsert,
    NotesQuery, SortOrder, SupabaseGateway,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{Note, NoteDraft, NoteId};
pub use model::session::{Session, SessionUser};
pub use model::wire::{
    iso_timestamp, EnvPresence, HelloPayload, NotesEnvPayload, Platform, SecretPresence,
};
pub use routing::history::{History, MemoryHistory, PopState};
pub use routing::path_store::PathStore;
pub use routing::route_table::{Route, RouteTable};
pub use service::notes_backend::NotesBackend;
pub use subscription::{ListenerRegistry, Subscription};
pub use view::app::{App, AppContext, Transition};
pub use view::health::{HealthState, HealthTicket};
pub use view::page::{PagePanel, PageView};
