pub mod catalog;
pub mod config;
pub mod favorites;
pub mod gateway;
pub mod platform;
pub mod protocol;
pub mod session;
pub mod store;
pub mod track;

pub use config::Config;
pub use gateway::{GatewayError, TrackGateway, TrackSource};
pub use protocol::{PlaybackStatus, PlayerCommand, PlayerState, SkipDirection};
pub use track::{StreamDescriptor, Track, TrackId};
