//! Navigation and guided playback over map annotations.
//!
//! - [`geo`]: spherical distance and destination point
//! - [`element`]: circles, line segments, points, polygons and their reveal order
//! - [`project`]: element collections loaded from a project file
//! - [`navigation`]: stepping a cursor along circles and line segments
//! - [`animation`]: camera targets and the playback sequencer
//! - [`scheduler`]: deferred callbacks used by playback
//! - [`collaborators`]: what playback needs from the host application

pub mod animation;
pub mod collaborators;
pub mod element;
pub mod geo;
pub mod macros;
pub mod navigation;
pub mod project;
pub mod scheduler;

/// Unix socket the playback daemon listens on unless configured otherwise.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/tourd.sock";
