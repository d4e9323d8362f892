pub mod camera;
pub mod sequencer;

pub use camera::{CameraTarget, camera_target};
pub use sequencer::{Collaborators, Phase, PlaybackTiming, Sequencer};
