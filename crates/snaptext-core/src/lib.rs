pub mod controller;
pub mod device;
pub mod error;
pub mod events;
pub mod health;
pub mod markup;
pub mod progress;
pub mod selection;
pub mod session;

#[cfg(test)]
mod tests;

pub use controller::{CaptureController, Devices};
pub use device::{CameraDevice, CaptureHandle, CaptureStream, ClipboardWriter};
pub use error::{CameraError, ClipboardError, ControllerError, SelectionError};
pub use events::{Completion, ControllerEvent, Ticket};
pub use session::Session;
