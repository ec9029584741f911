pub mod camera;
pub mod clipboard;
pub mod file;

pub use camera::FileCamera;
pub use clipboard::ArboardClipboard;
pub use file::load_candidate;
