pub mod features;
pub mod forms;
pub mod output;
pub mod render;
pub mod submit;
