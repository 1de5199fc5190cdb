mod explain;
mod generate;
mod transform;

pub use explain::run_explain;
pub use generate::{run_generate, GenerateArgs};
pub use transform::run_transform;
