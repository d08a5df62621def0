//! Writers for the files handed to mesh viewers and downstream scripts.

mod obj;
mod text;

pub use obj::{voxel_to_obj, write_obj, write_obj_to};
pub use text::{write_text, write_text_to};
