pub mod profile;
pub mod tasks;

pub use profile::UserProfile;
pub use tasks::{draft_from_json, patch_from_json, TaskOut};
