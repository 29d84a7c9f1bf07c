pub mod model;
pub mod version;
