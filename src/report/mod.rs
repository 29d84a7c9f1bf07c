pub mod group;
pub mod highlight;
pub mod status;
pub mod suite;
