pub mod dedup;
pub mod validation;
