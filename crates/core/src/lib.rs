//! Domain vocabulary shared by the data-access and HTTP layers.

pub mod types;
pub mod validation;
