pub mod config;
pub mod table;
pub mod validation;

pub use config::{FactorConfig, FactorEntry};
pub use table::{Category, EmissionFactorTable, Factor, FactorSet, EF_GAS, EF_GRID};
pub use validation::{build_table, validate_factors};
