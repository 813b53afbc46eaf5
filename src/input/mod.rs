pub mod prompt;
pub mod quantity;
pub mod sheet;

pub use prompt::prompt_sheet;
pub use quantity::{coerce_quantity, CoercionReason, Quantities, RawQuantity};
pub use sheet::{load_sheet, parse_assignment, CoercionNote, QuantitySheet, RawSheet};
