pub mod formatter;

pub use formatter::{
    format_compact, format_contributions, format_factor_table, format_footprint, format_impact,
    format_records_table, format_summary, format_tsv, should_use_colors, NO_RECORDS,
};
