pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{dim, error, header, muted, notice, status, success, summary_line, warn};
pub use table::{course_table, TableBuilder};
pub use theme::{theme, Theme};
