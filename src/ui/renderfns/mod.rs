pub mod footer;
pub mod header;
pub mod utils;

pub use footer::{draw_footer, StatusLine};
pub use header::draw_header;
pub use utils::{approval_color, format_amount, format_date, truncate};
