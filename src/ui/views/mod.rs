mod transaction_list;

pub use transaction_list::{Row, TransactionListView};
