pub mod data_table;
pub mod search_input;
pub mod tours_page;

pub use data_table::{Column, DataTable};
pub use search_input::SearchInput;
pub use tours_page::ToursPage;
