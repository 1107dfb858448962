pub mod use_paginated_fetch;
pub mod use_table_query;

pub use use_paginated_fetch::{use_paginated_fetch, FetchResult, PageSource};
pub use use_table_query::{use_table_query, TableQueryConfig, TableQueryState};
