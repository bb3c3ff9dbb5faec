pub mod categories;
pub mod paging;
pub mod products;
