pub mod batch;
pub mod page;
pub mod request;
pub mod response;
pub mod summary;
