pub mod config;
pub mod error;
pub mod fetch;
pub mod history;
pub mod master;
pub mod normalize;
pub mod pipeline;
pub mod sink;
pub mod source;
pub mod table;
