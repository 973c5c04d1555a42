pub mod collector;
pub mod error;
pub mod ids;
pub mod keys;
pub mod matcher;
pub mod merger;
pub mod model;
pub mod pipeline;
pub mod writer;
