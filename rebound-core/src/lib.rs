pub mod conf;
pub mod ctx;
pub mod filter;
pub mod logging;
pub mod matcher;
pub mod mutation;
pub mod policy;
pub mod route;
