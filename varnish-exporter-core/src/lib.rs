pub mod cli;
pub mod conf;
pub mod decode;
pub mod ingest;
pub mod logging;
pub mod observe;
pub mod producer;
pub mod registry;
pub mod rewrite;
pub mod server;
