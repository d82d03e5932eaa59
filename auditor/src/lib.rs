pub mod activity;
pub mod authority;
pub mod classifier;
pub mod graph;
pub mod rpc;
pub mod scanner;
pub mod scorer;
pub mod telemetry;

// Re-export the shared model alongside the pipeline entry point
pub use audit_common::prelude::*;
pub use rpc::ProgramRpc;
pub use scanner::ProgramScanner;
