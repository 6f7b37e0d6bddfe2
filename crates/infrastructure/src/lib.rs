pub mod engine;
pub mod grpc;
