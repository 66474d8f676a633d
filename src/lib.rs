pub mod actors;
pub mod address;
pub mod cli;
pub mod commands;
pub mod config;
pub mod crypto;
pub mod encoding;
pub mod engine;
pub mod error;
pub mod keyinfo;
pub mod message;
pub mod progress;
pub mod registry;
pub mod rpc;
pub mod signer;
pub mod token;
pub mod tx_builder;
