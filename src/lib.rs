//! DreamRoom - room redesign assistant with natural language commands

pub mod command;
pub mod core;
pub mod designs;
pub mod llm;
pub mod room;
pub mod server;
