pub mod health_service;
pub mod message_builder;
pub mod processor;
pub mod queue;
pub mod stores;
