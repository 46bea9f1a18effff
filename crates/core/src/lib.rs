//! Domain model of the feedback service. Nothing in here touches storage.

pub mod domain;
