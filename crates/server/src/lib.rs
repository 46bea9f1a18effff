pub mod api;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod export;
pub mod repository;
