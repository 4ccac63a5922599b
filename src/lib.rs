pub mod api;
pub mod auth;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod models;
pub mod pages;
pub mod routes;
pub mod store;

