//! Backend access for the browser build

pub mod client;

pub use client::HttpApi;
