//! Test helpers para confvault-server.

#![allow(dead_code, unused_imports)]

pub mod client;

pub use client::{BASE, TestClient, TestResponse, client, client_with_store};
