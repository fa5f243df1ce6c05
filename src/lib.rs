// src/lib.rs

//! Course catalog crawler library.
//!
//! Scrapes Layup List and the ORC timetable into JSON artifacts and serves
//! them over a small HTTP API.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod server;
pub mod services;
pub mod storage;
pub mod utils;
