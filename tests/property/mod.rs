// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! Every law publishes a generated sequence through real channels and
//! compares what a consumer records with the same computation done on a
//! `Vec`.

mod stream_laws;
mod window_spec;
