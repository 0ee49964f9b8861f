// Copyright 2026 Permitscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Permitscope library: fetch and filter municipal building-permit
//! records from ArcGIS open-data feature services.
//!
//! The pipeline is two stateless passes: a [`fetch::PermitService`]
//! retrieves every record issued inside a date window, and
//! [`filter::apply`] narrows the batch by permit type, activity, and
//! free text. [`session::Session`] is the explicit state object a
//! front end threads through both.

pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod record;
pub mod session;
