// ABOUTME: Domain models shared by the databases, tools and exports
// ABOUTME: Split by toolkit: access (configurations database) and requirements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! - [`access`]: users, access grants, reviews, training, the
//!   program → clinic → location hierarchy and configuration inheritance
//! - [`requirements`]: clients, programs, requirements, user stories and
//!   UAT test cases

/// Configurations toolkit models
pub mod access;
/// Requirements toolkit models
pub mod requirements;
