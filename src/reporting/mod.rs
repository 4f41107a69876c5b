// ABOUTME: Pure reporting computations over counts pulled from the requirements database
// ABOUTME: Houses the program health score used by the get_program_health tool
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Reporting
//!
//! Nothing in this module touches the database. Callers gather
//! [`HealthInputs`](crate::models::requirements::HealthInputs) and this
//! module turns them into scores.

/// Program health scoring
pub mod health;

pub use health::{HealthComponent, HealthGrade, ProgramHealth};
