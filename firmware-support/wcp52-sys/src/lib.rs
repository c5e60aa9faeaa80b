// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

#![no_std]

pub mod command;
pub mod config;
pub mod console;
pub mod log;
pub mod synth;
