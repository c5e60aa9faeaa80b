// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

#![no_std]

pub mod gpio;
pub mod spi;
pub mod time;
pub mod uart;
