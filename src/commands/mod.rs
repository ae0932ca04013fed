// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod analysis;
pub mod budgets;
pub mod config;
pub mod entries;
pub mod importer;
pub mod loans;
pub mod users;
