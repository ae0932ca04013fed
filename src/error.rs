// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error("No user selected: pass --user or run `loanlens config set-user <NAME>`")]
    NoUserSelected,

    #[error("{kind} {id} not found")]
    RecordNotFound { kind: &'static str, id: i64 },

    #[error("Invalid loan {field}: {reason}")]
    InvalidLoan { field: &'static str, reason: String },

    #[error("Invalid loan status '{0}', expected Active or Closed")]
    InvalidStatus(String),

    #[error("{0} total is out of range")]
    Overflow(&'static str),
}
