// Copyright 2026 Tessera Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types for Tessera
//!
//! This module defines all error types used throughout the storage core.

use thiserror::Error;

/// Result type alias for Tessera operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Tessera storage operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // =========================================================================
    // Constraint errors
    // =========================================================================
    /// NOT NULL constraint violation. Insertion aborts and tuple counters
    /// are left untouched.
    #[error("not null constraint failed for column {column}")]
    NotNullConstraint { column: String },

    // =========================================================================
    // Schema / layout errors
    // =========================================================================
    /// Column not found in table schema
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    /// Row arity does not match the table schema
    #[error("row columns don't match, expected {expected}, got {got}")]
    RowColumnsNotMatch { expected: usize, got: usize },

    /// A column map that is not a bijection onto the tile positions
    #[error("invalid column map: {0}")]
    InvalidColumnMap(String),

    // =========================================================================
    // Argument errors
    // =========================================================================
    /// Out-of-range tile group offset or similar caller mistake
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Tile group not registered in the catalog
    #[error("tile group {0} not found in catalog")]
    TileGroupNotFound(u64),
}
