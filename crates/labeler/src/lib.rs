/*
 * Namespace Labeler - Kubernetes Namespace Label Controller
 * Copyright (C) 2025 Dana
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published
 * by the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */

#![allow(clippy::missing_errors_doc, clippy::doc_markdown)]

//! Namespace labeler core library
//!
//! This crate provides the controller that projects `NamespaceLabel` custom
//! resources onto the labels of their owning Namespace, keeping
//! platform-reserved label keys out of reach of user declarations.

pub mod crds;
pub mod labels;

// Re-export commonly used types
pub use crds::{NamespaceLabel, NamespaceLabelSpec};
pub use labels::config::ControllerConfig;
pub use labels::types::{Error, Result};
