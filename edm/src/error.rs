// SPDX-FileCopyrightText: Copyright (c) 2025 the odata-svc authors. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use odata_svc_metadata::Error as MetadataError;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// Projection error kinds.
#[derive(Debug)]
pub enum Error {
    /// A configuration error surfaced from the metadata model.
    Metadata(MetadataError),
    /// Full-container projection requested over an incremental model.
    ModelNotFinalized,
    /// A navigation property with no association to pair it.
    UnpairableNavigationProperty(String, String),
}

impl From<MetadataError> for Error {
    fn from(v: MetadataError) -> Self {
        Self::Metadata(v)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Metadata(err) => err.fmt(f),
            Self::ModelNotFinalized => {
                write!(f, "metadata model must be finalized before full projection")
            }
            Self::UnpairableNavigationProperty(t, p) => {
                write!(f, "no association pairs navigation property {t}.{p}")
            }
        }
    }
}

impl StdError for Error {}
