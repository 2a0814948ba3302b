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

//! Container manifest.
//!
//! Hosts that want to configure the provider without code can ship a
//! TOML manifest naming the entity container and per-set key-order
//! overrides. The model works fully without one.

use crate::error::Error as MetadataError;
use crate::ident::Namespace;
use crate::ident::SimpleIdentifier;
use crate::provider::MetadataModel;
use serde::Deserialize;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::fs::File;
use std::io::Error as IoError;
use std::io::Read as _;
use std::path::PathBuf;
use toml::de::Error as TomlError;

/// Manifest that configures the metadata model's container.
#[derive(Deserialize, Debug)]
pub struct ContainerManifest {
    pub container: ContainerConfig,
    #[serde(default)]
    pub sets: Vec<SetConfig>,
}

/// The default entity container.
#[derive(Deserialize, Debug)]
pub struct ContainerConfig {
    pub name: SimpleIdentifier,
    pub namespace: Namespace,
    /// Default key ordering for sets that do not override it.
    #[serde(default)]
    pub use_metadata_key_order: bool,
}

/// Per-set overrides.
#[derive(Deserialize, Debug)]
pub struct SetConfig {
    pub name: SimpleIdentifier,
    pub use_metadata_key_order: bool,
}

impl ContainerManifest {
    /// Read a manifest from a TOML file.
    ///
    /// # Errors
    ///
    /// - `Error::Io` if the file cannot be read
    /// - `Error::Toml` if the content is not a valid manifest
    pub fn read(fname: &PathBuf) -> Result<Self, Error> {
        let mut file = File::open(fname).map_err(Error::Io)?;
        let mut content = String::new();
        file.read_to_string(&mut content).map_err(Error::Io)?;
        Self::parse(&content)
    }

    /// Parse a manifest from TOML text.
    ///
    /// # Errors
    ///
    /// `Error::Toml` on malformed content.
    pub fn parse(content: &str) -> Result<Self, Error> {
        toml::from_str(content).map_err(Error::Toml)
    }

    /// Key-order override for a set, when the manifest names it.
    #[must_use]
    pub fn key_order_for(&self, set_name: &str) -> Option<bool> {
        self.sets
            .iter()
            .find(|s| s.name.inner() == set_name)
            .map(|s| s.use_metadata_key_order)
    }

    /// Create an empty model configured from this manifest.
    ///
    /// # Errors
    ///
    /// Propagates identifier validation errors.
    pub fn new_model(&self) -> Result<MetadataModel, MetadataError> {
        MetadataModel::new(
            self.container.name.inner(),
            &self.container.namespace.to_string(),
        )
    }
}

#[derive(Debug)]
pub enum Error {
    Io(IoError),
    Toml(TomlError),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Io(err) => write!(f, "input/output error: {err}"),
            Self::Toml(err) => write!(f, "manifest file format error: {err}"),
        }
    }
}

impl StdError for Error {}
