// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::Path;

use secrecy::SecretString;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseProvider {
    Sqlite,
}

impl std::fmt::Display for DatabaseProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseProvider::Sqlite => write!(f, "sqlite"),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub struct DatabaseConfiguration {
    pub provider: DatabaseProvider,
    pub database_name: String,
    pub max_connections: Option<u32>,
}

impl DatabaseConfiguration {
    pub fn sqlite_from(path: &Path) -> Self {
        Self {
            provider: DatabaseProvider::Sqlite,
            database_name: path.to_string_lossy().into_owned(),
            max_connections: None,
        }
    }

    /// Private in-memory database. Restricted to a single connection as every
    /// `SQLite` connection to `:memory:` opens a separate database.
    pub fn sqlite_in_memory() -> Self {
        Self {
            provider: DatabaseProvider::Sqlite,
            database_name: String::from(":memory:"),
            max_connections: Some(1),
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        if !self.is_in_memory() {
            self.max_connections = Some(max_connections);
        }
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_name == ":memory:"
    }

    pub fn connection_string(&self) -> SecretString {
        let s = match self.provider {
            DatabaseProvider::Sqlite if self.is_in_memory() => String::from("sqlite::memory:"),
            DatabaseProvider::Sqlite => format!("{}://{}?mode=rwc", self.provider, self.database_name),
        };
        SecretString::from(s)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
