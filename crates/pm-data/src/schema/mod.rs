//! Column roles and role resolution
//!
//! The host tags every column with one or more semantic roles. A row is
//! read through a [`RoleMapping`], which checks the role cardinality once
//! per dataset and remembers which column feeds which record field.

use std::fmt;
use std::str::FromStr;

use ahash::AHashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::DataError;

/// Semantic role of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Latitude,
    Longitude,
    Category,
    Size,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Latitude, Role::Longitude, Role::Category, Role::Size];

    pub fn name(&self) -> &'static str {
        match self {
            Role::Latitude => "latitude",
            Role::Longitude => "longitude",
            Role::Category => "category",
            Role::Size => "size",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Role {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DataError::UnknownRole(s.to_string()))
    }
}

/// Ordered set of roles; the first one is the column's record key.
///
/// Serialized the way the host sends it: `{"latitude": true}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "IndexMap<Role, bool>", into = "IndexMap<Role, bool>")]
pub struct RoleSet(Vec<Role>);

impl RoleSet {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        let mut set = Vec::new();
        for role in roles {
            if !set.contains(&role) {
                set.push(role);
            }
        }
        Self(set)
    }

    /// Parse `latitude+category` style role lists
    pub fn parse(s: &str) -> Result<Self, DataError> {
        let roles = s
            .split('+')
            .filter(|part| !part.trim().is_empty())
            .map(Role::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(roles))
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    /// The role a cell of this column is stored under
    pub fn primary(&self) -> Option<Role> {
        self.0.first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<IndexMap<Role, bool>> for RoleSet {
    fn from(map: IndexMap<Role, bool>) -> Self {
        Self::new(map.into_iter().filter(|(_, on)| *on).map(|(role, _)| role))
    }
}

impl From<RoleSet> for IndexMap<Role, bool> {
    fn from(set: RoleSet) -> Self {
        set.0.into_iter().map(|role| (role, true)).collect()
    }
}

/// A column descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    #[serde(rename = "displayName", alias = "name")]
    pub name: String,
    #[serde(default)]
    pub roles: RoleSet,
}

impl Column {
    pub fn new(name: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            name: name.into(),
            roles: RoleSet::new(roles),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(role)
    }
}

/// First column carrying a legend measure (category or size)
pub fn legend_column(columns: &[Column]) -> Option<usize> {
    columns
        .iter()
        .position(|c| c.has_role(Role::Category) || c.has_role(Role::Size))
}

/// Which column feeds which role
#[derive(Debug, Clone, PartialEq)]
pub struct RoleMapping {
    pub latitude: usize,
    pub longitude: usize,
    pub category: Option<usize>,
    pub size: Option<usize>,
    /// Column whose values drive classification and the legend
    pub legend: Option<usize>,
    keys: Vec<Option<Role>>,
}

impl RoleMapping {
    /// Resolve roles over `columns`.
    ///
    /// Exactly one column must carry latitude and exactly one longitude.
    /// Category and size are optional; the first carrier wins.
    pub fn resolve(columns: &[Column]) -> Result<Self, DataError> {
        let mut carriers: AHashMap<Role, Vec<usize>> = AHashMap::new();
        for (idx, column) in columns.iter().enumerate() {
            for role in column.roles.iter() {
                carriers.entry(role).or_default().push(idx);
            }
        }

        let exactly_one = |role: Role| -> Result<usize, DataError> {
            match carriers.get(&role).map(Vec::as_slice) {
                None | Some([]) => Err(DataError::MissingRole(role)),
                Some([only]) => Ok(*only),
                Some(found) => Err(DataError::DuplicateRole {
                    role,
                    columns: found.iter().map(|&i| columns[i].name.clone()).collect(),
                }),
            }
        };
        let first = |role: Role| carriers.get(&role).and_then(|c| c.first().copied());

        Ok(Self {
            latitude: exactly_one(Role::Latitude)?,
            longitude: exactly_one(Role::Longitude)?,
            category: first(Role::Category),
            size: first(Role::Size),
            legend: legend_column(columns),
            keys: columns.iter().map(|c| c.roles.primary()).collect(),
        })
    }

    /// Record key of a column, `None` for columns without roles
    pub fn key(&self, column: usize) -> Option<Role> {
        self.keys.get(column).copied().flatten()
    }

    pub fn column_count(&self) -> usize {
        self.keys.len()
    }
}
