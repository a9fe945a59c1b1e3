//! The closed set of agent roles and a role-indexed table.
//!
//! Roles are resolved once, at startup, into array slots.  Nothing in the
//! per-tick path compares role names as strings.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A behavioural category of agent.
///
/// Declaration order is the stable tie-break order used by the spawn
/// scheduler: when two roles score equally, the earlier one wins.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Primary extractor: sits on a resource node and harvests it.
    Extractor,
    /// Moves harvested energy from pickup points to consumers.
    Carrier,
    /// Explores neighbouring regions.
    Scout,
    /// Feeds the region controller (controller upgrading).
    Sustainer,
}

impl Role {
    pub const COUNT: usize = 4;

    /// Every role in stable declaration order.
    pub const ALL: [Role; Role::COUNT] = [
        Role::Extractor,
        Role::Carrier,
        Role::Scout,
        Role::Sustainer,
    ];

    /// Array slot for this role.
    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Extractor => "extractor",
            Role::Carrier   => "carrier",
            Role::Scout     => "scout",
            Role::Sustainer => "sustainer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Role, CoreError> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| CoreError::Parse(format!("unknown role {s:?}")))
    }
}

// ── RoleMap ───────────────────────────────────────────────────────────────────

/// A fixed-size table holding one `T` per [`Role`], indexed by role.
///
/// Used for desired/actual counts, priorities, tier tables, and the
/// behaviour dispatch table.  Iteration always follows [`Role::ALL`].
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoleMap<T>([T; Role::COUNT]);

impl<T> RoleMap<T> {
    /// Build a table by calling `f` once per role in declaration order.
    pub fn from_fn(mut f: impl FnMut(Role) -> T) -> Self {
        RoleMap(std::array::from_fn(|i| f(Role::ALL[i])))
    }

    /// `(role, &value)` pairs in stable role order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &T)> {
        Role::ALL.into_iter().zip(self.0.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Role, &mut T)> {
        Role::ALL.into_iter().zip(self.0.iter_mut())
    }

    pub fn map<U>(&self, mut f: impl FnMut(Role, &T) -> U) -> RoleMap<U> {
        RoleMap::from_fn(|r| f(r, &self.0[r.index()]))
    }
}

impl<T> Index<Role> for RoleMap<T> {
    type Output = T;
    #[inline]
    fn index(&self, role: Role) -> &T {
        &self.0[role.index()]
    }
}

impl<T> IndexMut<Role> for RoleMap<T> {
    #[inline]
    fn index_mut(&mut self, role: Role) -> &mut T {
        &mut self.0[role.index()]
    }
}

impl<T: fmt::Display> fmt::Display for RoleMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (role, value) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{role}={value}")?;
        }
        Ok(())
    }
}
