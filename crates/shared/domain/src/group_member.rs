//! Group membership projection consumed by the access-control context.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tenant::TenantId;

/// Kind of principal a group member stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupMemberType {
    Group,
    User,
}

impl GroupMemberType {
    pub fn is_group(&self) -> bool {
        matches!(self, GroupMemberType::Group)
    }

    pub fn is_user(&self) -> bool {
        matches!(self, GroupMemberType::User)
    }
}

impl fmt::Display for GroupMemberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupMemberType::Group => write!(f, "Group"),
            GroupMemberType::User => write!(f, "User"),
        }
    }
}

/// A member of a group, identified within its tenant by name and type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupMember {
    pub tenant_id: TenantId,
    pub name: String,
    pub member_type: GroupMemberType,
}

impl GroupMember {
    pub fn new(tenant_id: TenantId, name: impl Into<String>, member_type: GroupMemberType) -> Self {
        Self {
            tenant_id,
            name: name.into(),
            member_type,
        }
    }

    pub fn is_user(&self) -> bool {
        self.member_type.is_user()
    }

    pub fn is_group(&self) -> bool {
        self.member_type.is_group()
    }
}
