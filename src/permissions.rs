use crate::models::{Complaint, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Citizen,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    PostComplaint,
    Like,
    Comment,
    /// Delete a complaint the user authored.
    DeleteOwn,
    Respond,
    ChangeStatus,
}

const CITIZEN_PERMISSIONS: &[Permission] = &[
    Permission::PostComplaint,
    Permission::Like,
    Permission::Comment,
    Permission::DeleteOwn,
];

const ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::PostComplaint,
    Permission::Like,
    Permission::Comment,
    Permission::DeleteOwn,
    Permission::Respond,
    Permission::ChangeStatus,
];

impl Role {
    pub fn permissions(self) -> &'static [Permission] {
        match self {
            Role::Citizen => CITIZEN_PERMISSIONS,
            Role::Admin => ADMIN_PERMISSIONS,
        }
    }

    pub fn grants(self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}

impl User {
    pub fn role(&self) -> Role {
        if self.is_admin {
            Role::Admin
        } else {
            Role::Citizen
        }
    }

    pub fn can(&self, permission: Permission) -> bool {
        self.role().grants(permission)
    }

    pub fn can_delete(&self, complaint: &Complaint) -> bool {
        self.can(Permission::DeleteOwn) && complaint.user_id == self.id
    }
}
