use serde::Serialize;

/// Counters shown on the admin dashboard.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub students: usize,
    pub parents: usize,
    pub teachers: usize,
    pub admins: usize,
    pub featured_teachers: usize,
    pub messages: usize,
    pub unread_messages: usize,
    pub reviews: usize,
}

impl DashboardStats {
    pub fn total_profiles(&self) -> usize {
        self.students + self.parents + self.teachers + self.admins
    }
}
