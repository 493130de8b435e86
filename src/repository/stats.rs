//! Aggregate counters for the admin dashboard.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::stats::DashboardStats;
use crate::domain::types::Role;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, StatsReader};

impl StatsReader for DieselRepository {
    fn dashboard_stats(&self, now: NaiveDateTime) -> RepositoryResult<DashboardStats> {
        use crate::schema::{messages, profiles, reviews, teachers};

        let mut conn = self.conn()?;

        let by_role = profiles::table
            .group_by(profiles::role)
            .select((profiles::role, diesel::dsl::count_star()))
            .load::<(String, i64)>(&mut conn)?;

        let mut stats = DashboardStats::default();
        for (role, count) in by_role {
            let count = count as usize;
            match role.parse::<Role>() {
                Ok(Role::Student) => stats.students = count,
                Ok(Role::Parent) => stats.parents = count,
                Ok(Role::Teacher) => stats.teachers = count,
                Ok(Role::Admin) => stats.admins = count,
                Err(err) => log::warn!("Skipping profiles with {err}"),
            }
        }

        stats.featured_teachers = teachers::table
            .filter(teachers::featured_until.gt(now))
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        stats.messages = messages::table.count().get_result::<i64>(&mut conn)? as usize;

        stats.unread_messages = messages::table
            .filter(messages::is_read.eq(false))
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        stats.reviews = reviews::table.count().get_result::<i64>(&mut conn)? as usize;

        Ok(stats)
    }
}
