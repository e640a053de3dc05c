//! Volunteer gamification: points, levels, and badges.

use sampark_common::AppResult;
use sampark_db::entities::{badge, user};
use sampark_db::repositories::{BadgeRepository, UserRepository};
use serde::Serialize;
use tracing::info;

/// Points for resolving a complaint.
pub const COMPLAINT_RESOLUTION_POINTS: i32 = 15;

/// Points for joining a task as a collaborator.
pub const COLLABORATION_POINTS: i32 = 5;

/// Default points for completing a task, used when the creator does not set
/// a reward.
pub const DEFAULT_TASK_POINTS: i32 = 10;

/// Cumulative point thresholds per level. Index 0 is level 1.
const LEVEL_THRESHOLDS: [i32; 6] = [0, 50, 150, 300, 500, 800];

/// One badge the system can award.
#[derive(Debug, Clone, Serialize)]
pub struct BadgeSpec {
    pub key: &'static str,
    pub description: &'static str,
}

/// Every badge, in award order.
pub const BADGE_CATALOG: [BadgeSpec; 6] = [
    BadgeSpec {
        key: "first_task",
        description: "Completed a first task",
    },
    BadgeSpec {
        key: "task_master",
        description: "Completed 10 tasks",
    },
    BadgeSpec {
        key: "problem_solver",
        description: "Resolved 5 complaints",
    },
    BadgeSpec {
        key: "team_player",
        description: "Collaborated on 3 tasks",
    },
    BadgeSpec {
        key: "rising_star",
        description: "Earned 100 points",
    },
    BadgeSpec {
        key: "campaign_hero",
        description: "Earned 500 points",
    },
];

/// Points needed for the next level, or `None` at the top.
#[must_use]
pub fn next_level_threshold(points: i32) -> Option<i32> {
    LEVEL_THRESHOLDS.iter().find(|t| points < **t).copied()
}

/// Level reached for a point total.
#[must_use]
pub fn level_for_points(points: i32) -> i32 {
    let mut level = 1;
    for (index, threshold) in LEVEL_THRESHOLDS.iter().enumerate() {
        if points >= *threshold {
            level = i32::try_from(index).unwrap_or(0) + 1;
        }
    }
    level
}

/// Badges a user has earned, judged purely on their counters. Awarding is
/// idempotent so re-evaluating never double-grants.
#[must_use]
pub fn badges_earned(user: &user::Model) -> Vec<&'static str> {
    let mut earned = Vec::new();

    if user.tasks_completed >= 1 {
        earned.push("first_task");
    }
    if user.tasks_completed >= 10 {
        earned.push("task_master");
    }
    if user.complaints_resolved >= 5 {
        earned.push("problem_solver");
    }
    if user.collaborations >= 3 {
        earned.push("team_player");
    }
    if user.points >= 100 {
        earned.push("rising_star");
    }
    if user.points >= 500 {
        earned.push("campaign_hero");
    }

    earned
}

/// Gamification service.
#[derive(Clone)]
pub struct GamificationService {
    user_repo: UserRepository,
    badge_repo: BadgeRepository,
}

impl GamificationService {
    /// Create a new gamification service.
    #[must_use]
    pub const fn new(user_repo: UserRepository, badge_repo: BadgeRepository) -> Self {
        Self {
            user_repo,
            badge_repo,
        }
    }

    /// Credit a completed task.
    pub async fn award_task_completion(&self, user_id: &str, points: i32) -> AppResult<()> {
        self.user_repo.add_points(user_id, points).await?;
        self.user_repo.increment_tasks_completed(user_id).await?;
        self.refresh(user_id).await
    }

    /// Credit a resolved complaint.
    pub async fn award_complaint_resolution(&self, user_id: &str) -> AppResult<()> {
        self.user_repo
            .add_points(user_id, COMPLAINT_RESOLUTION_POINTS)
            .await?;
        self.user_repo.increment_complaints_resolved(user_id).await?;
        self.refresh(user_id).await
    }

    /// Credit joining a task as a collaborator.
    pub async fn award_collaboration(&self, user_id: &str) -> AppResult<()> {
        self.user_repo
            .add_points(user_id, COLLABORATION_POINTS)
            .await?;
        self.user_repo.increment_collaborations(user_id).await?;
        self.refresh(user_id).await
    }

    /// Recompute level and award any newly earned badges.
    ///
    /// Reads the counters back after the atomic bumps so concurrent awards
    /// converge on the same level.
    pub async fn refresh(&self, user_id: &str) -> AppResult<()> {
        let user = self.user_repo.get_by_id(user_id).await?;

        let level = level_for_points(user.points);
        if level != user.level {
            self.user_repo.set_level(user_id, level).await?;
            info!(user_id, level, "Volunteer reached a new level");
        }

        for badge in badges_earned(&user) {
            if self.badge_repo.award_once(user_id, badge).await? {
                info!(user_id, badge, "Awarded badge");
            }
        }

        Ok(())
    }

    /// Badges held by a user.
    pub async fn badges_for(&self, user_id: &str) -> AppResult<Vec<badge::Model>> {
        self.badge_repo.list_for_user(user_id).await
    }

    /// Top volunteers by points.
    pub async fn leaderboard(&self, limit: u64) -> AppResult<Vec<user::Model>> {
        self.user_repo.leaderboard(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_with(points: i32, tasks: i32, complaints: i32, collaborations: i32) -> user::Model {
        user::Model {
            id: "user1".to_string(),
            name: "Asha Rao".to_string(),
            email: "asha@example.org".to_string(),
            mobile: None,
            role: user::Role::Volunteer,
            password_hash: "hash".to_string(),
            avatar_url: None,
            is_approved: true,
            approved_by: None,
            approved_at: None,
            last_login_at: None,
            is_active: true,
            points,
            level: 1,
            tasks_completed: tasks,
            complaints_resolved: complaints,
            collaborations,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(level_for_points(0), 1);
        assert_eq!(level_for_points(49), 1);
        assert_eq!(level_for_points(50), 2);
        assert_eq!(level_for_points(149), 2);
        assert_eq!(level_for_points(150), 3);
        assert_eq!(level_for_points(300), 4);
        assert_eq!(level_for_points(500), 5);
        assert_eq!(level_for_points(799), 5);
        assert_eq!(level_for_points(800), 6);
        assert_eq!(level_for_points(10_000), 6);
    }

    #[test]
    fn test_level_is_monotonic() {
        let mut last = 0;
        for points in 0..1000 {
            let level = level_for_points(points);
            assert!(level >= last, "level dropped at {points} points");
            last = level;
        }
    }

    #[test]
    fn test_next_level_threshold() {
        assert_eq!(next_level_threshold(0), Some(50));
        assert_eq!(next_level_threshold(50), Some(150));
        assert_eq!(next_level_threshold(799), Some(800));
        assert_eq!(next_level_threshold(800), None);
    }

    #[test]
    fn test_catalog_matches_award_keys() {
        let user = user_with(10_000, 100, 100, 100);
        let earned = badges_earned(&user);
        for spec in BADGE_CATALOG {
            assert!(earned.contains(&spec.key), "{} never awarded", spec.key);
        }
    }

    #[test]
    fn test_badges_for_new_volunteer() {
        let user = user_with(0, 0, 0, 0);
        assert!(badges_earned(&user).is_empty());
    }

    #[test]
    fn test_first_task_badge() {
        let user = user_with(10, 1, 0, 0);
        assert_eq!(badges_earned(&user), vec!["first_task"]);
    }

    #[test]
    fn test_counter_badges() {
        let user = user_with(120, 10, 5, 3);
        let earned = badges_earned(&user);
        assert!(earned.contains(&"first_task"));
        assert!(earned.contains(&"task_master"));
        assert!(earned.contains(&"problem_solver"));
        assert!(earned.contains(&"team_player"));
        assert!(earned.contains(&"rising_star"));
        assert!(!earned.contains(&"campaign_hero"));
    }

    #[test]
    fn test_campaign_hero_badge() {
        let user = user_with(500, 0, 0, 0);
        assert!(badges_earned(&user).contains(&"campaign_hero"));
    }
}
