//! Business logic services.

pub mod approval;
pub mod audit;
pub mod auth;
pub mod complaint;
pub mod email;
pub mod event;
pub mod gamification;
pub mod registration;
pub mod stats;
pub mod task;
pub mod user;
pub mod voter;

pub use approval::ApprovalService;
pub use audit::AuditService;
pub use auth::{hash_password, verify_password, AuthService, Claims, LoginInput};
pub use complaint::{ComplaintService, CreateComplaintInput, ResolveComplaintInput};
pub use email::EmailService;
pub use event::{CreateEventInput, EventService, UpdateEventInput};
pub use gamification::{
    badges_earned, level_for_points, next_level_threshold, BadgeSpec, GamificationService,
    BADGE_CATALOG, COLLABORATION_POINTS, COMPLAINT_RESOLUTION_POINTS, DEFAULT_TASK_POINTS,
};
pub use registration::{
    RegistrationService, VolunteerSignupInput, VoterRegistrationInput, VoterSignupInput,
};
pub use stats::{DashboardStats, StatsService};
pub use task::{CreateTaskInput, TaskService};
pub use user::{ChangePasswordInput, UpdateProfileInput, UserService};
pub use voter::{CreateVoterInput, UpdateVoterInput, VoterBreakdown, VoterService};
