//! Sea-ORM entity definitions.

pub mod audit_log;
pub mod badge;
pub mod complaint;
pub mod event;
pub mod login_audit;
pub mod task;
pub mod user;
pub mod volunteer_request;
pub mod voter;
pub mod voter_request;

pub use audit_log::Entity as AuditLog;
pub use badge::Entity as Badge;
pub use complaint::Entity as Complaint;
pub use event::Entity as Event;
pub use login_audit::Entity as LoginAudit;
pub use task::Entity as Task;
pub use user::Entity as User;
pub use volunteer_request::Entity as VolunteerRequest;
pub use voter::Entity as Voter;
pub use voter_request::Entity as VoterRequest;
