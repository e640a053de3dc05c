//! Repository layer over the Sea-ORM entities.

pub mod audit;
pub mod badge;
pub mod complaint;
pub mod event;
pub mod request;
pub mod task;
pub mod user;
pub mod voter;

pub use audit::{AuditLogRepository, LoginAuditRepository};
pub use badge::BadgeRepository;
pub use complaint::{ComplaintFilter, ComplaintRepository};
pub use event::EventRepository;
pub use request::{VolunteerRequestRepository, VoterRequestRepository};
pub use task::{TaskFilter, TaskRepository};
pub use user::UserRepository;
pub use voter::{VoterFilter, VoterRepository};
