//! # Background Tasks
//!
//! The fire-and-forget task queue, its worker, the side-effect computations
//! (confirmation mail, featured speaker, announcement refresh), and the
//! interval scheduler.

pub mod email;
pub mod errors;
pub mod queue;
pub mod scheduler;
pub mod workers;

pub use email::{EmailConfig, EmailMessage, EmailSender, MockEmailSender, SmtpEmailSender};
pub use errors::{TaskError, TaskResult};
pub use queue::{Task, TaskQueue};
pub use scheduler::AnnouncementScheduler;
pub use workers::{cache_announcement, set_featured_speaker, TaskWorker, ANNOUNCEMENT_TPL};
