//! Browser-side conversation core: gateway clients, the message store,
//! summaries, search highlighting, and the consultation session.

pub mod gateway;
pub mod highlight;
pub mod session;
pub mod store;
pub mod summary;

pub use gateway::{FunctionsClient, SummaryGateway, TranscriptionGateway, TranslationGateway};
pub use session::ConsultationSession;
pub use store::{MessageStore, SendRequest, StoreNotice};
