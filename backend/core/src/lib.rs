pub mod attachment;
pub mod error;
pub mod event;
pub mod receipt;

pub use attachment::AttachmentDescriptor;
pub use error::ReciboError;
pub use event::{AttachmentStub, CcEntry, EmailData, InboundEmailEvent, EMAIL_RECEIVED};
pub use receipt::ReceiptRecord;
