//! DocumentHost service: opening a document in its native application and
//! closing it again. Navigation inside the document is exposed as primitive
//! operations (`select`, `next_page`); the paging policy lives in the session
//! drivers.

mod dry_run;
mod libreoffice;
mod page_count;
mod r#trait;
mod viewer;

pub use self::r#trait::{create_document_host, DocumentHost, OpenDocument};
