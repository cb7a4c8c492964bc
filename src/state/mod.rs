/// State management module
///
/// This module handles all persisted studio data:
/// - Key-value record store with change notification (store.rs)
/// - SQLite backend for the store (library.rs)
/// - Record types and drafts (data.rs)
/// - Typed collections with validation and canonical order (collection.rs)
/// - The `Studio` handle tying them together (studio.rs)

pub mod collection;
pub mod data;
pub mod library;
pub mod store;
pub mod studio;

pub use collection::{Collection, Record};
pub use data::{
    Appointment, AppointmentDraft, Client, ClientDraft, GalleryImage, ImageDraft, Sale, SaleDraft,
    TattooType,
};
pub use store::{Durability, KvBackend, MemoryBackend, RecordStore, SubscriptionId};
pub use studio::Studio;
