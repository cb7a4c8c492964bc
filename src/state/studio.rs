use super::collection::Collection;
use super::data::{Appointment, Client, GalleryImage, Sale};
use super::library::Library;
use super::store::RecordStore;
use crate::config::StudioConfig;
use crate::error::StoreError;

/// Entry point to the studio data: owns the record store and hands out
/// the four collections.
#[derive(Debug)]
pub struct Studio {
    store: RecordStore,
}

impl Studio {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Studio backed by the SQLite database described by `config`
    pub fn open(config: &StudioConfig) -> Result<Self, StoreError> {
        let library = Library::open(config)?;
        Ok(Self::new(RecordStore::new(library)))
    }

    /// Studio whose data lives only as long as the process
    pub fn in_memory() -> Self {
        Self::new(RecordStore::in_memory())
    }

    pub fn clients(&mut self) -> Collection<'_, Client> {
        Collection::new(&mut self.store)
    }

    pub fn appointments(&mut self) -> Collection<'_, Appointment> {
        Collection::new(&mut self.store)
    }

    pub fn sales(&mut self) -> Collection<'_, Sale> {
        Collection::new(&mut self.store)
    }

    pub fn gallery(&mut self) -> Collection<'_, GalleryImage> {
        Collection::new(&mut self.store)
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut RecordStore {
        &mut self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::ClientDraft;
    use tempfile::TempDir;

    #[test]
    fn test_reopened_studio_sees_saved_clients() {
        let dir = TempDir::new().unwrap();
        let config = StudioConfig::with_data_dir(dir.path());

        {
            let mut studio = Studio::open(&config).unwrap();
            studio
                .clients()
                .add(ClientDraft {
                    name: "Valeria".to_string(),
                    notes: "Prefers mornings\nAllergic to latex".to_string(),
                    ..ClientDraft::default()
                })
                .unwrap();
        }

        let mut studio = Studio::open(&config).unwrap();
        let clients = studio.clients().list();
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].notes, "Prefers mornings\nAllergic to latex");
        assert_eq!(studio.store().backend_name(), "sqlite");
    }
}
