/// Typed collections over the record store
///
/// A `Collection` borrows the store for the duration of one user action:
/// read the snapshot, validate, insert at the canonical position, write the
/// whole snapshot back.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cmp::Reverse;
use std::marker::PhantomData;

use chrono::NaiveDate;

use super::data::{
    require, require_positive_cost, Appointment, AppointmentDraft, Client, ClientDraft,
    GalleryImage, ImageDraft, Sale, SaleDraft,
};
use super::store::RecordStore;
use crate::error::{SaveError, ValidationError};

/// A record type with its own key in the store
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Store key holding the collection snapshot
    const KEY: &'static str;

    /// User-supplied fields before id assignment
    type Draft;

    fn id(&self) -> &str;

    /// Validate `draft` and build the record under `id`
    fn from_draft(id: String, draft: Self::Draft) -> Result<Self, ValidationError>;

    /// Restore the canonical order of a snapshot (stable)
    fn canonicalize(_snapshot: &mut [Self]) {}

    /// Put a new record at its canonical position
    fn insert(snapshot: &mut Vec<Self>, record: Self) {
        snapshot.push(record);
        Self::canonicalize(snapshot);
    }
}

impl Record for Client {
    const KEY: &'static str = "tattoo-clients";
    type Draft = ClientDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: ClientDraft) -> Result<Self, ValidationError> {
        require("name", &draft.name)?;
        Ok(Client {
            id,
            name: draft.name,
            phone: draft.phone,
            email: draft.email,
            notes: draft.notes,
        })
    }

    fn canonicalize(snapshot: &mut [Self]) {
        snapshot.sort_by_cached_key(|client| name_sort_key(&client.name));
    }
}

/// Case- and accent-insensitive ordering key (`Ángel` sorts with `angel`)
fn name_sort_key(name: &str) -> String {
    deunicode::deunicode(name).to_lowercase()
}

impl Record for Appointment {
    const KEY: &'static str = "tattoo-appointments";
    type Draft = AppointmentDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: AppointmentDraft) -> Result<Self, ValidationError> {
        require("client name", &draft.client_name)?;
        Ok(Appointment {
            id,
            client_name: draft.client_name,
            client_phone: draft.client_phone,
            date: draft.date,
            start_time: draft.start_time,
            end_time: draft.end_time,
            notes: draft.notes,
        })
    }
}

impl Record for Sale {
    const KEY: &'static str = "tattoo-sales";
    type Draft = SaleDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: SaleDraft) -> Result<Self, ValidationError> {
        require("client name", &draft.client_name)?;
        require_positive_cost(draft.cost)?;
        Ok(Sale {
            id,
            client_name: draft.client_name,
            client_phone: draft.client_phone,
            date: draft.date,
            tattoo_type: draft.tattoo_type,
            cost: draft.cost,
        })
    }

    fn canonicalize(snapshot: &mut [Self]) {
        snapshot.sort_by_key(|sale| Reverse(sale.date));
    }
}

impl Record for GalleryImage {
    const KEY: &'static str = "tattoo-gallery";
    type Draft = ImageDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: ImageDraft) -> Result<Self, ValidationError> {
        Ok(GalleryImage {
            id,
            src: draft.src,
            name: draft.name,
        })
    }

    fn insert(snapshot: &mut Vec<Self>, record: Self) {
        snapshot.insert(0, record);
    }
}

/// One collection of records, borrowed from a `RecordStore`
pub struct Collection<'s, R: Record> {
    store: &'s mut RecordStore,
    _record: PhantomData<R>,
}

impl<'s, R: Record> Collection<'s, R> {
    pub fn new(store: &'s mut RecordStore) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    /// Current snapshot in canonical order
    pub fn list(&self) -> Vec<R> {
        let mut snapshot: Vec<R> = self.store.read(R::KEY, Vec::new());
        R::canonicalize(&mut snapshot);
        snapshot
    }

    pub fn get(&self, id: &str) -> Option<R> {
        self.list().into_iter().find(|record| record.id() == id)
    }

    pub fn len(&self) -> usize {
        self.list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate `draft`, assign a fresh id, insert and persist.
    ///
    /// A rejected draft leaves the store untouched.
    pub fn add(&mut self, draft: R::Draft) -> Result<R, SaveError> {
        let record = R::from_draft(uuid::Uuid::new_v4().to_string(), draft)?;

        let mut snapshot = self.list();
        R::insert(&mut snapshot, record.clone());
        self.store.write(R::KEY, &snapshot)?;

        tracing::info!("➕ Saved {} to '{}' ({} total)", record.id(), R::KEY, snapshot.len());
        Ok(record)
    }
}

impl Collection<'_, GalleryImage> {
    /// Delete the image with `id`; returns false (and writes nothing) if absent
    pub fn remove(&mut self, id: &str) -> Result<bool, SaveError> {
        let mut snapshot = self.list();
        let before = snapshot.len();
        snapshot.retain(|image| image.id != id);

        if snapshot.len() == before {
            return Ok(false);
        }

        self.store.write(GalleryImage::KEY, &snapshot)?;
        tracing::info!("🗑️  Removed image {} from gallery", id);
        Ok(true)
    }
}

impl Collection<'_, Appointment> {
    /// Appointments booked on exactly `date`, in insertion order
    pub fn for_day(&self, date: NaiveDate) -> Vec<Appointment> {
        self.list()
            .into_iter()
            .filter(|appointment| appointment.date == date)
            .collect()
    }
}

impl Collection<'_, Client> {
    /// Clients whose name contains `term`, ignoring case
    pub fn search(&self, term: &str) -> Vec<Client> {
        let needle = term.to_lowercase();
        self.list()
            .into_iter()
            .filter(|client| client.name.to_lowercase().contains(&needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::TattooType;
    use crate::state::store::MemoryBackend;
    use crate::state::Studio;
    use chrono::NaiveTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn client(name: &str) -> ClientDraft {
        ClientDraft {
            name: name.to_string(),
            ..ClientDraft::default()
        }
    }

    fn sale(name: &str, on: NaiveDate, cost: f64) -> SaleDraft {
        SaleDraft {
            client_name: name.to_string(),
            client_phone: String::new(),
            date: on,
            tattoo_type: TattooType::Blackwork,
            cost,
        }
    }

    fn image(name: &str) -> ImageDraft {
        ImageDraft {
            src: "data:image/png;base64,AAAA".to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_clients_stay_sorted_by_name_ignoring_case() {
        let mut studio = Studio::in_memory();
        for name in ["mara", "Bruno", "alba", "Zoe", "carla"] {
            studio.clients().add(client(name)).unwrap();
        }

        let names: Vec<String> = studio.clients().list().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["alba", "Bruno", "carla", "mara", "Zoe"]);
    }

    #[test]
    fn test_accented_client_names_sort_with_their_base_letter() {
        let mut studio = Studio::in_memory();
        for name in ["Zoe", "Ángel", "Beto", "Íñigo", "Juan"] {
            studio.clients().add(client(name)).unwrap();
        }

        let names: Vec<String> = studio.clients().list().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Ángel", "Beto", "Íñigo", "Juan", "Zoe"]);
    }

    #[test]
    fn test_client_without_name_is_not_saved() {
        let mut studio = Studio::in_memory();

        let result = studio.clients().add(client("  "));
        assert!(matches!(
            result,
            Err(SaveError::Invalid(ValidationError::MissingField { field: "name" }))
        ));
        assert!(studio.clients().is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut studio = Studio::in_memory();
        let a = studio.clients().add(client("Ana")).unwrap();
        let b = studio.clients().add(client("Ana")).unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(studio.clients().get(&b.id), Some(b));
    }

    #[test]
    fn test_client_search_is_case_insensitive_substring() {
        let mut studio = Studio::in_memory();
        for name in ["Mariana Soto", "Omar", "Ximena", "MARIO"] {
            studio.clients().add(client(name)).unwrap();
        }

        let found: Vec<String> = studio.clients().search("mar").into_iter().map(|c| c.name).collect();
        assert_eq!(found, vec!["Mariana Soto", "MARIO", "Omar"]);
        assert_eq!(studio.clients().search("").len(), 4);
    }

    #[test]
    fn test_sales_sorted_by_date_descending() {
        let mut studio = Studio::in_memory();
        studio.sales().add(sale("a", date(2024, 1, 5), 100.0)).unwrap();
        studio.sales().add(sale("b", date(2024, 2, 1), 100.0)).unwrap();
        studio.sales().add(sale("c", date(2023, 12, 24), 100.0)).unwrap();
        studio.sales().add(sale("d", date(2024, 1, 5), 100.0)).unwrap();

        let order: Vec<String> = studio.sales().list().into_iter().map(|s| s.client_name).collect();
        assert_eq!(order, vec!["b", "a", "d", "c"]);
    }

    #[test]
    fn test_appointment_without_client_name_is_not_saved() {
        let mut studio = Studio::in_memory();
        let mut kept = AppointmentDraft::on(date(2024, 3, 5));
        kept.client_name = "Luna".to_string();
        studio.appointments().add(kept).unwrap();
        let before = studio.appointments().list();

        for blank in ["", "   "] {
            let mut draft = AppointmentDraft::on(date(2024, 3, 6));
            draft.client_name = blank.to_string();
            let result = studio.appointments().add(draft);
            assert!(matches!(
                result,
                Err(SaveError::Invalid(ValidationError::MissingField { field: "client name" }))
            ));
        }
        assert_eq!(studio.appointments().list(), before);
    }

    #[test]
    fn test_sale_without_client_name_is_not_saved() {
        let mut studio = Studio::in_memory();
        studio.sales().add(sale("Luna", date(2024, 1, 1), 80.0)).unwrap();
        let before = studio.sales().list();

        for blank in ["", "\t "] {
            let result = studio.sales().add(sale(blank, date(2024, 1, 2), 120.0));
            assert!(matches!(
                result,
                Err(SaveError::Invalid(ValidationError::MissingField { field: "client name" }))
            ));
        }
        assert_eq!(studio.sales().list(), before);
    }

    #[test]
    fn test_sales_with_non_positive_cost_are_rejected() {
        let mut studio = Studio::in_memory();
        studio.sales().add(sale("ok", date(2024, 1, 1), 50.0)).unwrap();

        for cost in [0.0, -20.0, f64::NAN] {
            let result = studio.sales().add(sale("bad", date(2024, 1, 2), cost));
            assert!(matches!(
                result,
                Err(SaveError::Invalid(ValidationError::NonPositiveCost(_)))
            ));
        }

        let sales = studio.sales().list();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].client_name, "ok");
    }

    #[test]
    fn test_appointments_for_day() {
        let mut studio = Studio::in_memory();
        let day = date(2024, 3, 5);
        for (name, on) in [("a", day), ("b", date(2024, 3, 6)), ("c", day)] {
            let mut draft = AppointmentDraft::on(on);
            draft.client_name = name.to_string();
            studio.appointments().add(draft).unwrap();
        }

        let names: Vec<String> = studio
            .appointments()
            .for_day(day)
            .into_iter()
            .map(|a| a.client_name)
            .collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_overlapping_appointments_are_allowed() {
        let mut studio = Studio::in_memory();
        for name in ["first", "second"] {
            let mut draft = AppointmentDraft::on(date(2024, 3, 5));
            draft.client_name = name.to_string();
            draft.start_time = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
            studio.appointments().add(draft).unwrap();
        }
        assert_eq!(studio.appointments().len(), 2);
    }

    #[test]
    fn test_gallery_newest_first_and_remove_is_idempotent() {
        let mut studio = Studio::in_memory();
        let first = studio.gallery().add(image("first.png")).unwrap();
        studio.gallery().add(image("second.png")).unwrap();

        let names: Vec<String> = studio.gallery().list().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["second.png", "first.png"]);

        assert!(studio.gallery().remove(&first.id).unwrap());
        assert!(!studio.gallery().remove(&first.id).unwrap());
        assert!(!studio.gallery().remove("missing").unwrap());
        assert_eq!(studio.gallery().len(), 1);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut studio = Studio::in_memory();
        studio.clients().add(client("Ana")).unwrap();
        studio.clients().add(client("Beto")).unwrap();
        let before = studio.clients().list();

        studio.store_mut().write(Client::KEY, &before).unwrap();
        assert_eq!(studio.clients().list(), before);
    }

    #[test]
    fn test_out_of_order_snapshot_is_listed_in_canonical_order() {
        let mut backend = MemoryBackend::new();
        crate::state::store::KvBackend::set(
            &mut backend,
            Client::KEY,
            r#"[{"id":"2","name":"zeta","phone":"","email":"","notes":""},
                {"id":"1","name":"Alfa","phone":"","email":"","notes":""}]"#,
        )
        .unwrap();

        let mut studio = Studio::new(RecordStore::new(backend));
        let ids: Vec<String> = studio.clients().list().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }
}
