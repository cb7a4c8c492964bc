use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Utc};
use iced::widget::image::Handle;
use iced::widget::{
    button, column, container, pick_list, progress_bar, row, scrollable, text, text_input, Column,
    Image, Row,
};
use iced::{Alignment, Element, Length, Task, Theme};
use rfd::FileDialog;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

use tattoo_studio::error::SaveError;
use tattoo_studio::export::{self, ExportFile};
use tattoo_studio::media::{self, ImportResult};
use tattoo_studio::report;
use tattoo_studio::state::data::{parse_cost, parse_date, parse_time};
use tattoo_studio::state::{
    Appointment, AppointmentDraft, Client, ClientDraft, GalleryImage, Record, Sale, SaleDraft,
    Studio, TattooType,
};
use tattoo_studio::StudioConfig;

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Agenda,
    Clients,
    Sales,
    Gallery,
}

#[derive(Debug, Clone, Copy)]
enum ClientField {
    Name,
    Phone,
    Email,
    Notes,
}

#[derive(Debug, Clone, Copy)]
enum AppointmentField {
    ClientName,
    ClientPhone,
    StartTime,
    EndTime,
    Notes,
}

#[derive(Debug, Clone, Copy)]
enum SaleField {
    ClientName,
    ClientPhone,
    Date,
    Cost,
}

#[derive(Debug, Clone, Default)]
struct ClientForm {
    name: String,
    phone: String,
    email: String,
    notes: String,
}

#[derive(Debug, Clone)]
struct AppointmentForm {
    client_name: String,
    client_phone: String,
    start_time: String,
    end_time: String,
    notes: String,
}

impl Default for AppointmentForm {
    fn default() -> Self {
        Self {
            client_name: String::new(),
            client_phone: String::new(),
            start_time: "12:00".to_string(),
            end_time: "13:00".to_string(),
            notes: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
struct SaleForm {
    client_name: String,
    client_phone: String,
    date: String,
    tattoo_type: TattooType,
    cost: String,
}

impl SaleForm {
    fn new(today: NaiveDate) -> Self {
        Self {
            client_name: String::new(),
            client_phone: String::new(),
            date: today.format("%Y-%m-%d").to_string(),
            tattoo_type: TattooType::default(),
            cost: String::new(),
        }
    }
}

/// Main application state
struct TattooStudio {
    studio: Studio,
    /// Collection keys written since the last refresh
    dirty: Rc<RefCell<HashSet<&'static str>>>,
    clients: Vec<Client>,
    appointments: Vec<Appointment>,
    sales: Vec<Sale>,
    gallery: Vec<GalleryImage>,
    /// Decoded gallery images keyed by record id
    thumbnails: HashMap<String, Handle>,

    tab: Tab,
    /// Status message to display to the user
    status: String,
    /// First day of the month shown in the agenda
    agenda_month: NaiveDate,
    selected_day: NaiveDate,
    appointment_form: AppointmentForm,
    client_form: ClientForm,
    client_search: String,
    /// Clients matching `client_search`
    client_matches: Vec<Client>,
    /// Appointments booked on `selected_day`
    day_appointments: Vec<Appointment>,
    sale_form: SaleForm,
    selected_image: Option<String>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    TabSelected(Tab),

    PreviousMonth,
    NextMonth,
    DaySelected(NaiveDate),
    AppointmentInput(AppointmentField, String),
    SaveAppointment,
    ExportAppointment(String),

    ClientInput(ClientField, String),
    ClientSearch(String),
    SaveClient,
    ExportClient(String),

    SaleInput(SaleField, String),
    SaleTypeSelected(TattooType),
    SaveSale,

    /// User clicked the "Add Photo" button
    AddImage,
    /// User clicked the "Import Folder" button
    ImportFolder,
    /// Background import completed with results
    ImportComplete(ImportResult),
    ImageSelected(String),
    CloseImage,
    SaveImageAs(String),
    RemoveImage(String),
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl TattooStudio {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let (mut studio, status) = match StudioConfig::load() {
            Ok(config) => match Studio::open(&config) {
                Ok(studio) => (studio, "Ready.".to_string()),
                Err(e) => {
                    tracing::error!("❌ Could not open {}: {}", config.database_path().display(), e);
                    (Studio::in_memory(), format!("⚠️ Database unavailable ({e}); changes will not be saved."))
                }
            },
            Err(e) => {
                tracing::error!("❌ Could not load settings: {}", e);
                (Studio::in_memory(), format!("⚠️ Settings unavailable ({e}); changes will not be saved."))
            }
        };

        // Any write marks its collection for re-reading
        let dirty = Rc::new(RefCell::new(HashSet::new()));
        for key in [Client::KEY, Appointment::KEY, Sale::KEY, GalleryImage::KEY] {
            let dirty = Rc::clone(&dirty);
            studio.store_mut().subscribe(key, move |_| {
                dirty.borrow_mut().insert(key);
            });
        }

        let today = now().date();
        let mut app = TattooStudio {
            studio,
            dirty,
            clients: Vec::new(),
            appointments: Vec::new(),
            sales: Vec::new(),
            gallery: Vec::new(),
            thumbnails: HashMap::new(),
            tab: Tab::Agenda,
            status,
            agenda_month: report::month_start(today),
            selected_day: today,
            appointment_form: AppointmentForm::default(),
            client_form: ClientForm::default(),
            client_search: String::new(),
            client_matches: Vec::new(),
            day_appointments: Vec::new(),
            sale_form: SaleForm::new(today),
            selected_image: None,
        };
        app.reload_all();

        tracing::info!(
            "🎨 Tattoo Studio initialized with {} clients, {} appointments, {} sales, {} images",
            app.clients.len(),
            app.appointments.len(),
            app.sales.len(),
            app.gallery.len()
        );

        (app, Task::none())
    }

    fn reload_all(&mut self) {
        self.dirty
            .borrow_mut()
            .extend([Client::KEY, Appointment::KEY, Sale::KEY, GalleryImage::KEY]);
        self.refresh();
    }

    /// Re-read every collection written since the last refresh
    fn refresh(&mut self) {
        let dirty: Vec<&'static str> = self.dirty.borrow_mut().drain().collect();
        for key in dirty {
            if key == Client::KEY {
                self.clients = self.studio.clients().list();
            } else if key == Appointment::KEY {
                self.appointments = self.studio.appointments().list();
            } else if key == Sale::KEY {
                self.sales = self.studio.sales().list();
            } else if key == GalleryImage::KEY {
                self.gallery = self.studio.gallery().list();
                self.thumbnails = self
                    .gallery
                    .iter()
                    .filter_map(|image| match media::decode_data_url(&image.src) {
                        Ok((_, bytes)) => Some((image.id.clone(), Handle::from_bytes(bytes))),
                        Err(e) => {
                            tracing::warn!("⚠️  Cannot display {}: {}", image.name, e);
                            None
                        }
                    })
                    .collect();
            }
        }

        // Filtered views depend on the search term and selected day as well
        self.client_matches = self.studio.clients().search(&self.client_search);
        self.day_appointments = self.studio.appointments().for_day(self.selected_day);
    }

    /// Status line after a save; warns when the write stayed in memory
    fn saved_status(&self, key: &str, what: String) -> String {
        if self.studio.store().is_durable(key) {
            format!("✅ {what}")
        } else {
            format!("⚠️ {what}, but it could not be written to disk and will be lost on exit.")
        }
    }

    fn save_error_status(error: SaveError) -> String {
        match error {
            SaveError::Invalid(e) => format!("Please fix the form: {e}"),
            SaveError::Store(e) => format!("❌ Could not save: {e}"),
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        let task = self.handle(message);
        self.refresh();
        task
    }

    fn handle(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TabSelected(tab) => {
                self.tab = tab;
            }

            // ========== Agenda ==========
            Message::PreviousMonth => {
                self.agenda_month = report::month_start(self.agenda_month.pred_opt().unwrap_or(self.agenda_month));
            }
            Message::NextMonth => {
                let days_in_month = report::month_calendar(self.agenda_month.year(), self.agenda_month.month(), &[])
                    .map(|calendar| calendar.days.len() as u64)
                    .unwrap_or(31);
                if let Some(next) = self.agenda_month.checked_add_days(chrono::Days::new(days_in_month)) {
                    self.agenda_month = next;
                }
            }
            Message::DaySelected(day) => {
                self.selected_day = day;
            }
            Message::AppointmentInput(field, value) => {
                let form = &mut self.appointment_form;
                match field {
                    AppointmentField::ClientName => form.client_name = value,
                    AppointmentField::ClientPhone => form.client_phone = value,
                    AppointmentField::StartTime => form.start_time = value,
                    AppointmentField::EndTime => form.end_time = value,
                    AppointmentField::Notes => form.notes = value,
                }
            }
            Message::SaveAppointment => {
                let form = &self.appointment_form;
                let draft = parse_time(&form.start_time).and_then(|start_time| {
                    Ok(AppointmentDraft {
                        client_name: form.client_name.clone(),
                        client_phone: form.client_phone.clone(),
                        date: self.selected_day,
                        start_time,
                        end_time: parse_time(&form.end_time)?,
                        notes: form.notes.clone(),
                    })
                });

                let saved = draft
                    .map_err(SaveError::from)
                    .and_then(|d| self.studio.appointments().add(d));
                self.status = match saved {
                    Ok(appointment) => {
                        self.appointment_form = AppointmentForm::default();
                        self.saved_status(
                            Appointment::KEY,
                            format!("Booked {} on {}", appointment.client_name, appointment.date),
                        )
                    }
                    Err(e) => Self::save_error_status(e),
                };
            }
            Message::ExportAppointment(id) => {
                if let Some(appointment) = self.appointments.iter().find(|a| a.id == id) {
                    self.status = match export::calendar_file(appointment, Utc::now()) {
                        Ok(file) => save_export(&file, "Calendar", "ics"),
                        Err(e) => format!("❌ {e}"),
                    };
                }
            }

            // ========== Clients ==========
            Message::ClientInput(field, value) => {
                let form = &mut self.client_form;
                match field {
                    ClientField::Name => form.name = value,
                    ClientField::Phone => form.phone = value,
                    ClientField::Email => form.email = value,
                    ClientField::Notes => form.notes = value,
                }
            }
            Message::ClientSearch(term) => {
                self.client_search = term;
            }
            Message::SaveClient => {
                let form = self.client_form.clone();
                let draft = ClientDraft {
                    name: form.name,
                    phone: form.phone,
                    email: form.email,
                    notes: form.notes,
                };
                let saved = self.studio.clients().add(draft);
                self.status = match saved {
                    Ok(client) => {
                        self.client_form = ClientForm::default();
                        self.saved_status(Client::KEY, format!("Saved client {}", client.name))
                    }
                    Err(e) => Self::save_error_status(e),
                };
            }
            Message::ExportClient(id) => {
                if let Some(client) = self.clients.iter().find(|c| c.id == id) {
                    self.status = save_export(&export::contact_file(client), "Contact", "vcf");
                }
            }

            // ========== Sales ==========
            Message::SaleInput(field, value) => {
                let form = &mut self.sale_form;
                match field {
                    SaleField::ClientName => form.client_name = value,
                    SaleField::ClientPhone => form.client_phone = value,
                    SaleField::Date => form.date = value,
                    SaleField::Cost => form.cost = value,
                }
            }
            Message::SaleTypeSelected(tattoo_type) => {
                self.sale_form.tattoo_type = tattoo_type;
            }
            Message::SaveSale => {
                let form = &self.sale_form;
                let draft = parse_date(&form.date).and_then(|date| {
                    Ok(SaleDraft {
                        client_name: form.client_name.clone(),
                        client_phone: form.client_phone.clone(),
                        date,
                        tattoo_type: form.tattoo_type,
                        cost: parse_cost(&form.cost)?,
                    })
                });

                let saved = draft
                    .map_err(SaveError::from)
                    .and_then(|d| self.studio.sales().add(d));
                self.status = match saved {
                    Ok(sale) => {
                        self.sale_form = SaleForm::new(now().date());
                        self.saved_status(Sale::KEY, format!("Recorded {} for {}", format_currency(sale.cost), sale.client_name))
                    }
                    Err(e) => Self::save_error_status(e),
                };
            }

            // ========== Gallery ==========
            Message::AddImage => {
                let picked = FileDialog::new()
                    .set_title("Add Photo")
                    .add_filter("Images", &media::IMAGE_EXTENSIONS)
                    .pick_file();

                if let Some(path) = picked {
                    let added = media::image_draft_from_file(&path)
                        .map_err(|e| e.to_string())
                        .and_then(|draft| self.studio.gallery().add(draft).map_err(|e| e.to_string()));
                    self.status = match added {
                        Ok(image) => self.saved_status(GalleryImage::KEY, format!("Added {}", image.name)),
                        Err(e) => format!("❌ {e}"),
                    };
                }
            }
            Message::ImportFolder => {
                // Show the native folder picker dialog
                let folder = FileDialog::new()
                    .set_title("Select Folder with Photos")
                    .pick_folder();

                if let Some(folder_path) = folder {
                    self.status = format!("Importing from {}...", folder_path.display());

                    // Launch async import task
                    return Task::perform(media::import_folder(folder_path), Message::ImportComplete);
                }
            }
            Message::ImportComplete(result) => {
                let mut imported_count = 0;
                for draft in result.drafts {
                    match self.studio.gallery().add(draft) {
                        Ok(_) => imported_count += 1,
                        Err(e) => tracing::warn!("⚠️  Could not add image: {}", e),
                    }
                }

                tracing::info!("📊 Import summary: {} new, {} skipped", imported_count, result.skipped_count);
                self.status = self.saved_status(
                    GalleryImage::KEY,
                    format!("Import complete! Added {} images, skipped {}", imported_count, result.skipped_count),
                );
            }
            Message::ImageSelected(id) => {
                self.selected_image = Some(id);
            }
            Message::CloseImage => {
                self.selected_image = None;
            }
            Message::SaveImageAs(id) => {
                if let Some(image) = self.gallery.iter().find(|i| i.id == id) {
                    self.status = match media::decode_data_url(&image.src) {
                        Ok((mime, bytes)) => {
                            let file = FileDialog::new().set_file_name(&image.name).save_file();
                            match file {
                                Some(path) => match std::fs::write(&path, bytes) {
                                    Ok(()) => format!("📤 Saved {} ({mime}) to {}", image.name, path.display()),
                                    Err(e) => format!("❌ Could not save {}: {e}", path.display()),
                                },
                                None => self.status.clone(),
                            }
                        }
                        Err(e) => format!("❌ {e}"),
                    };
                }
            }
            Message::RemoveImage(id) => {
                let removed = self.studio.gallery().remove(&id);
                self.status = match removed {
                    Ok(true) => self.saved_status(GalleryImage::KEY, "Removed photo".to_string()),
                    Ok(false) => self.status.clone(),
                    Err(e) => format!("❌ Could not remove photo: {e}"),
                };
                self.selected_image = None;
            }
        }

        Task::none()
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let tabs = row![
            tab_button("Agenda", Tab::Agenda, self.tab),
            tab_button("Clients", Tab::Clients, self.tab),
            tab_button("Sales", Tab::Sales, self.tab),
            tab_button("Gallery", Tab::Gallery, self.tab),
        ]
        .spacing(10);

        let body = match self.tab {
            Tab::Agenda => self.agenda_view(),
            Tab::Clients => self.clients_view(),
            Tab::Sales => self.sales_view(),
            Tab::Gallery => self.gallery_view(),
        };

        let content = column![
            text("Tattoo Studio").size(32),
            tabs,
            text(&self.status).size(14),
            scrollable(body).height(Length::Fill),
        ]
        .spacing(16)
        .padding(24);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn agenda_view(&self) -> Element<Message> {
        let month = self.agenda_month;
        let mut grid = Column::new().spacing(4);

        let mut header = Row::new().spacing(4);
        for weekday in report::WEEKDAY_HEADERS {
            header = header.push(container(text(weekday.to_string())).width(Length::Fixed(56.0)));
        }
        grid = grid.push(header);

        if let Some(calendar) = report::month_calendar(month.year(), month.month(), &self.appointments) {
            for week in calendar.weeks() {
                let mut cells = Row::new().spacing(4);
                for cell in week {
                    let cell: Element<Message> = match cell {
                        Some(day) => {
                            let label = if day.appointment_count > 0 {
                                format!("{} ({})", day.date.day(), day.appointment_count)
                            } else {
                                day.date.day().to_string()
                            };
                            let style = if day.date == self.selected_day {
                                button::primary
                            } else {
                                button::secondary
                            };
                            button(text(label).size(13))
                                .style(style)
                                .width(Length::Fixed(56.0))
                                .on_press(Message::DaySelected(day.date))
                                .into()
                        }
                        None => container(text("")).width(Length::Fixed(56.0)).into(),
                    };
                    cells = cells.push(cell);
                }
                grid = grid.push(cells);
            }
        }

        let navigation = row![
            button("<").on_press(Message::PreviousMonth),
            text(month.format("%B %Y").to_string()).size(20),
            button(">").on_press(Message::NextMonth),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let form = &self.appointment_form;
        let booking = column![
            text(format!("New appointment on {}", self.selected_day)).size(18),
            input("Client name", &form.client_name, |v| Message::AppointmentInput(AppointmentField::ClientName, v)),
            input("Client phone", &form.client_phone, |v| Message::AppointmentInput(AppointmentField::ClientPhone, v)),
            row![
                input("Start (HH:MM)", &form.start_time, |v| Message::AppointmentInput(AppointmentField::StartTime, v)),
                input("End (HH:MM)", &form.end_time, |v| Message::AppointmentInput(AppointmentField::EndTime, v)),
            ]
            .spacing(8),
            input("Notes", &form.notes, |v| Message::AppointmentInput(AppointmentField::Notes, v)),
            button("Save Appointment").on_press(Message::SaveAppointment).padding(10),
        ]
        .spacing(8);

        let mut day_list = Column::new().spacing(6).push(text(format!("On {}", self.selected_day)).size(18));
        for appointment in &self.day_appointments {
            day_list = day_list.push(appointment_row(appointment));
        }

        let mut upcoming = Column::new().spacing(6).push(text("Upcoming").size(18));
        let upcoming_appointments = report::upcoming_appointments(&self.appointments, now());
        if upcoming_appointments.is_empty() {
            upcoming = upcoming.push(text("No upcoming appointments."));
        }
        for appointment in &upcoming_appointments {
            upcoming = upcoming.push(appointment_row(appointment));
        }

        column![navigation, grid, booking, day_list, upcoming]
            .spacing(20)
            .into()
    }

    fn clients_view(&self) -> Element<Message> {
        let form = &self.client_form;
        let new_client = column![
            text("New client").size(18),
            input("Name", &form.name, |v| Message::ClientInput(ClientField::Name, v)),
            input("Phone", &form.phone, |v| Message::ClientInput(ClientField::Phone, v)),
            input("Email", &form.email, |v| Message::ClientInput(ClientField::Email, v)),
            input("Notes", &form.notes, |v| Message::ClientInput(ClientField::Notes, v)),
            button("Save Client").on_press(Message::SaveClient).padding(10),
        ]
        .spacing(8);

        let mut list = Column::new()
            .spacing(8)
            .push(input("Search clients...", &self.client_search, Message::ClientSearch));

        if self.client_matches.is_empty() {
            list = list.push(text("No clients found."));
        }
        for client in &self.client_matches {
            let details = column![
                text(&client.name).size(18),
                text(format!("{}  {}", client.phone, client.email)).size(13),
                text(&client.notes).size(13),
            ]
            .spacing(2)
            .width(Length::Fill);

            list = list.push(
                row![
                    details,
                    button("Save Contact").on_press(Message::ExportClient(client.id.clone())),
                ]
                .spacing(12)
                .align_y(Alignment::Center),
            );
        }

        column![new_client, list].spacing(24).into()
    }

    fn sales_view(&self) -> Element<Message> {
        let summary = report::sales_summary(&self.sales, now());
        let mut chart = Column::new().spacing(8).push(text("Revenue").size(18));
        for (label, period) in summary.periods() {
            chart = chart.push(
                row![
                    text(label).width(Length::Fixed(100.0)),
                    progress_bar(0.0..=100.0, period.percentage as f32),
                    text(format_currency(period.total)).width(Length::Fixed(120.0)),
                ]
                .spacing(12)
                .align_y(Alignment::Center),
            );
        }

        let form = &self.sale_form;
        let new_sale = column![
            text("Record sale").size(18),
            input("Client name", &form.client_name, |v| Message::SaleInput(SaleField::ClientName, v)),
            input("Client phone", &form.client_phone, |v| Message::SaleInput(SaleField::ClientPhone, v)),
            input("Date (YYYY-MM-DD)", &form.date, |v| Message::SaleInput(SaleField::Date, v)),
            pick_list(TattooType::ALL, Some(form.tattoo_type), Message::SaleTypeSelected),
            input("Cost", &form.cost, |v| Message::SaleInput(SaleField::Cost, v)),
            button("Save Sale").on_press(Message::SaveSale).padding(10),
        ]
        .spacing(8);

        let mut list = Column::new().spacing(6).push(text("Sales").size(18));
        if self.sales.is_empty() {
            list = list.push(text("No sales recorded yet."));
        }
        for sale in &self.sales {
            list = list.push(
                row![
                    text(sale.date.to_string()).width(Length::Fixed(110.0)),
                    text(&sale.client_name).width(Length::Fill),
                    text(sale.tattoo_type.label()).width(Length::Fixed(130.0)),
                    text(format_currency(sale.cost)),
                ]
                .spacing(12),
            );
        }

        column![chart, new_sale, list].spacing(24).into()
    }

    fn gallery_view(&self) -> Element<Message> {
        let actions = row![
            button("Add Photo").on_press(Message::AddImage).padding(10),
            button("Import Folder").on_press(Message::ImportFolder).padding(10),
        ]
        .spacing(12);

        if let Some(image) = self
            .selected_image
            .as_ref()
            .and_then(|id| self.gallery.iter().find(|image| &image.id == id))
        {
            let mut detail = Column::new().spacing(12).push(text(&image.name).size(18));
            if let Some(handle) = self.thumbnails.get(&image.id) {
                detail = detail.push(Image::<Handle>::new(handle.clone()).width(Length::Fill));
            }
            detail = detail.push(
                row![
                    button("Back").on_press(Message::CloseImage),
                    button("Save As...").on_press(Message::SaveImageAs(image.id.clone())),
                    button("Delete")
                        .style(button::danger)
                        .on_press(Message::RemoveImage(image.id.clone())),
                ]
                .spacing(12),
            );
            return column![actions, detail].spacing(20).into();
        }

        let mut grid = Column::new().spacing(12);
        if self.gallery.is_empty() {
            grid = grid.push(text("Your gallery is empty."));
        }
        for chunk in self.gallery.chunks(4) {
            let mut cells = Row::new().spacing(12);
            for image in chunk {
                let preview: Element<Message> = match self.thumbnails.get(&image.id) {
                    Some(handle) => Image::<Handle>::new(handle.clone())
                        .width(Length::Fixed(160.0))
                        .height(Length::Fixed(160.0))
                        .into(),
                    None => text(&image.name).into(),
                };
                cells = cells.push(
                    button(preview)
                        .style(button::text)
                        .on_press(Message::ImageSelected(image.id.clone())),
                );
            }
            grid = grid.push(cells);
        }

        column![actions, grid].spacing(20).into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn tab_button(label: &str, tab: Tab, current: Tab) -> Element<'_, Message> {
    let style = if tab == current {
        button::primary
    } else {
        button::secondary
    };
    button(label)
        .style(style)
        .padding(10)
        .on_press(Message::TabSelected(tab))
        .into()
}

fn input<'a>(
    placeholder: &str,
    value: &str,
    on_input: impl Fn(String) -> Message + 'a,
) -> Element<'a, Message> {
    text_input(placeholder, value)
        .on_input(on_input)
        .padding(8)
        .into()
}

fn appointment_row(appointment: &Appointment) -> Element<'static, Message> {
    let mut details = column![
        text(format!(
            "{}  {}-{}  {}",
            appointment.date,
            appointment.start_time.format("%H:%M"),
            appointment.end_time.format("%H:%M"),
            appointment.client_name
        )),
    ]
    .width(Length::Fill);
    if !appointment.notes.is_empty() {
        details = details.push(text(appointment.notes.clone()).size(13));
    }

    row![
        details,
        button("Add to Calendar").on_press(Message::ExportAppointment(appointment.id.clone())),
    ]
    .spacing(12)
    .align_y(Alignment::Center)
    .into()
}

fn format_currency(value: f64) -> String {
    format!("${value:.2}")
}

/// Ask where to save `file` and write it there
fn save_export(file: &ExportFile, filter_name: &str, extension: &str) -> String {
    let destination = FileDialog::new()
        .set_file_name(&file.filename)
        .add_filter(filter_name, &[extension])
        .save_file();

    match destination {
        Some(path) => match file.save(&path) {
            Ok(path) => format!("📤 Saved {} ({}) to {}", file.filename, file.mime, path.display()),
            Err(e) => format!("❌ {e}"),
        },
        None => format!("Export of {} cancelled.", file.filename),
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    iced::application("Tattoo Studio", TattooStudio::update, TattooStudio::view)
        .theme(TattooStudio::theme)
        .centered()
        .run_with(TattooStudio::new)
}
