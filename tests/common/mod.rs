#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{DateTime, TimeZone, Utc};
use interpreter_booking::calendar::{
    CalendarError, CalendarProvisioner, MeetingRequest, ProvisionedMeeting,
};
use interpreter_booking::core::{AppState, encode_jwt};
use interpreter_booking::dtos::CreateBookingDTO;
use interpreter_booking::entities::{
    Appointment, Profile, ProfileKind, Request, RequestStatus, ScheduledRequest,
};
use interpreter_booking::repositories::{AppointmentStore, ExclusiveAccept};
use interpreter_booking::scheduling::detect_overlaps;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

pub const JWT_SECRET: &str = "ilmiobellissimosegretochevaassolutamentecambiato";

/// Link restituito dal calendario finto
pub const FAKE_MEET_LINK: &str = "https://meet.google.com/abc-defg-hij";

/// Orario fisso del giorno di test (14 marzo 2025, UTC)
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, hour, minute, 0).unwrap()
}

// ********************* STORE IN MEMORIA **********************//

#[derive(Default)]
struct Tables {
    profiles: Vec<Profile>,
    appointments: Vec<Appointment>,
    requests: Vec<Request>,
}

/// Store in memoria con iniezione di guasti sulle transizioni di stato
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    failing_transitions: Mutex<HashSet<i32>>,
    // appuntamenti su cui il salvataggio del meet link fallisce
    failing_meet_links: Mutex<HashSet<i32>>,
    // richieste che un "altro interprete" accetta appena prima della transizione
    raced_transitions: Mutex<HashSet<i32>>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_profile(&self, name: &str, kind: ProfileKind) -> Profile {
        let mut tables = self.tables.lock().unwrap();
        let profile = Profile {
            id: tables.profiles.len() as i32 + 1,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            photo: None,
            kind,
        };
        tables.profiles.push(profile.clone());
        profile
    }

    /// Appuntamento + richiesta in attesa; ritorna l'id della richiesta
    pub fn add_booking(
        &self,
        deaf_user: &Profile,
        interpreter: &Profile,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> i32 {
        self.insert_booking(deaf_user.id, interpreter.id, start, end).1.id
    }

    pub fn set_status(&self, request_id: i32, status: RequestStatus) {
        let mut tables = self.tables.lock().unwrap();
        let request = tables
            .requests
            .iter_mut()
            .find(|r| r.id == request_id)
            .expect("request exists");
        request.status = status;
    }

    pub fn status_of(&self, request_id: i32) -> RequestStatus {
        let tables = self.tables.lock().unwrap();
        tables
            .requests
            .iter()
            .find(|r| r.id == request_id)
            .expect("request exists")
            .status
    }

    pub fn statuses(&self) -> Vec<(i32, RequestStatus)> {
        let tables = self.tables.lock().unwrap();
        tables.requests.iter().map(|r| (r.id, r.status)).collect()
    }

    pub fn meet_link_of_request(&self, request_id: i32) -> Option<String> {
        let tables = self.tables.lock().unwrap();
        let appointment_id = tables
            .requests
            .iter()
            .find(|r| r.id == request_id)
            .expect("request exists")
            .appointment;
        tables
            .appointments
            .iter()
            .find(|a| a.id == appointment_id)
            .and_then(|a| a.meet_link.clone())
    }

    pub fn appointment_count(&self) -> usize {
        self.tables.lock().unwrap().appointments.len()
    }

    /// Le transizioni di questa richiesta falliscono con un errore dello store
    pub fn fail_transitions_for(&self, request_id: i32) {
        self.failing_transitions.lock().unwrap().insert(request_id);
    }

    /// Il salvataggio del meet link sull'appuntamento della richiesta fallisce
    pub fn fail_meet_link_for(&self, request_id: i32) {
        let appointment_id = {
            let tables = self.tables.lock().unwrap();
            tables
                .requests
                .iter()
                .find(|r| r.id == request_id)
                .expect("request exists")
                .appointment
        };
        self.failing_meet_links.lock().unwrap().insert(appointment_id);
    }

    /// La richiesta viene accettata da qualcun altro appena prima della transizione
    pub fn lose_race_for(&self, request_id: i32) {
        self.raced_transitions.lock().unwrap().insert(request_id);
    }

    /// Vista `ScheduledRequest` dell'interprete, ordinata come nello store MySQL
    fn scheduled(tables: &Tables, interpreter_id: i32) -> Vec<ScheduledRequest> {
        let mut scheduled: Vec<ScheduledRequest> = tables
            .requests
            .iter()
            .filter(|r| r.interpreter == interpreter_id)
            .filter_map(|r| {
                let appointment = tables.appointments.iter().find(|a| a.id == r.appointment)?;
                let counterpart = tables.profiles.iter().find(|p| p.id == appointment.profile)?;
                Some(ScheduledRequest {
                    request_id: r.id,
                    appointment_id: appointment.id,
                    interpreter: r.interpreter,
                    status: r.status,
                    start_time: appointment.start_time,
                    end_time: appointment.end_time,
                    meet_link: appointment.meet_link.clone(),
                    counterpart_id: counterpart.id,
                    counterpart_name: counterpart.name.clone(),
                    counterpart_email: counterpart.email.clone(),
                })
            })
            .collect();
        scheduled.sort_by_key(|r| (r.start_time, r.request_id));
        scheduled
    }

    fn insert_booking(
        &self,
        profile: i32,
        interpreter: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> (Appointment, Request) {
        let mut tables = self.tables.lock().unwrap();
        let appointment = Appointment {
            id: tables.appointments.len() as i32 + 1,
            start_time: start,
            end_time: end,
            profile,
            meet_link: None,
        };
        let request = Request {
            id: tables.requests.len() as i32 + 1,
            appointment: appointment.id,
            interpreter,
            status: RequestStatus::Pending,
        };
        tables.appointments.push(appointment.clone());
        tables.requests.push(request.clone());
        (appointment, request)
    }
}

#[async_trait]
impl AppointmentStore for InMemoryStore {
    async fn read_profile(&self, id: &i32) -> Result<Option<Profile>, sqlx::Error> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.profiles.iter().find(|p| p.id == *id).cloned())
    }

    async fn list_interpreters(&self) -> Result<Vec<Profile>, sqlx::Error> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .profiles
            .iter()
            .filter(|p| p.is_interpreter())
            .cloned()
            .collect())
    }

    async fn read_request(&self, id: &i32) -> Result<Option<Request>, sqlx::Error> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.requests.iter().find(|r| r.id == *id).cloned())
    }

    async fn find_requests_for_interpreter(
        &self,
        interpreter_id: &i32,
    ) -> Result<Vec<ScheduledRequest>, sqlx::Error> {
        let tables = self.tables.lock().unwrap();
        Ok(Self::scheduled(&tables, *interpreter_id))
    }

    async fn find_appointments_by_profile(
        &self,
        profile_id: &i32,
    ) -> Result<Vec<Appointment>, sqlx::Error> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .appointments
            .iter()
            .filter(|a| a.profile == *profile_id)
            .cloned()
            .collect())
    }

    async fn find_appointments_by_interpreter(
        &self,
        interpreter_id: &i32,
    ) -> Result<Vec<Appointment>, sqlx::Error> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .requests
            .iter()
            .filter(|r| r.interpreter == *interpreter_id && r.status == RequestStatus::Accepted)
            .filter_map(|r| tables.appointments.iter().find(|a| a.id == r.appointment))
            .cloned()
            .collect())
    }

    async fn create_booking(
        &self,
        data: &CreateBookingDTO,
    ) -> Result<(Appointment, Request), sqlx::Error> {
        Ok(self.insert_booking(data.profile, data.interpreter_id, data.start_time, data.end_time))
    }

    async fn update_meet_link(
        &self,
        appointment_id: &i32,
        meet_link: &str,
    ) -> Result<(), sqlx::Error> {
        if self.failing_meet_links.lock().unwrap().contains(appointment_id) {
            return Err(sqlx::Error::Protocol("connection reset".to_string()));
        }
        let mut tables = self.tables.lock().unwrap();
        if let Some(appointment) = tables.appointments.iter_mut().find(|a| a.id == *appointment_id)
        {
            appointment.meet_link = Some(meet_link.to_string());
        }
        Ok(())
    }

    async fn transition_request(
        &self,
        request_id: &i32,
        expected: RequestStatus,
        new_status: RequestStatus,
    ) -> Result<bool, sqlx::Error> {
        if self.failing_transitions.lock().unwrap().contains(request_id) {
            return Err(sqlx::Error::Protocol("connection reset".to_string()));
        }
        if self.raced_transitions.lock().unwrap().remove(request_id) {
            self.set_status(*request_id, RequestStatus::Accepted);
        }

        let mut tables = self.tables.lock().unwrap();
        match tables.requests.iter_mut().find(|r| r.id == *request_id) {
            Some(request) if request.status == expected => {
                request.status = new_status;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn accept_exclusive(&self, request_id: &i32) -> Result<ExclusiveAccept, sqlx::Error> {
        if self.failing_transitions.lock().unwrap().contains(request_id) {
            return Err(sqlx::Error::Protocol("connection reset".to_string()));
        }
        if self.raced_transitions.lock().unwrap().remove(request_id) {
            self.set_status(*request_id, RequestStatus::Accepted);
        }

        // verifica e scrittura sotto lo stesso lock, come la transazione MySQL
        let mut tables = self.tables.lock().unwrap();
        let Some(interpreter) = tables
            .requests
            .iter()
            .find(|r| r.id == *request_id)
            .map(|r| r.interpreter)
        else {
            return Ok(ExclusiveAccept::NotPending);
        };
        let scheduled = Self::scheduled(&tables, interpreter);
        let Some(candidate) = scheduled.iter().find(|r| r.request_id == *request_id) else {
            return Ok(ExclusiveAccept::NotPending);
        };
        if candidate.status != RequestStatus::Pending {
            return Ok(ExclusiveAccept::NotPending);
        }
        if let Some(blocking) = detect_overlaps(candidate, &scheduled)
            .into_iter()
            .find(|o| o.status == RequestStatus::Accepted)
        {
            return Ok(ExclusiveAccept::BlockedBy(blocking.request_id));
        }

        if let Some(request) = tables.requests.iter_mut().find(|r| r.id == *request_id) {
            request.status = RequestStatus::Accepted;
        }
        Ok(ExclusiveAccept::Accepted)
    }
}

// ********************* STORE CHE CEDE IL CONTROLLO **********************//

/// Cede il controllo al runtime prima di ogni chiamata, così due operazioni lanciate
/// con `tokio::join!` si alternano tra un passo e l'altro
pub struct YieldingStore {
    pub inner: Arc<InMemoryStore>,
}

#[async_trait]
impl AppointmentStore for YieldingStore {
    async fn read_profile(&self, id: &i32) -> Result<Option<Profile>, sqlx::Error> {
        tokio::task::yield_now().await;
        self.inner.read_profile(id).await
    }

    async fn list_interpreters(&self) -> Result<Vec<Profile>, sqlx::Error> {
        tokio::task::yield_now().await;
        self.inner.list_interpreters().await
    }

    async fn read_request(&self, id: &i32) -> Result<Option<Request>, sqlx::Error> {
        tokio::task::yield_now().await;
        self.inner.read_request(id).await
    }

    async fn find_requests_for_interpreter(
        &self,
        interpreter_id: &i32,
    ) -> Result<Vec<ScheduledRequest>, sqlx::Error> {
        tokio::task::yield_now().await;
        self.inner.find_requests_for_interpreter(interpreter_id).await
    }

    async fn find_appointments_by_profile(
        &self,
        profile_id: &i32,
    ) -> Result<Vec<Appointment>, sqlx::Error> {
        tokio::task::yield_now().await;
        self.inner.find_appointments_by_profile(profile_id).await
    }

    async fn find_appointments_by_interpreter(
        &self,
        interpreter_id: &i32,
    ) -> Result<Vec<Appointment>, sqlx::Error> {
        tokio::task::yield_now().await;
        self.inner.find_appointments_by_interpreter(interpreter_id).await
    }

    async fn create_booking(
        &self,
        data: &CreateBookingDTO,
    ) -> Result<(Appointment, Request), sqlx::Error> {
        tokio::task::yield_now().await;
        self.inner.create_booking(data).await
    }

    async fn update_meet_link(
        &self,
        appointment_id: &i32,
        meet_link: &str,
    ) -> Result<(), sqlx::Error> {
        tokio::task::yield_now().await;
        self.inner.update_meet_link(appointment_id, meet_link).await
    }

    async fn transition_request(
        &self,
        request_id: &i32,
        expected: RequestStatus,
        new_status: RequestStatus,
    ) -> Result<bool, sqlx::Error> {
        tokio::task::yield_now().await;
        self.inner
            .transition_request(request_id, expected, new_status)
            .await
    }

    async fn accept_exclusive(&self, request_id: &i32) -> Result<ExclusiveAccept, sqlx::Error> {
        tokio::task::yield_now().await;
        self.inner.accept_exclusive(request_id).await
    }
}

// ********************* CALENDARIO FINTO **********************//

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FakeCalendarMode {
    Succeed,
    RejectToken,
    Fail,
}

/// Provisioner che registra le richieste ricevute
pub struct FakeCalendar {
    mode: FakeCalendarMode,
    calls: Mutex<Vec<MeetingRequest>>,
}

impl FakeCalendar {
    pub fn new(mode: FakeCalendarMode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<MeetingRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CalendarProvisioner for FakeCalendar {
    async fn create_meeting(
        &self,
        request: &MeetingRequest,
    ) -> Result<ProvisionedMeeting, CalendarError> {
        self.calls.lock().unwrap().push(request.clone());
        match self.mode {
            FakeCalendarMode::Succeed => Ok(ProvisionedMeeting {
                event_id: Some(format!("evt-{}", request.request_key)),
                link: FAKE_MEET_LINK.to_string(),
            }),
            FakeCalendarMode::RejectToken => Err(CalendarError::Unauthorized {
                status: 401,
                body: "Invalid Credentials".to_string(),
            }),
            FakeCalendarMode::Fail => Err(CalendarError::Upstream {
                status: 500,
                body: "backendError".to_string(),
            }),
        }
    }
}

// ********************* SERVER DI TEST **********************//

/// Crea un AppState per i test
///
/// # Arguments
/// * `store` - Store in memoria già popolato
/// * `calendar` - Calendario finto
///
/// # Returns
/// Arc<AppState> configurato con il JWT secret di test
pub fn create_test_state(store: Arc<InMemoryStore>, calendar: Arc<FakeCalendar>) -> Arc<AppState> {
    Arc::new(AppState::with_backends(
        store,
        calendar,
        JWT_SECRET.to_string(),
    ))
}

/// Crea un TestServer per i test
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = interpreter_booking::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Genera un JWT token valido 24 ore per il profilo
pub fn create_test_jwt(profile: &Profile) -> String {
    encode_jwt(profile.id, &profile.email, JWT_SECRET).expect("Failed to create JWT token")
}

/// Scenario base: due persone sorde, due interpreti
pub struct World {
    pub store: Arc<InMemoryStore>,
    pub alice: Profile,
    pub giulia: Profile,
    pub marco: Profile,
    pub luca: Profile,
}

pub fn world() -> World {
    let store = InMemoryStore::new();
    let alice = store.add_profile("Alice Rossi", ProfileKind::DeafUser);
    let giulia = store.add_profile("Giulia Verdi", ProfileKind::DeafUser);
    let marco = store.add_profile("Marco Bianchi", ProfileKind::Interpreter);
    let luca = store.add_profile("Luca Neri", ProfileKind::Interpreter);
    World {
        store,
        alice,
        giulia,
        marco,
        luca,
    }
}
